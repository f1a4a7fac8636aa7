//! End-to-end derivation scenarios
//!
//! Each scenario builds a spec, runs the full derivation, and checks the
//! resulting parameter map against the rules the template contract depends
//! on: networking mutual exclusion, spot gating, positional secret indices,
//! Windows image-source priority, and hard failure on colliding pool names.

use trellis::images::{ImageResolutionTable, OsImageConfig};
use trellis::params::{derive_parameters, NoOrchestratorParams, ParamValue};
use trellis::spec::{
    AgentPool, CloudProfile, ClusterSpec, EvictionPolicy, ImageRef, KeyVaultSecrets, LinuxProfile,
    MasterPool, OsType, Placement, ScaleSetPriority, VaultCertificate, WindowsProfile,
};
use trellis::Error;

fn ubuntu_table() -> ImageResolutionTable {
    ImageResolutionTable::new().with(
        "ubuntu-18.04",
        OsImageConfig {
            offer: "UbuntuServer".into(),
            sku: "18.04-LTS".into(),
            publisher: "Canonical".into(),
            version: "latest".into(),
        },
    )
}

fn base_spec() -> ClusterSpec {
    ClusterSpec {
        location: "westus2".into(),
        cloud: CloudProfile {
            name: String::new(),
            fqdn_endpoint_suffix: "cloudapp.azure.com".into(),
        },
        master: Some(MasterPool {
            dns_prefix: "scenario".into(),
            vm_size: "Standard_D2_v3".into(),
            distro: "ubuntu-18.04".into(),
            first_consecutive_static_ip: "10.255.255.5".into(),
            subnet: "10.255.255.0/24".into(),
            agent_subnet: "10.240.0.0/16".into(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn derive(spec: &ClusterSpec) -> Result<trellis::params::ParameterMap, Error> {
    derive_parameters(spec, &ubuntu_table(), &NoOrchestratorParams, "vlabs", "0.1.0")
}

fn literal(map: &trellis::params::ParameterMap, name: &str) -> serde_json::Value {
    match map.get(name) {
        Some(ParamValue::Literal(v)) => v.clone(),
        other => panic!("expected literal for {name}, got {other:?}"),
    }
}

#[test]
fn managed_subnet_master_resolves_images_and_subnets() {
    // Scenario A: managed-subnet master on ubuntu-18.04, no zones.
    let map = derive(&base_spec()).unwrap();

    assert_eq!(literal(&map, "masterSubnet"), "10.255.255.0/24");
    assert_eq!(literal(&map, "masterVMSize"), "Standard_D2_v3");
    assert_eq!(literal(&map, "osImageOffer"), "UbuntuServer");
    assert_eq!(literal(&map, "osImageSKU"), "18.04-LTS");
    assert_eq!(literal(&map, "osImagePublisher"), "Canonical");
    assert_eq!(literal(&map, "osImageVersion"), "latest");
    assert!(!map.contains("masterVnetSubnetID"));
    assert!(!map.contains("availabilityZones"));
}

#[test]
fn spot_pool_emits_priority_and_eviction_policy() {
    // Scenario B: scale-set pool at spot priority with Delete eviction.
    let mut spec = base_spec();
    spec.agent_pools = vec![AgentPool {
        name: "pool1".into(),
        count: 3,
        vm_size: "Standard_D2_v3".into(),
        distro: "ubuntu-18.04".into(),
        subnet: "10.240.0.0/16".into(),
        placement: Placement::ScaleSet,
        scale_set_priority: ScaleSetPriority::Spot,
        scale_set_eviction_policy: EvictionPolicy::Delete,
        ..Default::default()
    }];

    let map = derive(&spec).unwrap();
    assert_eq!(literal(&map, "pool1ScaleSetPriority"), "Spot");
    assert_eq!(literal(&map, "pool1ScaleSetEvictionPolicy"), "Delete");
}

#[test]
fn linux_secret_bundles_use_positional_indices() {
    // Scenario C: two bundles, two certs then one cert.
    let mut spec = base_spec();
    spec.linux_profile = Some(LinuxProfile {
        admin_username: "azureuser".into(),
        ssh_public_keys: vec!["ssh-rsa AAAA...".into()],
        custom_nodes_dns: None,
        secrets: vec![
            KeyVaultSecrets {
                source_vault_id: "/vaults/kv0".into(),
                vault_certificates: vec![
                    VaultCertificate {
                        certificate_url: "https://kv0/c0".into(),
                        certificate_store: None,
                    },
                    VaultCertificate {
                        certificate_url: "https://kv0/c1".into(),
                        certificate_store: None,
                    },
                ],
            },
            KeyVaultSecrets {
                source_vault_id: "/vaults/kv1".into(),
                vault_certificates: vec![VaultCertificate {
                    certificate_url: "https://kv1/c0".into(),
                    certificate_store: None,
                }],
            },
        ],
    });

    let map = derive(&spec).unwrap();
    for name in [
        "linuxKeyVaultID0",
        "linuxKeyVaultID0CertificateURL0",
        "linuxKeyVaultID0CertificateURL1",
        "linuxKeyVaultID1",
        "linuxKeyVaultID1CertificateURL0",
    ] {
        assert!(map.contains(name), "missing {name}");
    }
    assert!(!map.contains("linuxKeyVaultID1CertificateURL1"));
    assert!(!map.contains("linuxKeyVaultID2"));
}

#[test]
fn windows_custom_image_url_wins_over_image_ref() {
    // Scenario D: both a custom VHD URL and an image reference are set; only
    // the URL may surface.
    let mut spec = base_spec();
    spec.windows_profile = Some(WindowsProfile {
        admin_username: "azureuser".into(),
        admin_password: "P@ssw0rd".into(),
        image_source_url: Some("https://example.com/win.vhd".into()),
        image_ref: Some(ImageRef {
            name: "golden-win".into(),
            resource_group: "images-rg".into(),
        }),
        ..Default::default()
    });

    let map = derive(&spec).unwrap();
    assert_eq!(literal(&map, "agentWindowsSourceUrl"), "https://example.com/win.vhd");
    assert!(!map.contains("agentWindowsImageName"));
    assert!(!map.contains("agentWindowsImageResourceGroup"));
    assert!(!map.contains("agentWindowsPublisher"));
}

#[test]
fn duplicate_pool_names_fail_without_a_partial_map() {
    // Scenario E: two pools named "pool1".
    let mut spec = base_spec();
    let pool = AgentPool {
        name: "pool1".into(),
        count: 1,
        vm_size: "Standard_D2_v3".into(),
        distro: "ubuntu-18.04".into(),
        subnet: "10.240.0.0/16".into(),
        ..Default::default()
    };
    spec.agent_pools = vec![pool.clone(), pool];

    let err = derive(&spec).unwrap_err();
    assert!(matches!(err, Error::DuplicateParameter(_)));
}

#[test]
fn empty_windows_password_still_surfaces() {
    let mut spec = base_spec();
    spec.windows_profile = Some(WindowsProfile {
        admin_username: "azureuser".into(),
        admin_password: String::new(),
        publisher: "MicrosoftWindowsServer".into(),
        offer: "WindowsServer".into(),
        image_version: "latest".into(),
        ..Default::default()
    });

    let map = derive(&spec).unwrap();
    assert!(matches!(map.get("windowsAdminPassword"), Some(ParamValue::Secret(_))));
}

#[test]
fn derivation_is_idempotent_over_a_full_fixture() {
    let yaml = include_str!("fixtures/cluster.yaml");
    let spec: ClusterSpec = serde_yaml::from_str(yaml).expect("fixture parses");
    assert_eq!(spec.agent_pools[1].os_type, OsType::Windows);

    let first = derive(&spec).unwrap();
    let second = derive(&spec).unwrap();
    assert_eq!(first, second);

    // Spot-fixture pool emits its gating parameters; the Windows pool skips
    // the distro table but still contributes its basics.
    assert!(first.contains("linuxpoolScaleSetPriority"));
    assert!(first.contains("winpoolCount"));
    assert!(!first.contains("winpoolosImageOffer"));
    assert!(first.contains("windowsAdminPassword"));
    assert!(first.contains("availabilityZones"));

    // Extension payloads are mutually exclusive per extension.
    assert!(matches!(first.get("winrmParameters"), Some(ParamValue::Literal(_))));
    assert!(matches!(first.get("hardeningParameters"), Some(ParamValue::SecretRef { .. })));
}

#[test]
fn template_parameter_rendering_shapes() {
    let yaml = include_str!("fixtures/cluster.yaml");
    let spec: ClusterSpec = serde_yaml::from_str(yaml).expect("fixture parses");
    let map = derive(&spec).unwrap();
    let rendered = map.to_template_parameters();

    assert_eq!(rendered["location"]["value"], "westus2");
    assert_eq!(rendered["windowsAdminPassword"]["value"], "");
    assert_eq!(
        rendered["hardeningParameters"]["reference"]["secretName"],
        "hardening-params"
    );
    // Rendered object preserves derivation order.
    let keys: Vec<_> = rendered.as_object().unwrap().keys().cloned().collect();
    let names: Vec<_> = map.names().map(String::from).collect();
    assert_eq!(keys, names);
}
