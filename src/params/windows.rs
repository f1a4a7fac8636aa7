//! Windows credential and secret derivation
//!
//! Runs only when the spec carries a Windows profile. The admin password is
//! always emitted, even when blank (the template requires the parameter to
//! exist), unlike Linux-side secrets which drop out when empty. Image source
//! resolution is priority-ordered through [`WindowsImageSource`]; only the
//! winning source contributes parameters.

use crate::spec::{WindowsImageSource, WindowsProfile};
use crate::Result;

use super::sink::ParameterSink;

pub(super) fn derive(profile: &WindowsProfile, sink: &mut ParameterSink) -> Result<()> {
    sink.put("windowsAdminUsername", profile.admin_username.as_str())?;
    sink.put_secret("windowsAdminPassword", profile.admin_password.as_str(), true)?;

    match profile.image_source() {
        WindowsImageSource::CustomUrl(url) => {
            sink.put("agentWindowsSourceUrl", url)?;
        }
        WindowsImageSource::Reference(image_ref) => {
            sink.put("agentWindowsImageResourceGroup", image_ref.resource_group.as_str())?;
            sink.put("agentWindowsImageName", image_ref.name.as_str())?;
        }
        WindowsImageSource::Marketplace { publisher, offer, sku, version } => {
            sink.put("agentWindowsPublisher", publisher)?;
            sink.put("agentWindowsOffer", offer)?;
            sink.put("agentWindowsSku", sku)?;
            sink.put("agentWindowsVersion", version)?;
        }
    }

    sink.put("windowsDockerVersion", profile.docker_version())?;

    // Windows certificates carry a store name alongside the URL; indices are
    // positional, matching the declaration order of bundles and certificates.
    for (i, secret) in profile.secrets.iter().enumerate() {
        sink.put(format!("windowsKeyVaultID{i}"), secret.source_vault_id.as_str())?;
        for (j, cert) in secret.vault_certificates.iter().enumerate() {
            sink.put(
                format!("windowsKeyVaultID{i}CertificateURL{j}"),
                cert.certificate_url.as_str(),
            )?;
            sink.put(
                format!("windowsKeyVaultID{i}CertificateStore{j}"),
                cert.certificate_store.as_deref().unwrap_or_default(),
            )?;
        }
    }

    sink.put("defaultContainerdRuntimeHandler", profile.default_runtime_handler())?;
    sink.put("hypervRuntimeHandlers", profile.hyperv_runtime_handlers())?;

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ImageRef, KeyVaultSecrets, VaultCertificate};
    use crate::{DEFAULT_CONTAINERD_RUNTIME_HANDLER, DEFAULT_WINDOWS_DOCKER_VERSION};

    fn make_profile() -> WindowsProfile {
        WindowsProfile {
            admin_username: "azureuser".into(),
            admin_password: "P@ssw0rd".into(),
            publisher: "MicrosoftWindowsServer".into(),
            offer: "WindowsServer".into(),
            sku: "2019-Datacenter-Core-smalldisk".into(),
            image_version: "latest".into(),
            ..Default::default()
        }
    }

    fn derive_map(profile: &WindowsProfile) -> crate::params::sink::ParameterMap {
        let mut sink = ParameterSink::new();
        derive(profile, &mut sink).unwrap();
        sink.finalize()
    }

    #[test]
    fn password_present_even_when_empty() {
        let mut profile = make_profile();
        profile.admin_password = String::new();
        let map = derive_map(&profile);
        assert!(map.contains("windowsAdminPassword"));
        assert!(map.contains("windowsAdminUsername"));
    }

    #[test]
    fn custom_url_wins_over_image_ref_and_marketplace() {
        let mut profile = make_profile();
        profile.image_source_url = Some("https://example.com/win.vhd".into());
        profile.image_ref = Some(ImageRef { name: "win".into(), resource_group: "rg".into() });

        let map = derive_map(&profile);
        assert!(map.contains("agentWindowsSourceUrl"));
        assert!(!map.contains("agentWindowsImageName"));
        assert!(!map.contains("agentWindowsImageResourceGroup"));
        assert!(!map.contains("agentWindowsPublisher"));
    }

    #[test]
    fn image_ref_wins_over_marketplace() {
        let mut profile = make_profile();
        profile.image_ref = Some(ImageRef { name: "win".into(), resource_group: "rg".into() });

        let map = derive_map(&profile);
        assert!(map.contains("agentWindowsImageResourceGroup"));
        assert!(map.contains("agentWindowsImageName"));
        assert!(!map.contains("agentWindowsSourceUrl"));
        assert!(!map.contains("agentWindowsOffer"));
    }

    #[test]
    fn marketplace_is_the_fallback() {
        let map = derive_map(&make_profile());
        assert!(map.contains("agentWindowsPublisher"));
        assert!(map.contains("agentWindowsOffer"));
        assert!(map.contains("agentWindowsSku"));
        assert!(map.contains("agentWindowsVersion"));
    }

    #[test]
    fn runtime_defaults_apply() {
        let map = derive_map(&make_profile());
        assert_eq!(
            map.get("windowsDockerVersion"),
            Some(&crate::params::sink::ParamValue::Literal(
                DEFAULT_WINDOWS_DOCKER_VERSION.into()
            ))
        );
        assert_eq!(
            map.get("defaultContainerdRuntimeHandler"),
            Some(&crate::params::sink::ParamValue::Literal(
                DEFAULT_CONTAINERD_RUNTIME_HANDLER.into()
            ))
        );
        assert!(map.contains("hypervRuntimeHandlers"));
    }

    #[test]
    fn secrets_emit_url_and_store_per_certificate() {
        let mut profile = make_profile();
        profile.secrets = vec![KeyVaultSecrets {
            source_vault_id: "/vaults/kv0".into(),
            vault_certificates: vec![VaultCertificate {
                certificate_url: "https://kv0/c0".into(),
                certificate_store: Some("My".into()),
            }],
        }];

        let map = derive_map(&profile);
        assert!(map.contains("windowsKeyVaultID0"));
        assert!(map.contains("windowsKeyVaultID0CertificateURL0"));
        assert!(map.contains("windowsKeyVaultID0CertificateStore0"));
    }
}
