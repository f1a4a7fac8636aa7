//! Extension parameter derivation
//!
//! Each declared extension contributes one `{name}Parameters` entry: a
//! key-vault reference when one is configured, otherwise the inline payload.
//! The two encodings are mutually exclusive per extension.

use crate::spec::ExtensionProfile;
use crate::Result;

use super::sink::ParameterSink;

pub(super) fn derive(extensions: &[ExtensionProfile], sink: &mut ParameterSink) -> Result<()> {
    for extension in extensions {
        let name = format!("{}Parameters", extension.name);
        if let Some(vault_ref) = &extension.parameters_key_vault_ref {
            sink.put_secret_ref(
                name,
                vault_ref.vault_id.as_str(),
                vault_ref.secret_name.as_str(),
                vault_ref.secret_version.as_str(),
            )?;
        } else {
            sink.put(name, extension.parameters.as_str())?;
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::sink::ParamValue;
    use crate::spec::KeyVaultRef;

    #[test]
    fn inline_parameters_become_a_literal() {
        let extensions = vec![ExtensionProfile {
            name: "winrm".into(),
            parameters: "{\"enabled\":true}".into(),
            parameters_key_vault_ref: None,
        }];
        let mut sink = ParameterSink::new();
        derive(&extensions, &mut sink).unwrap();
        let map = sink.finalize();
        assert!(matches!(map.get("winrmParameters"), Some(ParamValue::Literal(_))));
    }

    #[test]
    fn vault_ref_becomes_a_secret_reference() {
        let extensions = vec![ExtensionProfile {
            name: "hardening".into(),
            parameters: String::new(),
            parameters_key_vault_ref: Some(KeyVaultRef {
                vault_id: "/vaults/kv".into(),
                secret_name: "hardening-params".into(),
                secret_version: "abc123".into(),
            }),
        }];
        let mut sink = ParameterSink::new();
        derive(&extensions, &mut sink).unwrap();
        let map = sink.finalize();
        match map.get("hardeningParameters") {
            Some(ParamValue::SecretRef { vault_id, secret_name, secret_version }) => {
                assert_eq!(vault_id, "/vaults/kv");
                assert_eq!(secret_name, "hardening-params");
                assert_eq!(secret_version, "abc123");
            }
            other => panic!("expected a secret reference, got {other:?}"),
        }
    }

    #[test]
    fn extensions_derive_in_declaration_order() {
        let extensions = vec![
            ExtensionProfile { name: "second".into(), ..Default::default() },
            ExtensionProfile { name: "first".into(), ..Default::default() },
        ];
        let mut sink = ParameterSink::new();
        derive(&extensions, &mut sink).unwrap();
        let names: Vec<_> = sink.finalize().names().map(String::from).collect();
        assert_eq!(names, vec!["secondParameters", "firstParameters"]);
    }
}
