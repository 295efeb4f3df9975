//! Provisioning pipeline.
//!
//! `Start -> Built -> Fetched -> Merged -> Submitted -> Done`, strictly in
//! order. The first failure ends the run.

use super::{build_new_section, merge_sections};
use crate::azure::NetworkConfigClient;
use crate::config_file::{remove_quietly, ScopedConfigFile};
use crate::error::{ProvisionError, Stage};
use crate::models::{NetworkSection, VnetParams};
use crate::xml::{parse_network_configuration, render_network_configuration};
use colored::Colorize;
use std::path::Path;

/// Create the network described by `params` and return the configuration the
/// provider confirms after applying it.
///
/// A file left at `config_path` by an earlier run is removed before anything
/// else. The merged document is then written there for the submission and
/// removed afterwards, whether the submission worked or not.
pub fn provision_vnet<C: NetworkConfigClient + ?Sized>(
    client: &C,
    params: &VnetParams,
    config_path: &Path,
) -> Result<String, ProvisionError> {
    remove_quietly(config_path);
    let merged = merged_document(client, params)?;

    let file = ScopedConfigFile::create(config_path, &merged).map_err(|source| {
        ProvisionError::Write {
            path: config_path.to_path_buf(),
            source,
        }
    })?;
    client
        .apply_configuration(file.path())
        .map_err(ProvisionError::Submit)?;
    drop(file);
    stage(Stage::Submitted);

    let confirmed = client
        .fetch_configuration()
        .map_err(ProvisionError::Confirm)?
        .ok_or_else(|| ProvisionError::Confirm("provider returned no configuration".into()))?;
    stage(Stage::Done);
    Ok(confirmed)
}

/// Build, fetch and merge without writing or submitting anything.
pub fn preview_vnet<C: NetworkConfigClient + ?Sized>(
    client: &C,
    params: &VnetParams,
) -> Result<String, ProvisionError> {
    merged_document(client, params)
}

fn merged_document<C: NetworkConfigClient + ?Sized>(
    client: &C,
    params: &VnetParams,
) -> Result<String, ProvisionError> {
    stage(Stage::Start);
    let new = build_new_section(params);
    stage(Stage::Built);

    let existing = match client.fetch_configuration().map_err(ProvisionError::Fetch)? {
        Some(xml) => parse_network_configuration(&xml).map_err(ProvisionError::Parse)?,
        None => NetworkSection::default(),
    };
    stage(Stage::Fetched);
    log::debug!("existing {existing}");

    let merged = merge_sections(&new, &existing);
    stage(Stage::Merged);
    log::info!("merged {merged}");

    render_network_configuration(&merged).map_err(ProvisionError::Render)
}

fn stage(stage: Stage) {
    log::info!("#stage {}", stage.to_string().on_green());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::error::Error;
    use std::path::PathBuf;

    #[derive(Default)]
    struct FakeClient {
        current: Option<String>,
        fail_fetch: bool,
        fail_apply: bool,
        applied: RefCell<Vec<String>>,
    }

    impl NetworkConfigClient for FakeClient {
        fn fetch_configuration(&self) -> Result<Option<String>, Box<dyn Error>> {
            if self.fail_fetch {
                return Err("AuthenticationFailed: token expired".into());
            }
            Ok(self
                .applied
                .borrow()
                .last()
                .cloned()
                .or_else(|| self.current.clone()))
        }

        fn apply_configuration(&self, path: &Path) -> Result<(), Box<dyn Error>> {
            if self.fail_apply {
                return Err("BadRequest: invalid address range".into());
            }
            self.applied.borrow_mut().push(std::fs::read_to_string(path)?);
            Ok(())
        }
    }

    fn params() -> VnetParams {
        VnetParams {
            dns_server_name: "dc1".to_string(),
            dns_server_ip: "10.0.10.4".to_string(),
            vnet_name: "domainvlan".to_string(),
            location: "West Europe".to_string(),
            vnet_address_range: "10.2.0.0/16".to_string(),
            subnet_name: "sub1".to_string(),
            subnet_address_range: "10.2.0.0/24".to_string(),
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{name}-{}.xml", std::process::id()))
    }

    #[test]
    fn test_provision_without_existing_config() {
        let client = FakeClient::default();
        let path = temp_path("provision-empty");
        let confirmed = provision_vnet(&client, &params(), &path).expect("Error provisioning");

        let section = parse_network_configuration(&confirmed).expect("Error parsing result");
        assert_eq!(section, build_new_section(&params()));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_submit_removes_file() {
        let client = FakeClient {
            fail_apply: true,
            ..Default::default()
        };
        let path = temp_path("provision-fail");
        let err = provision_vnet(&client, &params(), &path).expect_err("Submit should fail");
        assert!(matches!(err, ProvisionError::Submit(_)));
        assert_eq!(err.failed_after(), Stage::Merged);
        assert!(err.to_string().contains("BadRequest: invalid address range"));
        assert!(!path.exists());
    }

    #[test]
    fn test_unparsable_existing_config() {
        let client = FakeClient {
            current: Some("<NetworkConfiguration><Dns>".to_string()),
            ..Default::default()
        };
        let path = temp_path("provision-parse");
        let err = provision_vnet(&client, &params(), &path).expect_err("Parse should fail");
        assert!(matches!(err, ProvisionError::Parse(_)));
        assert!(client.applied.borrow().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_fetch_removes_stale_file() {
        let client = FakeClient {
            fail_fetch: true,
            ..Default::default()
        };
        let path = temp_path("provision-stale");
        std::fs::write(&path, "<NetworkConfiguration/>").unwrap();
        let err = provision_vnet(&client, &params(), &path).expect_err("Fetch should fail");
        assert!(matches!(err, ProvisionError::Fetch(_)));
        assert_eq!(err.failed_after(), Stage::Built);
        assert!(!path.exists());
    }

    #[test]
    fn test_preview_does_not_submit() {
        let client = FakeClient::default();
        let xml = preview_vnet(&client, &params()).expect("Error previewing");
        assert!(xml.contains(r#"<VirtualNetworkSite name="domainvlan" Location="West Europe">"#));
        assert!(client.applied.borrow().is_empty());
    }
}
