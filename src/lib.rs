//! Classic Azure virtual network provisioning.
//!
//! Builds a network configuration section for a new virtual network, merges
//! the subscription's existing configuration into it and submits the result.
//!
//! ```text
//! build -> fetch -> merge -> submit -> confirmed configuration
//! ```

pub mod azure;
pub mod config;
pub mod config_file;
pub mod error;
pub mod models;
pub mod processing;
pub mod xml;

pub use error::{ProvisionError, Stage};
pub use processing::{build_new_section, merge_sections, preview_vnet, provision_vnet};

use azure::{NetworkConfigClient, PowerShellClient, ServiceManagementClient, Session};
use config::{Backend, Settings};
use std::error::Error;

/// Client for the backend selected in `settings`.
pub fn client_from_settings(
    settings: &Settings,
) -> Result<Box<dyn NetworkConfigClient>, Box<dyn Error>> {
    match settings.backend {
        Backend::Powershell => Ok(Box::new(PowerShellClient::new(&settings.powershell))),
        Backend::Rest => {
            let session = Session::from_az_cli(
                settings.subscription_id.as_deref(),
                settings.access_token.as_deref(),
            )?;
            log::info!("Using Service Management API for {}", session.subscription_id);
            Ok(Box::new(ServiceManagementClient::new(&settings.endpoint, session)?))
        }
    }
}
