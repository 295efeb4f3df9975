//! Settings and constants.

use crate::models::VnetParams;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Base pause used between remote status polls.
pub const SLEEP_MSEC: u64 = 200;
/// Number of operation status polls before giving up on a submission.
pub const MAX_POLLS: usize = 150;
/// Largest stdout accepted from a shell command.
pub const MAX_OUTPUT_BYTES: usize = 500_000;
/// `x-ms-version` header sent to the Service Management API.
pub const SERVICE_MANAGEMENT_VERSION: &str = "2015-04-01";
pub const MANAGEMENT_ENDPOINT: &str = "https://management.core.windows.net";
/// Token audience for the Service Management API.
pub const MANAGEMENT_RESOURCE: &str = "https://management.core.windows.net/";

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Classic Azure PowerShell cmdlets
    Powershell,
    /// Service Management REST API
    Rest,
}

/// Create a classic Azure virtual network and merge it into the
/// subscription's network configuration.
#[derive(Parser, Debug)]
#[command(name = "azure-vnet-provision", version)]
pub struct Settings {
    /// Name of the new DNS server entry
    #[arg(long, env = "VNET_DNS_NAME")]
    pub dns_name: String,

    /// IPv4 address of the new DNS server
    #[arg(long, env = "VNET_DNS_IP")]
    pub dns_ip: String,

    /// Name of the new virtual network
    #[arg(long, env = "VNET_NAME")]
    pub vnet_name: String,

    /// Region of the new virtual network, e.g. "West Europe"
    #[arg(long, env = "VNET_LOCATION")]
    pub location: String,

    /// Address range (CIDR) of the new virtual network
    #[arg(long, env = "VNET_ADDRESS_RANGE")]
    pub address_range: String,

    /// Name of the subnet
    #[arg(long, env = "VNET_SUBNET_NAME")]
    pub subnet_name: String,

    /// Address range (CIDR) of the subnet
    #[arg(long, env = "VNET_SUBNET_RANGE")]
    pub subnet_range: String,

    /// Intermediate configuration file, removed after submission
    #[arg(long, env = "VNET_CONFIG_FILE")]
    pub config_file: PathBuf,

    /// How to reach the provider
    #[arg(long, value_enum, env = "VNET_BACKEND", default_value = "powershell")]
    pub backend: Backend,

    /// PowerShell host used by the powershell backend
    #[arg(long, env = "VNET_POWERSHELL", default_value = "pwsh")]
    pub powershell: String,

    /// Subscription for the rest backend (defaults to the az cli account)
    #[arg(long, env = "AZURE_SUBSCRIPTION_ID")]
    pub subscription_id: Option<String>,

    /// Bearer token for the rest backend (defaults to an az cli token)
    #[arg(long, env = "AZURE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Service Management endpoint for the rest backend
    #[arg(long, env = "AZURE_MANAGEMENT_ENDPOINT", default_value = MANAGEMENT_ENDPOINT)]
    pub endpoint: String,

    /// Print the merged configuration instead of submitting it
    #[arg(long)]
    pub dry_run: bool,
}

impl Settings {
    pub fn vnet_params(&self) -> VnetParams {
        VnetParams {
            dns_server_name: self.dns_name.clone(),
            dns_server_ip: self.dns_ip.clone(),
            vnet_name: self.vnet_name.clone(),
            location: self.location.clone(),
            vnet_address_range: self.address_range.clone(),
            subnet_name: self.subnet_name.clone(),
            subnet_address_range: self.subnet_range.clone(),
        }
    }
}
