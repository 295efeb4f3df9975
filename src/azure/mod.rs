//! Azure network configuration access.
//!
//! This module handles all Azure-related operations:
//! - [`client`] - The [`NetworkConfigClient`] trait the pipeline talks to
//! - [`cli`] - Command execution for PowerShell and Azure CLI
//! - [`powershell`] - Classic Azure PowerShell cmdlets
//! - [`rest`] - Service Management REST API
//! - [`session`] - Explicit authenticated session for the REST API

mod cli;
mod client;
mod powershell;
mod rest;
mod session;

// Re-export public types and functions
pub use cli::run;
pub use client::NetworkConfigClient;
pub use powershell::PowerShellClient;
pub use rest::ServiceManagementClient;
pub use session::Session;
