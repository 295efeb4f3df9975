//! Domain models for the classic Azure network configuration.
//!
//! This module contains the core data structures used throughout the application:
//! - [`DnsServer`] - DNS server entry referenced by virtual networks
//! - [`VirtualNetworkSite`] and [`Subnet`] - Virtual network structures
//! - [`NetworkSection`] - The `VirtualNetworkConfiguration` content
//! - [`VnetParams`] - Caller supplied values for a new network

mod dns;
mod params;
mod section;
mod vnet;

// Re-export public types
pub use dns::DnsServer;
pub use params::VnetParams;
pub use section::{NetworkSection, RawXml};
pub use vnet::{Subnet, VirtualNetworkSite};
