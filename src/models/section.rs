//! The `VirtualNetworkConfiguration` section of a network configuration document.

use super::{DnsServer, VirtualNetworkSite};
use std::fmt;

/// An opaque XML fragment, copied verbatim between documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawXml(pub String);

impl RawXml {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Content of `NetworkConfiguration > VirtualNetworkConfiguration`.
///
/// Only the DNS servers, local network sites and virtual network sites are
/// carried, other sections of the provider schema are out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkSection {
    /// `Dns > DnsServers` entries in document order.
    pub dns_servers: Vec<DnsServer>,
    /// The whole `LocalNetworkSites` block, never inspected per site.
    pub local_network_sites: Option<RawXml>,
    /// `VirtualNetworkSites` entries in document order.
    pub virtual_network_sites: Vec<VirtualNetworkSite>,
}

impl NetworkSection {
    pub fn is_empty(&self) -> bool {
        self.dns_servers.is_empty()
            && self.local_network_sites.is_none()
            && self.virtual_network_sites.is_empty()
    }

    pub fn dns_server(&self, name: &str) -> Option<&DnsServer> {
        self.dns_servers.iter().find(|d| d.name == name)
    }

    pub fn site(&self, name: &str) -> Option<&VirtualNetworkSite> {
        self.virtual_network_sites.iter().find(|s| s.name == name)
    }
}

impl fmt::Display for NetworkSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "NetworkSection ({} DNS servers, {} VNets, local sites: {}):",
            self.dns_servers.len(),
            self.virtual_network_sites.len(),
            if self.local_network_sites.is_some() { "yes" } else { "no" }
        )?;
        for dns in &self.dns_servers {
            writeln!(f, "  - DNS {dns}")?;
        }
        for site in &self.virtual_network_sites {
            writeln!(f, "  - VNET {site}")?;
        }
        Ok(())
    }
}
