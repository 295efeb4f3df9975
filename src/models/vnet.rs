//! Azure classic Virtual Network site data model.

use super::RawXml;
use std::fmt;

/// A subnet inside a [`VirtualNetworkSite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    /// Name of the subnet.
    pub name: String,
    /// CIDR block of the subnet.
    pub address_prefix: String,
    /// Child elements other than `AddressPrefix` (e.g. `NetworkSecurityGroup`), kept verbatim.
    pub extra: Vec<RawXml>,
}

impl Subnet {
    pub fn new(name: &str, address_prefix: &str) -> Subnet {
        Subnet {
            name: name.to_string(),
            address_prefix: address_prefix.to_string(),
            extra: Vec::new(),
        }
    }
}

/// A `<VirtualNetworkSite>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VirtualNetworkSite {
    /// Identity key of the site.
    pub name: String,
    /// Azure region, e.g. "West Europe".
    pub location: Option<String>,
    /// Legacy sites are pinned to an affinity group instead of a location.
    pub affinity_group: Option<String>,
    /// CIDR prefixes of the `AddressSpace`.
    pub address_space: Vec<String>,
    /// Subnets in document order.
    pub subnets: Vec<Subnet>,
    /// Names of the DNS servers the site uses.
    pub dns_server_refs: Vec<String>,
    /// Child elements that are not modelled (e.g. `Gateway`), kept verbatim.
    pub extra: Vec<RawXml>,
}

impl fmt::Display for VirtualNetworkSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] ({} subnets, {})",
            self.name,
            self.address_space.join(", "),
            self.subnets.len(),
            self.location
                .as_deref()
                .or(self.affinity_group.as_deref())
                .unwrap_or("no location")
        )
    }
}
