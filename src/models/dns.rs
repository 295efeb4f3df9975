//! DNS server entry model.

use std::fmt;

/// A `<DnsServer name="..." IPAddress="..."/>` entry.
///
/// The address is kept as given, it is only validated by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsServer {
    /// Identity key of the entry.
    pub name: String,
    /// IPv4 address of the server.
    pub ip_address: String,
}

impl DnsServer {
    pub fn new(name: &str, ip_address: &str) -> DnsServer {
        DnsServer {
            name: name.to_string(),
            ip_address: ip_address.to_string(),
        }
    }
}

impl fmt::Display for DnsServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.ip_address)
    }
}
