//! New network section construction.

use crate::models::{DnsServer, NetworkSection, Subnet, VirtualNetworkSite, VnetParams};

/// Build the section for a new virtual network.
///
/// The result has exactly one DNS server, and one site with one address
/// prefix, one subnet and a reference to that DNS server. Values are copied
/// as given.
pub fn build_new_section(params: &VnetParams) -> NetworkSection {
    let dns = DnsServer::new(&params.dns_server_name, &params.dns_server_ip);
    let site = VirtualNetworkSite {
        name: params.vnet_name.clone(),
        location: Some(params.location.clone()),
        affinity_group: None,
        address_space: vec![params.vnet_address_range.clone()],
        subnets: vec![Subnet::new(
            &params.subnet_name,
            &params.subnet_address_range,
        )],
        dns_server_refs: vec![dns.name.clone()],
        extra: vec![],
    };

    NetworkSection {
        dns_servers: vec![dns],
        local_network_sites: None,
        virtual_network_sites: vec![site],
    }
}
