//! Merge of an existing network section into a newly built one.

use crate::models::NetworkSection;
use std::collections::HashSet;

/// Merge `existing` into `new`, returning the combined section.
///
/// Existing DNS servers and virtual network sites are appended after the new
/// entries in their original order, except those whose name matches a new
/// entry: on a name collision the existing entry is dropped, never merged.
/// A non-empty `LocalNetworkSites` block is carried over whole.
pub fn merge_sections(new: &NetworkSection, existing: &NetworkSection) -> NetworkSection {
    let new_dns: HashSet<&str> = new.dns_servers.iter().map(|d| d.name.as_str()).collect();
    let new_sites: HashSet<&str> = new
        .virtual_network_sites
        .iter()
        .map(|s| s.name.as_str())
        .collect();

    let mut merged = new.clone();

    for dns in &existing.dns_servers {
        if new_dns.contains(dns.name.as_str()) {
            log::info!("DNS server '{}' replaced by new definition", dns.name);
            continue;
        }
        merged.dns_servers.push(dns.clone());
    }

    for site in &existing.virtual_network_sites {
        if new_sites.contains(site.name.as_str()) {
            log::info!("VNET '{}' replaced by new definition", site.name);
            continue;
        }
        merged.virtual_network_sites.push(site.clone());
    }

    if let Some(local) = &existing.local_network_sites {
        merged.local_network_sites = Some(local.clone());
    }

    log::debug!(
        "merged: {} dns (+{} existing), {} vnets (+{} existing)",
        merged.dns_servers.len(),
        existing.dns_servers.len(),
        merged.virtual_network_sites.len(),
        existing.virtual_network_sites.len()
    );
    merged
}
