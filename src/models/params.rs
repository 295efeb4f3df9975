//! Invocation values for a new virtual network.

/// Values used to build the new network section.
///
/// None of these are validated locally, malformed values are passed through
/// and only rejected by the provider on submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VnetParams {
    pub dns_server_name: String,
    pub dns_server_ip: String,
    pub vnet_name: String,
    pub location: String,
    pub vnet_address_range: String,
    pub subnet_name: String,
    pub subnet_address_range: String,
}
