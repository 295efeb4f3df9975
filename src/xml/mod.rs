//! Network configuration document codec.
//!
//! - [`parse`] - Read a provider document into a [`NetworkSection`](crate::models::NetworkSection)
//! - [`render`] - Write a section back out as a namespaced document

mod parse;
mod render;

use thiserror::Error;

pub use parse::parse_network_configuration;
pub use render::render_network_configuration;

/// Default namespace of the classic network configuration schema.
pub const NETWORK_CONFIGURATION_NS: &str =
    "http://schemas.microsoft.com/ServiceHosting/2011/07/NetworkConfiguration";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML near byte {position}: {message}")]
    Malformed { position: u64, message: String },
    #[error("document has no <NetworkConfiguration> root element")]
    MissingRoot,
    #[error("unexpected end of document inside <{0}>")]
    UnexpectedEof(String),
    #[error("failed to write XML: {0}")]
    Write(String),
}
