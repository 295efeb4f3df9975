//! Network configuration processing.
//!
//! This module contains the provisioning logic:
//! - [`template`] - Building the section for a new network
//! - [`merge`] - Merging an existing section into the new one
//! - [`provision`] - The build, fetch, merge, submit pipeline

mod merge;
mod provision;
mod template;

// Re-export public functions
pub use merge::merge_sections;
pub use provision::{preview_vnet, provision_vnet};
pub use template::build_new_section;
