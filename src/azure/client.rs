//! Remote network configuration access.

use std::error::Error;
use std::path::Path;

/// Read and write access to a subscription's network configuration.
///
/// Both calls are synchronous and all-or-nothing; callers do not retry.
pub trait NetworkConfigClient {
    /// Current configuration document, `None` when the subscription has none.
    fn fetch_configuration(&self) -> Result<Option<String>, Box<dyn Error>>;

    /// Replace the subscription's configuration with the document at `path`.
    fn apply_configuration(&self, path: &Path) -> Result<(), Box<dyn Error>>;
}

impl<C: NetworkConfigClient + ?Sized> NetworkConfigClient for Box<C> {
    fn fetch_configuration(&self) -> Result<Option<String>, Box<dyn Error>> {
        (**self).fetch_configuration()
    }

    fn apply_configuration(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        (**self).apply_configuration(path)
    }
}
