//! Pipeline stages and failures.

use crate::xml::XmlError;
use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Progress of a provisioning run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    Built,
    Fetched,
    Merged,
    Submitted,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Built => "built",
            Stage::Fetched => "fetched",
            Stage::Merged => "merged",
            Stage::Submitted => "submitted",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// A failed provisioning run. Underlying errors are kept as the source.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Couldn't fetch the current network configuration! Reason: {0}")]
    Fetch(#[source] Box<dyn StdError>),
    #[error("Current network configuration is not usable! Reason: {0}")]
    Parse(#[source] XmlError),
    #[error("Couldn't render the merged network configuration! Reason: {0}")]
    Render(#[source] XmlError),
    #[error("Couldn't write configuration file {path:?}! Reason: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Couldn't apply the network configuration! Reason: {0}")]
    Submit(#[source] Box<dyn StdError>),
    #[error("Couldn't read back the applied network configuration! Reason: {0}")]
    Confirm(#[source] Box<dyn StdError>),
}

impl ProvisionError {
    /// Last stage that completed before the run failed.
    pub fn failed_after(&self) -> Stage {
        match self {
            ProvisionError::Fetch(_) => Stage::Built,
            ProvisionError::Parse(_) => Stage::Built,
            ProvisionError::Render(_) => Stage::Merged,
            ProvisionError::Write { .. } => Stage::Merged,
            ProvisionError::Submit(_) => Stage::Merged,
            ProvisionError::Confirm(_) => Stage::Submitted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(Stage::Start < Stage::Built);
        assert!(Stage::Built < Stage::Fetched);
        assert!(Stage::Fetched < Stage::Merged);
        assert!(Stage::Merged < Stage::Submitted);
        assert!(Stage::Submitted < Stage::Done);
    }

    #[test]
    fn test_error_keeps_source_message() {
        let err = ProvisionError::Submit("BadRequest: address range not valid".into());
        assert_eq!(err.failed_after(), Stage::Merged);
        assert!(err.to_string().contains("BadRequest: address range not valid"));
        assert!(err.source().is_some());
    }
}
