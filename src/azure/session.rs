//! Authenticated session for the Service Management API.

use super::cli;
use crate::config::MANAGEMENT_RESOURCE;
use serde::Deserialize;
use std::error::Error;
use std::fmt;

/// Subscription and bearer token used by [`ServiceManagementClient`](super::ServiceManagementClient).
#[derive(Clone)]
pub struct Session {
    pub subscription_id: String,
    pub access_token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("subscription_id", &self.subscription_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Output of `az account get-access-token --output json`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AzAccessToken {
    access_token: String,
    subscription: String,
    #[serde(default)]
    expires_on: Option<String>,
}

impl Session {
    pub fn new(subscription_id: &str, access_token: &str) -> Session {
        Session {
            subscription_id: subscription_id.to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Build a session from the Azure CLI login.
    ///
    /// Values already known (e.g. from the environment) take precedence over
    /// what the CLI reports.
    pub fn from_az_cli(
        subscription_id: Option<&str>,
        access_token: Option<&str>,
    ) -> Result<Session, Box<dyn Error>> {
        if let (Some(subscription_id), Some(access_token)) = (subscription_id, access_token) {
            return Ok(Session::new(subscription_id, access_token));
        }

        let mut cmd =
            format!("az account get-access-token --resource {MANAGEMENT_RESOURCE} --output json");
        if let Some(subscription_id) = subscription_id {
            cmd.push_str(&format!(" --subscription {subscription_id}"));
        }
        let output = cli::run(&cmd)?;
        let token = parse_access_token(&output)?;
        log::info!(
            "Using az cli token for subscription {} (expires {})",
            token.subscription,
            token.expires_on.as_deref().unwrap_or("unknown")
        );

        Ok(Session {
            subscription_id: subscription_id
                .map(str::to_string)
                .unwrap_or(token.subscription),
            access_token: access_token
                .map(str::to_string)
                .unwrap_or(token.access_token),
        })
    }
}

fn parse_access_token(output: &str) -> Result<AzAccessToken, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(output);
    let token: AzAccessToken = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("Error parsing az access token: path={} error={}", e.path(), e))?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_access_token() {
        let json = std::fs::read_to_string("src/tests/test_data/az_access_token.json")
            .expect("Error reading test data");
        let token = parse_access_token(&json).expect("Error parsing token");
        assert_eq!(token.subscription, "00000000-1111-2222-3333-444444444444");
        assert!(token.access_token.starts_with("eyJ"));
        assert_eq!(token.expires_on.as_deref(), Some("2026-10-18 12:00:00.000000"));
    }

    #[test]
    fn test_parse_access_token_reports_path() {
        let err = parse_access_token(r#"{"accessToken": 42, "subscription": "x"}"#)
            .expect_err("Should fail on numeric token");
        assert!(err.to_string().contains("path=accessToken"));
    }

    #[test]
    fn test_explicit_values_skip_cli() {
        let session = Session::from_az_cli(Some("sub"), Some("token")).expect("No cli needed");
        assert_eq!(session.subscription_id, "sub");
        assert_eq!(session.access_token, "token");
        assert!(!format!("{session:?}").contains("token\""));
    }
}
