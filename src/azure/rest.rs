//! Network configuration through the Service Management REST API.

use super::{NetworkConfigClient, Session};
use crate::config::{MAX_POLLS, SERVICE_MANAGEMENT_VERSION, SLEEP_MSEC};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use std::time::Duration;

/// Asynchronous operation status returned by `GET .../operations/{id}`.
#[derive(Debug, Deserialize)]
struct Operation {
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "HttpStatusCode", default)]
    http_status_code: Option<u16>,
    #[serde(rename = "Error", default)]
    error: Option<OperationError>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(rename = "Code", default)]
    code: String,
    #[serde(rename = "Message", default)]
    message: String,
}

/// Blocking client for `{endpoint}/{subscription}/services/networking/media`.
pub struct ServiceManagementClient {
    http: Client,
    endpoint: String,
    session: Session,
    poll_interval: Duration,
}

impl ServiceManagementClient {
    pub fn new(endpoint: &str, session: Session) -> Result<ServiceManagementClient, Box<dyn Error>> {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| format!("Error building HTTP client: {e}"))?;
        Ok(ServiceManagementClient::with_http_client(http, endpoint, session))
    }

    pub fn with_http_client(http: Client, endpoint: &str, session: Session) -> ServiceManagementClient {
        ServiceManagementClient {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            session,
            poll_interval: Duration::from_millis(SLEEP_MSEC * 10),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> ServiceManagementClient {
        self.poll_interval = poll_interval;
        self
    }

    fn media_url(&self) -> String {
        format!(
            "{}/{}/services/networking/media",
            self.endpoint, self.session.subscription_id
        )
    }

    fn operation_url(&self, request_id: &str) -> String {
        format!(
            "{}/{}/operations/{request_id}",
            self.endpoint, self.session.subscription_id
        )
    }

    fn get(&self, url: &str) -> Result<(StatusCode, String), Box<dyn Error>> {
        log::debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .header("x-ms-version", SERVICE_MANAGEMENT_VERSION)
            .bearer_auth(&self.session.access_token)
            .send()?;
        let status = response.status();
        let body = response.text()?;
        Ok((status, body))
    }

    /// Poll an asynchronous operation until it leaves `InProgress`.
    fn wait_for_operation(&self, request_id: &str) -> Result<(), Box<dyn Error>> {
        let url = self.operation_url(request_id);
        for poll in 0..MAX_POLLS {
            let (status, body) = self.get(&url)?;
            if !status.is_success() {
                return Err(format!("Operation {request_id} status query failed: {status} {body}").into());
            }
            let operation = parse_operation(&body)?;
            log::info!("operation {} poll#{poll:2} status={}", operation.id, operation.status);
            match operation.status.as_str() {
                "InProgress" => std::thread::sleep(self.poll_interval),
                "Succeeded" => return Ok(()),
                _ => return Err(operation_failure(&operation).into()),
            }
        }
        Err(format!("Operation {request_id} still in progress after {MAX_POLLS} polls").into())
    }
}

impl NetworkConfigClient for ServiceManagementClient {
    fn fetch_configuration(&self) -> Result<Option<String>, Box<dyn Error>> {
        let (status, body) = self.get(&self.media_url())?;
        match status {
            StatusCode::NOT_FOUND => {
                log::warn!("Subscription has no network configuration");
                Ok(None)
            }
            s if s.is_success() => {
                log::info!("Got network configuration, {} bytes", body.len());
                Ok(Some(body))
            }
            s => Err(format!("Get network configuration failed: {s} {}", body.trim()).into()),
        }
    }

    fn apply_configuration(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let body = std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
        let url = self.media_url();
        log::debug!("PUT {url} ({} bytes)", body.len());
        let response = self
            .http
            .put(&url)
            .header("x-ms-version", SERVICE_MANAGEMENT_VERSION)
            .header(CONTENT_TYPE, "text/plain")
            .bearer_auth(&self.session.access_token)
            .body(body)
            .send()?;

        let status = response.status();
        let request_id = response
            .headers()
            .get("x-ms-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text()?;
        if !status.is_success() {
            return Err(format!("Set network configuration failed: {status} {}", text.trim()).into());
        }

        match (status, request_id) {
            (StatusCode::ACCEPTED, Some(request_id)) => self.wait_for_operation(&request_id),
            _ => Ok(()),
        }
    }
}

fn parse_operation(body: &str) -> Result<Operation, Box<dyn Error>> {
    let mut deserializer = quick_xml::de::Deserializer::from_str(body);
    let operation: Operation = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("Error parsing operation status: path={} error={}", e.path(), e))?;
    Ok(operation)
}

fn operation_failure(operation: &Operation) -> String {
    match &operation.error {
        Some(error) => format!(
            "Operation {} {} ({}): {}: {}",
            operation.id,
            operation.status,
            operation.http_status_code.unwrap_or_default(),
            error.code,
            error.message
        ),
        None => format!("Operation {} {}", operation.id, operation.status),
    }
}
