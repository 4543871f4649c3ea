//! EcoCollect HTTP client implementation.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use ecocollect_core::{ReportId, Role, User, WasteReport};

use crate::error::ClientError;

/// EcoCollect API client.
///
/// Carries the user's JWT; one client per signed-in account.
#[derive(Debug, Clone)]
pub struct EcoCollectClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Fields a resident supplies when filing a report. The service forces
/// the initial status and timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReport {
    /// Free-text location description.
    pub location_text: String,
    /// Latitude of the reported site.
    pub latitude: f64,
    /// Longitude of the reported site.
    pub longitude: f64,
    /// Reference to the uploaded waste photo.
    pub waste_photo_url: String,
}

#[derive(Debug, Serialize)]
struct CreateProfileBody<'a> {
    name: &'a str,
    email: &'a str,
    role: Role,
}

#[derive(Debug, Serialize)]
struct CollectBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pickup_photo_url: Option<&'a str>,
}

/// Error envelope returned by the service.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

impl EcoCollectClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g. `"http://ecocollect:8080"`)
    /// * `token` - The user's JWT from the identity service
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_options(base_url, token, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(
        base_url: impl Into<String>,
        token: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Create the profile record after signing up with the identity
    /// service.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an
    /// error (`Conflict` if the profile already exists).
    pub async fn create_profile(
        &self,
        name: &str,
        email: &str,
        role: Role,
    ) -> Result<User, ClientError> {
        let url = format!("{}/v1/users", self.base_url);
        let body = CreateProfileBody { name, email, role };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the current user's profile, including reward points.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an
    /// error.
    pub async fn get_profile(&self) -> Result<User, ClientError> {
        let url = format!("{}/v1/users/me", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// File a new waste report (residents only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an
    /// error.
    pub async fn create_report(&self, report: CreateReport) -> Result<WasteReport, ClientError> {
        let url = format!("{}/v1/reports", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&report)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List the caller's reports: residents see what they filed, workers
    /// see what is assigned to them. Newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an
    /// error.
    pub async fn list_reports(&self) -> Result<Vec<WasteReport>, ClientError> {
        let url = format!("{}/v1/reports", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Fetch one report.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an
    /// error.
    pub async fn get_report(&self, id: &ReportId) -> Result<WasteReport, ClientError> {
        let url = format!("{}/v1/reports/{id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Mark a report collected (assigned worker only). Finalization and
    /// reward crediting happen server-side once the completion handler
    /// observes the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an
    /// error (`Conflict` if the report is not in a collectable state).
    pub async fn collect_report(
        &self,
        id: &ReportId,
        pickup_photo_url: Option<&str>,
    ) -> Result<WasteReport, ClientError> {
        let url = format!("{}/v1/reports/{id}/collect", self.base_url);
        let body = CollectBody { pickup_photo_url };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code;
                let message = api_error.error.message;

                match code.as_str() {
                    "unauthorized" => Err(ClientError::Unauthorized),
                    "forbidden" => Err(ClientError::Forbidden(message)),
                    "not_found" => Err(ClientError::NotFound(message)),
                    "conflict" => Err(ClientError::Conflict(message)),
                    _ => Err(ClientError::Api {
                        code,
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = EcoCollectClient::new("http://localhost:8080", "jwt");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = EcoCollectClient::new("http://localhost:8080/", "jwt");
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
