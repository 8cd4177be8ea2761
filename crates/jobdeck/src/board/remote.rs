//! HTTP implementation of the automation gateway.

use std::collections::BTreeMap;
use std::future::Future;

use reqwest::Client;
use serde_json::json;

use super::domain::{Application, ApplicationId, ApplicationStatus};
use super::gateway::{ApplicationGateway, FetchError, SubmitError, UpdateError};

/// The automation backend URL did not parse.
#[derive(Debug, thiserror::Error)]
#[error("invalid automation api url '{url}': {reason}")]
pub struct InvalidBaseUrl {
    pub url: String,
    pub reason: String,
}

/// Gateway speaking the automation backend's REST surface.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, InvalidBaseUrl> {
        let trimmed = base_url.trim_end_matches('/');
        reqwest::Url::parse(trimmed).map_err(|err| InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            client: Client::new(),
            base: trimmed.to_string(),
        })
    }
}

impl ApplicationGateway for HttpGateway {
    fn list_applications(
        &self,
    ) -> impl Future<Output = Result<Vec<Application>, FetchError>> + Send {
        async move {
            let url = format!("{}/api/v1/applications", self.base);
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|err| FetchError::Transport(err.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Transport(format!("{url} returned {status}")));
            }
            response
                .json::<Vec<Application>>()
                .await
                .map_err(|err| FetchError::Decode(err.to_string()))
        }
    }

    fn update_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> impl Future<Output = Result<Application, UpdateError>> + Send {
        async move {
            let url = format!("{}/api/v1/applications/{id}/status", self.base);
            let response = self
                .client
                .patch(&url)
                .json(&json!({ "status": status }))
                .send()
                .await
                .map_err(|err| UpdateError::Transport(err.to_string()))?;
            let http_status = response.status();
            if http_status.is_client_error() {
                return Err(UpdateError::Rejected(format!(
                    "{url} returned {http_status}"
                )));
            }
            if !http_status.is_success() {
                return Err(UpdateError::Transport(format!(
                    "{url} returned {http_status}"
                )));
            }
            response
                .json::<Application>()
                .await
                .map_err(|err| UpdateError::Decode(err.to_string()))
        }
    }

    fn submit_fields(
        &self,
        id: ApplicationId,
        values: BTreeMap<String, String>,
    ) -> impl Future<Output = Result<(), SubmitError>> + Send {
        async move {
            let url = format!("{}/api/v1/applications/{id}/provide-fields", self.base);
            let response = self
                .client
                .post(&url)
                .json(&json!({ "fields": values }))
                .send()
                .await
                .map_err(|err| SubmitError::Transport(err.to_string()))?;
            let http_status = response.status();
            if http_status.is_client_error() {
                return Err(SubmitError::Rejected(format!(
                    "{url} returned {http_status}"
                )));
            }
            if !http_status.is_success() {
                return Err(SubmitError::Transport(format!(
                    "{url} returned {http_status}"
                )));
            }
            Ok(())
        }
    }
}
