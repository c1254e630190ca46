use crate::{
    balance::{BalanceApi, BalanceError},
    config::AppConfig,
    user::BalanceRecord,
};
use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;

const MAX_BODY_PREVIEW: usize = 256;

/// Minimal wrapper of the balance service's `POST /users/`.
#[derive(Clone, Debug)]
pub struct HttpBalanceClient {
    client: Client,
    endpoint: Url,
}

#[derive(Serialize)]
struct RegisterBody {
    user_id: i64,
}

impl HttpBalanceClient {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("lesson-mini-app/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build request client")?;
        let endpoint = base_url
            .join("users/")
            .with_context(|| format!("Failed to derive users endpoint from {base_url}"))?;

        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.balance_api_url, config.request_timeout)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl BalanceApi for HttpBalanceClient {
    async fn register(&self, user_id: i64) -> Result<BalanceRecord, BalanceError> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(&RegisterBody { user_id })
            .send()
            .await
            .map_err(|e| BalanceError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| BalanceError::Network(e.to_string()))?;
        if !status.is_success() {
            warn!("Balance service returned status={status} for user {user_id}");
            return Err(BalanceError::Status {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let record: BalanceRecord =
            serde_json::from_str(&body).map_err(|e| BalanceError::Schema(e.to_string()))?;
        debug!(
            "Registered user {user_id}, balance {}",
            record.tokens_balance
        );
        Ok(record)
    }
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_PREVIEW) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
