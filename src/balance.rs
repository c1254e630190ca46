use crate::user::BalanceRecord;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// Failures talking to the balance service.
///
/// Serializable so the server can hand the exact kind back to the page.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BalanceError {
    #[error("balance service unreachable: {0}")]
    Network(String),
    #[error("balance service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected balance service response: {0}")]
    Schema(String),
}

/// Registers a user with the balance service and returns their record.
pub trait BalanceApi {
    fn register(
        &self,
        user_id: i64,
    ) -> impl Future<Output = Result<BalanceRecord, BalanceError>>;
}

/// Runs the exchange on the server; see [`crate::balance_client::HttpBalanceClient`].
#[server(RegisterUser, "/api")]
pub async fn register_user(
    user_id: i64,
) -> Result<Result<BalanceRecord, BalanceError>, ServerFnError> {
    let client = balance_client()?;
    Ok(client.register(user_id).await)
}

/// The client the server was started with, or one built from the
/// environment when none was provided.
#[cfg(feature = "ssr")]
fn balance_client() -> Result<crate::balance_client::HttpBalanceClient, ServerFnError> {
    use crate::{balance_client::HttpBalanceClient, config::AppConfig};
    use leptos::server_fn::error::NoCustomError;

    if let Some(client) = use_context::<HttpBalanceClient>() {
        return Ok(client);
    }
    let config = AppConfig::from_env().map_err(|e| {
        ServerFnError::<NoCustomError>::ServerError(format!("Bad configuration: {e}"))
    })?;
    HttpBalanceClient::from_config(&config).map_err(|e| {
        ServerFnError::<NoCustomError>::ServerError(format!(
            "Failed to build balance client: {e:?}"
        ))
    })
}

/// [`BalanceApi`] for the page: goes through [`register_user`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerFnBalance;

impl BalanceApi for ServerFnBalance {
    async fn register(&self, user_id: i64) -> Result<BalanceRecord, BalanceError> {
        flatten_call(register_user(user_id).await)
    }
}

// A call that never reached the balance service counts as a network failure.
fn flatten_call(
    call: Result<Result<BalanceRecord, BalanceError>, ServerFnError>,
) -> Result<BalanceRecord, BalanceError> {
    call.unwrap_or_else(|e| Err(BalanceError::Network(e.to_string())))
}
