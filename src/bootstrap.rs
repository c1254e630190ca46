//! Works out who is using the page when it first loads.

use crate::{
    balance::{BalanceApi, BalanceError},
    host::{HostBridge, InitDataError},
    user::User,
};
use leptos::logging::{log, warn};

pub const NO_HOST_WARNING: &str = "Not running inside Telegram.";
pub const NO_USER_WARNING: &str = "User data is undefined.";

/// How the user came to be (or not be) known.
#[derive(Debug)]
pub enum BootstrapOutcome {
    /// No host bridge; the placeholder user stands in.
    Standalone,
    /// The host supplied a user and the balance service knew them.
    Registered,
    /// The host was found but launched the page without a user.
    MissingHostUser,
    MalformedInitData(InitDataError),
    BalanceUnavailable(BalanceError),
}

impl BootstrapOutcome {
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Self::Standalone => Some(NO_HOST_WARNING),
            Self::MissingHostUser => Some(NO_USER_WARNING),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<String> {
        match self {
            Self::MalformedInitData(e) => Some(e.to_string()),
            Self::BalanceUnavailable(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Bootstrap {
    pub user: Option<User>,
    pub outcome: BootstrapOutcome,
}

/// Resolves the current user.
///
/// With a host: signals readiness, then exchanges the host's user with the
/// balance service exactly once. Without one: the placeholder user.
pub async fn bootstrap<H, B>(host: Option<&H>, balance: &B) -> Bootstrap
where
    H: HostBridge + ?Sized,
    B: BalanceApi,
{
    let Some(host) = host else {
        warn!("{NO_HOST_WARNING}");
        return Bootstrap {
            user: Some(User::placeholder()),
            outcome: BootstrapOutcome::Standalone,
        };
    };

    host.ready();

    let host_user = match host.init_data() {
        Ok(init_data) => init_data.user,
        Err(e) => {
            warn!("Ignoring host init data: {e}");
            return Bootstrap {
                user: None,
                outcome: BootstrapOutcome::MalformedInitData(e),
            };
        }
    };
    let Some(host_user) = host_user else {
        warn!("{NO_USER_WARNING}");
        return Bootstrap {
            user: None,
            outcome: BootstrapOutcome::MissingHostUser,
        };
    };

    match balance.register(host_user.id).await {
        Ok(record) => {
            log!(
                "User {} starts with {} tokens",
                host_user.id,
                record.tokens_balance
            );
            Bootstrap {
                user: Some(User::merge(host_user, record)),
                outcome: BootstrapOutcome::Registered,
            }
        }
        Err(e) => {
            warn!("Could not load balance for user {}: {e}", host_user.id);
            Bootstrap {
                user: None,
                outcome: BootstrapOutcome::BalanceUnavailable(e),
            }
        }
    }
}
