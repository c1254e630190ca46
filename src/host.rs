//! Access to the Telegram in-app browser bridge (`window.Telegram.WebApp`).
//!
//! The bridge hands the page its launch parameters as a url-encoded
//! `initData` string. Its hash is passed through untouched; nothing here
//! verifies it.

use crate::user::HostUser;
use thiserror::Error;
use url::form_urlencoded;

#[derive(Debug, Error)]
pub enum InitDataError {
    #[error("init data `user` is not valid JSON: {0}")]
    MalformedUser(#[source] serde_json::Error),
    #[error("init data `auth_date` is not a unix timestamp: {0:?}")]
    InvalidAuthDate(String),
}

/// Launch parameters the host passes to the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitData {
    pub query_id: Option<String>,
    pub user: Option<HostUser>,
    pub auth_date: Option<i64>,
    pub start_param: Option<String>,
    pub hash: Option<String>,
}

impl InitData {
    pub fn parse(raw: &str) -> Result<Self, InitDataError> {
        let mut init_data = Self::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "query_id" => init_data.query_id = Some(value.into_owned()),
                "user" => {
                    let user = serde_json::from_str(&value).map_err(InitDataError::MalformedUser)?;
                    init_data.user = Some(user);
                }
                "auth_date" => {
                    let auth_date = value
                        .parse()
                        .map_err(|_| InitDataError::InvalidAuthDate(value.to_string()))?;
                    init_data.auth_date = Some(auth_date);
                }
                "start_param" => init_data.start_param = Some(value.into_owned()),
                "hash" => init_data.hash = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(init_data)
    }
}

/// The parts of the host API the app relies on.
pub trait HostBridge {
    /// Tells the host the page has finished loading.
    fn ready(&self);

    /// The raw `initData` string; empty when the page was not launched
    /// with any.
    fn raw_init_data(&self) -> String;

    fn init_data(&self) -> Result<InitData, InitDataError> {
        InitData::parse(&self.raw_init_data())
    }
}

/// Finds the host bridge, if the page is running inside one.
pub fn detect() -> Option<Box<dyn HostBridge>> {
    #[cfg(feature = "hydrate")]
    {
        web_app::TelegramWebApp::detect().map(|bridge| Box::new(bridge) as Box<dyn HostBridge>)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

#[cfg(feature = "hydrate")]
pub use web_app::TelegramWebApp;

#[cfg(feature = "hydrate")]
mod web_app {
    use super::HostBridge;
    use js_sys::{Function, Object, Reflect};
    use wasm_bindgen::{JsCast, JsValue};

    pub struct TelegramWebApp {
        web_app: Object,
    }

    impl TelegramWebApp {
        pub fn detect() -> Option<Self> {
            let window = web_sys::window()?;
            let telegram = property(&window, "Telegram")?;
            let web_app = property(&telegram, "WebApp")?;
            Some(Self {
                web_app: web_app.unchecked_into(),
            })
        }
    }

    fn property(target: &JsValue, key: &str) -> Option<JsValue> {
        Reflect::get(target, &JsValue::from_str(key))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
    }

    impl HostBridge for TelegramWebApp {
        fn ready(&self) {
            let Some(ready) = property(&self.web_app, "ready") else {
                return;
            };
            if let Some(ready) = ready.dyn_ref::<Function>() {
                if let Err(e) = ready.call0(&self.web_app) {
                    leptos::logging::warn!("WebApp.ready() failed: {e:?}");
                }
            }
        }

        fn raw_init_data(&self) -> String {
            property(&self.web_app, "initData")
                .and_then(|value| value.as_string())
                .unwrap_or_default()
        }
    }
}
