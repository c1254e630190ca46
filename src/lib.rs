pub mod balance;
#[cfg(feature = "ssr")]
pub mod balance_client;
pub mod bootstrap;
#[cfg(feature = "ssr")]
pub mod config;
pub mod context;
pub mod course;
pub mod host;
pub mod lesson;
pub mod ui;
pub mod user;

pub use context::{try_use_global_context, use_global_context, GlobalContext, GlobalProvider};
pub use course::Course;
pub use lesson::{ContentBlock, Lesson};
pub use user::{TokenError, User};

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(ui::App);
}
