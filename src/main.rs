#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::{anyhow, Context};
    use axum::Router;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use lesson_mini_app::{
        balance_client::HttpBalanceClient,
        config::AppConfig,
        ui::{shell, App},
    };
    use log::info;
    use std::time::Duration;
    use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

    dotenvy::dotenv().ok();

    let level = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(level).init();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let balance = HttpBalanceClient::from_config(&config)?;
    info!("Balance service at {}", balance.endpoint());

    let conf =
        get_configuration(None).map_err(|e| anyhow!("Failed to read Leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let routes = generate_route_list(App);

    let app = Router::new()
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            move || provide_context(balance.clone()),
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptos_options)
        .layer((
            TraceLayer::new_for_http(),
            // Leave room for a balance call that runs up to its own timeout.
            TimeoutLayer::new(config.request_timeout + Duration::from_secs(5)),
        ));

    info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to server socket {addr}"))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to serve app")
}

#[cfg(feature = "ssr")]
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(not(feature = "ssr"))]
pub fn main() {
    // The browser build starts from `lesson_mini_app::hydrate`.
}
