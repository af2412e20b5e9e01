//! HTTP host for the authenticator.
//!
//! This module is organized into submodules:
//! - `login` - the authenticator's index and callback endpoints
//! - `session` - session cookie extraction
//! - `error` - JSON error bodies
//! - `health` - Health check endpoint (/healthz)
//! - `openapi` - OpenAPI/Utoipa configuration

pub mod error;
pub mod health;
pub mod login;
pub mod openapi;
pub mod session;

pub use error::ErrorResponse;
pub use health::MISC_TAG;
pub use login::AuthenticatorState;

use crate::error::AuthError;
use crate::host::{AuthenticatorInformationProvider, HttpTransport};
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_redoc::{Redoc, Servable};

/// Builds the complete application router.
pub fn app<T, I>(state: AuthenticatorState<T, I>) -> Result<Router, AuthError>
where
    T: HttpTransport + 'static,
    I: AuthenticatorInformationProvider + 'static,
{
    let (router, api) = OpenApiRouter::with_openapi(openapi::ApiDoc::openapi())
        .routes(routes!(health::health))
        .split_for_parts();

    Ok(router
        .merge(login::router(state)?)
        .merge(Redoc::with_url("/api-docs", api))
        .layer(TraceLayer::new_for_http()))
}

/// Starts the web server with all configured routes.
#[tracing::instrument(skip(state))]
pub async fn start_webserver<T, I>(
    state: AuthenticatorState<T, I>,
    listen_addr: &str,
) -> color_eyre::Result<()>
where
    T: HttpTransport + 'static,
    I: AuthenticatorInformationProvider + 'static,
{
    let router = app(state)?;

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = listen_addr, "Server running");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}
