use stackexchange_authenticator::api::{AuthenticatorState, start_webserver};
use stackexchange_authenticator::config::load_config;
use stackexchange_authenticator::host::{HyperTransport, SessionRegistry, StaticAuthenticatorInfo};
use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

fn initialize_tracing() {
    let default_directives = "stackexchange_authenticator=info,hyper=warn,tower_http=info";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_target(true).with_level(true);

    registry.with(layer).init();
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    initialize_tracing();

    let config = load_config()?;
    let authenticator = Arc::new(config.authenticator);
    let session_config = Arc::new(config.session);
    tracing::info!(
        site = %authenticator.site,
        scopes = %authenticator.scopes.to_query_value(),
        authentication_uri = %authenticator.authentication_uri,
        "StackExchange authenticator configured"
    );

    let transport = HyperTransport::new(&authenticator.http_client)?;
    let info = StaticAuthenticatorInfo::new(authenticator.authentication_uri.clone());
    let sessions = SessionRegistry::new();

    // Prune login attempts that never came back from StackExchange
    {
        let sessions = sessions.clone();
        let max_age = Duration::from_secs(session_config.max_age_secs);
        tokio::spawn(async move {
            let mut interval = interval(SESSION_CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                sessions.cleanup_expired(max_age);
            }
        });
    }

    let state = AuthenticatorState::new(authenticator, transport, info, sessions, session_config);
    start_webserver(state, &config.listen_addr).await?;
    Ok(())
}
