use crate::authenticator::attributes::AuthenticationResult;
use crate::authenticator::authorize::STATE_SESSION_KEY;
use crate::authenticator::provider::{self, CodeExchange};
use crate::authenticator::redirect_uri::build_redirect_uri;
use crate::config::AuthenticatorConfig;
use crate::error::{AuthError, ExternalServiceError};
use crate::host::{AuthenticatorInformationProvider, HttpTransport, SessionStore};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Error code the provider sends when the user declines the authorization.
pub const ACCESS_DENIED: &str = "access_denied";

/// Query parameters StackExchange sends back to the callback.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CallbackRequest {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackRequest {
    /// The provider-reported error, if any. Empty values count as absent.
    fn provider_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Why a callback sends the user back to the start of the login.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestartReason {
    /// The user declined at StackExchange.
    AccessDenied,
    /// The user has no account on the configured site.
    NoSiteAccount,
}

#[derive(Debug)]
pub enum CallbackOutcome {
    Authenticated(AuthenticationResult),
    RestartLogin {
        location: String,
        reason: RestartReason,
    },
}

/// Completes a login: validates the callback, exchanges the code and maps the profile.
pub struct CallbackHandler<T, I> {
    config: Arc<AuthenticatorConfig>,
    transport: T,
    info: I,
}

impl<T, I> CallbackHandler<T, I>
where
    T: HttpTransport,
    I: AuthenticatorInformationProvider,
{
    pub fn new(config: Arc<AuthenticatorConfig>, transport: T, info: I) -> Self {
        Self {
            config,
            transport,
            info,
        }
    }

    #[tracing::instrument(name = "authentication_callback", skip_all)]
    pub async fn get(
        &self,
        request: CallbackRequest,
        session: &impl SessionStore,
    ) -> Result<CallbackOutcome, AuthError> {
        if let Some(code) = request.provider_error() {
            if code == ACCESS_DENIED {
                debug!("User declined the authorization at StackExchange");
                return Ok(self.restart(RestartReason::AccessDenied));
            }
            error!(
                error = code,
                error_description = ?request.error_description,
                "Got an error from StackExchange"
            );
            return Err(ExternalServiceError::ProviderError {
                code: code.to_string(),
                description: request.error_description.clone(),
            }
            .into());
        }

        validate_state(&request, session)?;

        let code = request
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or(AuthError::MissingCode)?;
        let redirect_uri = build_redirect_uri(self.info.authentication_uri())?;

        let access_token = provider::exchange_code(
            &self.transport,
            &CodeExchange {
                client_id: &self.config.client_id,
                client_secret: &self.config.client_secret,
                code,
                redirect_uri: &redirect_uri,
            },
        )
        .await?;

        let Some(profile) = provider::fetch_profile(
            &self.transport,
            &access_token,
            &self.config.app_key,
            &self.config.site,
        )
        .await?
        else {
            debug!(site = %self.config.site, "User has no account on the configured site");
            return Ok(self.restart(RestartReason::NoSiteAccount));
        };

        debug!(account_id = %profile.account_id, "StackExchange login completed");
        Ok(CallbackOutcome::Authenticated(
            AuthenticationResult::from_profile(profile, access_token),
        ))
    }

    pub fn post(&self) -> Result<CallbackOutcome, AuthError> {
        Err(AuthError::MethodNotAllowed)
    }

    fn restart(&self, reason: RestartReason) -> CallbackOutcome {
        CallbackOutcome::RestartLogin {
            location: self.info.authentication_uri().to_string(),
            reason,
        }
    }
}

/// The stored state is consumed whatever the outcome, so it can never be replayed.
fn validate_state(request: &CallbackRequest, session: &impl SessionStore) -> Result<(), AuthError> {
    let stored = session.remove(STATE_SESSION_KEY);
    match (stored.as_deref(), request.state.as_deref()) {
        (Some(expected), Some(received)) if !received.is_empty() && expected == received => Ok(()),
        (None, _) => {
            warn!("Callback arrived without a pending state in the session");
            Err(AuthError::InvalidState)
        }
        _ => {
            warn!("Callback state does not match the session");
            Err(AuthError::InvalidState)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SessionRegistry;

    fn session() -> crate::host::BrowserSession {
        SessionRegistry::new().session("test")
    }

    fn request(state: Option<&str>) -> CallbackRequest {
        CallbackRequest {
            code: Some("abc".into()),
            state: state.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn matching_state_is_accepted_once() {
        let session = session();
        session.put(STATE_SESSION_KEY, "s-1".into());
        assert!(validate_state(&request(Some("s-1")), &session).is_ok());
        assert!(matches!(
            validate_state(&request(Some("s-1")), &session),
            Err(AuthError::InvalidState)
        ));
    }

    #[test]
    fn mismatching_state_is_rejected_and_consumed() {
        let session = session();
        session.put(STATE_SESSION_KEY, "s-1".into());
        assert!(validate_state(&request(Some("S-1")), &session).is_err());
        assert_eq!(session.get(STATE_SESSION_KEY), None);
    }

    #[test]
    fn missing_states_are_rejected() {
        let session = session();
        assert!(validate_state(&request(Some("s-1")), &session).is_err());
        session.put(STATE_SESSION_KEY, "s-1".into());
        assert!(validate_state(&request(None), &session).is_err());
    }

    #[test]
    fn empty_error_is_not_a_provider_error() {
        let mut req = request(Some("s"));
        req.error = Some(String::new());
        assert_eq!(req.provider_error(), None);
        req.error = Some("temporarily_unavailable".into());
        assert_eq!(req.provider_error(), Some("temporarily_unavailable"));
    }
}
