//! Where the host serves this authenticator.

/// Resolves the fully qualified base URI of this authenticator instance.
///
/// The index handler is served at this URI and the callback below it, so it
/// doubles as the "start login again" target.
pub trait AuthenticatorInformationProvider: Send + Sync {
    fn authentication_uri(&self) -> &str;
}

/// A base URI fixed at startup, taken from configuration.
#[derive(Clone, Debug)]
pub struct StaticAuthenticatorInfo {
    authentication_uri: String,
}

impl StaticAuthenticatorInfo {
    pub fn new(authentication_uri: impl Into<String>) -> Self {
        Self {
            authentication_uri: authentication_uri.into(),
        }
    }
}

impl AuthenticatorInformationProvider for StaticAuthenticatorInfo {
    fn authentication_uri(&self) -> &str {
        &self.authentication_uri
    }
}
