//! The StackExchange authorization-code login.
//!
//! Two handlers make up the flow:
//! - [`AuthorizationRedirector`] sends the browser to StackExchange with a fresh `state`
//! - [`CallbackHandler`] checks the returned `state`, exchanges the code for an
//!   access token, fetches the profile and maps it to an [`AuthenticationResult`]
//!
//! Both derive the callback URI with [`build_redirect_uri`], which keeps the
//! `redirect_uri` identical across the two steps.

pub mod attributes;
pub mod authorize;
pub mod callback;
pub mod descriptor;
pub mod provider;
pub mod redirect_uri;
pub mod scope;
pub mod site;

pub use attributes::{AuthenticationResult, ContextAttributes, Name, Photo, SubjectAttributes};
pub use authorize::{AuthorizationRedirector, STATE_SESSION_KEY};
pub use callback::{CallbackHandler, CallbackOutcome, CallbackRequest, RestartReason};
pub use redirect_uri::build_redirect_uri;
pub use scope::{Scope, ScopeSet};
pub use site::Site;

/// Instruction to send the browser elsewhere with a `302 Found`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
}

impl Redirect {
    pub fn to(location: String) -> Self {
        Self { location }
    }
}
