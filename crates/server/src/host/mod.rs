//! Host-side capabilities the authenticator is given at construction.
//!
//! - `session` - per-browser key-value session storage
//! - `transport` - outbound HTTP to the provider
//! - `info` - the base URI this authenticator is served under

pub mod info;
pub mod session;
pub mod transport;

pub use info::{AuthenticatorInformationProvider, StaticAuthenticatorInfo};
pub use session::{BrowserSession, SessionRegistry, SessionStore};
pub use transport::{HttpResponse, HttpTransport, HyperTransport};
