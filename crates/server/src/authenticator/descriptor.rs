//! How the authenticator presents itself to a host.

/// Type identifier hosts register this authenticator under.
pub const PLUGIN_IMPLEMENTATION_TYPE: &str = "stackexchange";

/// Name of the handler that starts the login.
pub const INDEX: &str = "index";

/// Name of the callback handler, also its path segment below the authentication URI.
pub const CALLBACK: &str = "callback";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandlerKind {
    /// [`AuthorizationRedirector`](super::AuthorizationRedirector)
    Authorization,
    /// [`CallbackHandler`](super::CallbackHandler)
    Callback,
}

impl HandlerKind {
    /// Route below the authentication URI the handler is mounted at.
    pub fn route_path(self) -> String {
        match self {
            HandlerKind::Authorization => "/".to_string(),
            HandlerKind::Callback => format!("/{CALLBACK}"),
        }
    }
}

/// The handler table: name to handler, in registration order.
pub fn handler_types() -> [(&'static str, HandlerKind); 2] {
    [
        (INDEX, HandlerKind::Authorization),
        (CALLBACK, HandlerKind::Callback),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_index_and_callback() {
        let table = handler_types();
        assert_eq!(table[0], ("index", HandlerKind::Authorization));
        assert_eq!(table[1], ("callback", HandlerKind::Callback));
    }

    #[test]
    fn route_paths() {
        assert_eq!(HandlerKind::Authorization.route_path(), "/");
        assert_eq!(HandlerKind::Callback.route_path(), "/callback");
        assert_eq!(PLUGIN_IMPLEMENTATION_TYPE, "stackexchange");
    }
}
