use crate::authenticator::descriptor::CALLBACK;
use crate::error::AuthError;
use url::Url;

/// Compute the callback URI for the authenticator served at `authentication_uri`.
///
/// The provider compares the `redirect_uri` of the authorization request with
/// the one sent during the code exchange, so both steps must call this with the
/// same base URI. Scheme, host and port are kept; query and fragment are dropped.
pub fn build_redirect_uri(authentication_uri: &str) -> Result<String, AuthError> {
    let invalid = |reason: String| AuthError::InvalidRedirectUri {
        uri: authentication_uri.to_string(),
        reason,
    };

    let mut url = Url::parse(authentication_uri).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid("not an absolute http(s) URL".into()));
    }

    let path = format!("{}/{CALLBACK}", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_callback_segment() {
        assert_eq!(
            build_redirect_uri("https://login.example.com/authn/authentication/se1").unwrap(),
            "https://login.example.com/authn/authentication/se1/callback"
        );
    }

    #[test]
    fn keeps_port_and_scheme() {
        assert_eq!(
            build_redirect_uri("http://localhost:8443/authn/se").unwrap(),
            "http://localhost:8443/authn/se/callback"
        );
    }

    #[test]
    fn trailing_slash_does_not_double() {
        assert_eq!(
            build_redirect_uri("https://idp.example.com/authn/se/").unwrap(),
            "https://idp.example.com/authn/se/callback"
        );
        assert_eq!(
            build_redirect_uri("https://idp.example.com").unwrap(),
            "https://idp.example.com/callback"
        );
    }

    #[test]
    fn drops_query_and_fragment() {
        assert_eq!(
            build_redirect_uri("https://idp.example.com/authn/se?x=1#frag").unwrap(),
            "https://idp.example.com/authn/se/callback"
        );
    }

    #[test]
    fn is_deterministic() {
        let base = "https://idp.example.com:9443/authn/authentication/stackexchange";
        assert_eq!(build_redirect_uri(base).unwrap(), build_redirect_uri(base).unwrap());
    }

    #[test]
    fn rejects_unparseable_or_non_http() {
        for bad in ["not a url", "/relative/path", "mailto:someone@example.com", ""] {
            match build_redirect_uri(bad) {
                Err(AuthError::InvalidRedirectUri { uri, .. }) => assert_eq!(uri, bad),
                other => panic!("expected InvalidRedirectUri for {bad:?}, got {other:?}"),
            }
        }
    }
}
