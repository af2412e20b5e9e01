//! OpenAPI/Utoipa configuration.

use crate::api::error::ErrorResponse;
use crate::api::health::MISC_TAG;
use utoipa::OpenApi;

/// OpenAPI documentation configuration.
///
/// The login endpoints are mounted at a configurable path and answer with
/// browser redirects, so only the static endpoints are described here.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "StackExchange Authenticator",
        version = "1.0.0",
        description = "Host for the StackExchange OAuth2 authorization-code login."
    ),
    components(schemas(ErrorResponse)),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints")
    )
)]
pub struct ApiDoc;
