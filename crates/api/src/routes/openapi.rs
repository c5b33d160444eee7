//! OpenAPI documentation and Swagger UI routes.

use axum::{
    body::Body,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};
use rust_embed::Embed;

/// Swagger UI shell pages from the assets/swagger-ui directory.
#[derive(Embed)]
#[folder = "assets/swagger-ui/"]
struct SwaggerAssets;

/// OpenAPI document describing the booking API.
const OPENAPI_SPEC: &str = include_str!("../../../../docs/api/openapi.yaml");

/// Redirect `/api/docs` to `/api/docs/` (trailing slash).
pub async fn swagger_ui_redirect() -> Redirect {
    Redirect::permanent("/api/docs/")
}

/// Resolves a request path below `/api/docs/` to an asset name.
fn asset_path(uri_path: &str) -> &str {
    let path = uri_path.trim_start_matches("/api/docs/");
    if path.is_empty() {
        "index.html"
    } else {
        path
    }
}

/// Serve the Swagger UI page or one of its static assets.
pub async fn swagger_ui(uri: Uri) -> Response {
    let path = asset_path(uri.path());

    match SwaggerAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime.as_ref())
                .header(header::CACHE_CONTROL, "public, max-age=3600")
                .body(Body::from(content.data.into_owned()))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve the OpenAPI YAML document at `/api/docs/openapi.yaml`.
pub async fn openapi_spec() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/yaml; charset=utf-8")],
        OPENAPI_SPEC,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_structure() {
        for section in ["openapi:", "info:", "paths:", "components:"] {
            assert!(OPENAPI_SPEC.contains(section), "missing {}", section);
        }
    }

    #[test]
    fn test_openapi_spec_documents_resources() {
        for endpoint in [
            "/api/v1/units",
            "/api/v1/bookings",
            "/api/v1/payments",
            "/api/v1/users",
        ] {
            assert!(
                OPENAPI_SPEC.contains(endpoint),
                "OpenAPI spec should document {}",
                endpoint
            );
        }
    }

    #[test]
    fn test_swagger_assets_embedded() {
        assert!(SwaggerAssets::get("index.html").is_some());
        let init = SwaggerAssets::get("swagger-init.js").unwrap();
        let script = std::str::from_utf8(&init.data).unwrap();
        assert!(script.contains("/api/docs/openapi.yaml"));
    }

    #[test]
    fn test_asset_path() {
        assert_eq!(asset_path("/api/docs/"), "index.html");
        assert_eq!(asset_path("/api/docs/index.html"), "index.html");
        assert_eq!(asset_path("/api/docs/swagger-init.js"), "swagger-init.js");
    }
}
