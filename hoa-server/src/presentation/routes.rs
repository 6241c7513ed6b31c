//! Route definitions and server setup

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hoa_core::Config;
use hoa_core::domain::community::Community;
use hoa_core::domain::entitlement::{Entitlements, GrantMode};
use hoa_core::domain::export::ExportFormat;

use crate::presentation::{
    controllers::{
        AppState,
        analytics::record_event,
        billing::{create_checkout, verify_payment},
        communities::{create_community, list_communities},
        email::send_email,
        entitlements::get_entitlements,
        export::export_letter,
        health::health_check,
        letters::generate_letter,
    },
    middleware::{logging_middleware, sanitize_errors_middleware, security_headers_middleware},
    models::*,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::health::health_check,
        crate::presentation::controllers::entitlements::get_entitlements,
        crate::presentation::controllers::billing::create_checkout,
        crate::presentation::controllers::billing::verify_payment,
        crate::presentation::controllers::letters::generate_letter,
        crate::presentation::controllers::export::export_letter,
        crate::presentation::controllers::email::send_email,
        crate::presentation::controllers::communities::list_communities,
        crate::presentation::controllers::communities::create_community,
        crate::presentation::controllers::analytics::record_event
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            Entitlements,
            GrantMode,
            ExportFormat,
            CheckoutRequest,
            CheckoutResponse,
            VerifyPaymentResponse,
            GenerateLetterRequest,
            GenerateLetterResponse,
            ExportLetterRequest,
            SendEmailRequest,
            CreateCommunityRequest,
            Community,
            OkResponse
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "entitlements", description = "Capabilities derived from the signed hoa_entitlements cookie"),
        (name = "billing", description = "Hosted checkout and payment confirmation"),
        (name = "letters", description = "Letter drafting, export and email delivery"),
        (name = "communities", description = "Community branding and guideline profiles"),
        (name = "analytics", description = "Client event sink")
    ),
    info(
        title = "HOA Letters API",
        version = "0.1.0",
        description = "Drafts HOA violation letters and gates export and email behind a signed, cookie-held entitlement.",
        license(
            name = "AGPL-3.0",
            url = "https://www.gnu.org/licenses/agpl-3.0.html"
        )
    )
)]
pub struct ApiDoc;

async fn root_handler() -> Response {
    axum::Json(serde_json::json!({
        "name": "HOA Letters API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "api": "/api",
            "docs": "/docs"
        }
    }))
    .into_response()
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let headers = [
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::USER_AGENT,
        header::ORIGIN,
        header::ACCESS_CONTROL_REQUEST_METHOD,
        header::ACCESS_CONTROL_REQUEST_HEADERS,
    ];

    if allowed_origins.len() == 1 && allowed_origins[0] == "*" {
        // Browsers refuse credentials with a wildcard origin, so the cookie
        // only works same-origin in this mode.
        tracing::warn!(
            "CORS: Using wildcard origin (*) - the entitlement cookie will NOT be sent cross-origin"
        );
        CorsLayer::new()
            .allow_origin(AllowOrigin::any())
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(false)
            .max_age(Duration::from_secs(3600))
    } else {
        tracing::debug!("CORS: Configured with specific origins and credentials enabled");

        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| {
                        tracing::warn!(origin, "Invalid CORS origin in config; skipping");
                    })
                    .ok()
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true)
            .max_age(Duration::from_secs(3600))
    }
}

/// Create the application router with the full middleware stack
pub fn create_router(state: AppState, config: Arc<Config>) -> Router {
    let api_routes = Router::new()
        .route("/entitlements", get(get_entitlements))
        .route("/checkout", post(create_checkout))
        .route("/verify-payment", post(verify_payment).get(verify_payment))
        .route("/generate", post(generate_letter))
        .route("/export/{format}", post(export_letter))
        .route("/email", post(send_email))
        .route(
            "/communities",
            get(list_communities).post(create_community),
        )
        .route("/analytics", post(record_event));

    let health_routes = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check));

    let mut router = Router::new()
        .nest("/api", api_routes)
        .merge(health_routes);

    // Conditionally expose Swagger UI based on configuration (avoid leaking docs in production).
    if config.server.enable_docs {
        router =
            router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    if config.server.security.sanitize_errors {
        router = router.layer(middleware::from_fn(sanitize_errors_middleware));
    }

    if config.server.security.enable_security_headers {
        router = router.layer(middleware::from_fn(security_headers_middleware));
    }

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server.allowed_origins))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_seconds),
        ))
        .layer(middleware::from_fn(logging_middleware));

    router.layer(service_builder).with_state(state)
}
