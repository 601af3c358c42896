use std::sync::Arc;
use std::time::Duration;

use auth::TokenService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use http::header;
use http::HeaderValue;
use http::Method;
use tower::ServiceBuilder;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::get_enquiry::get_enquiry;
use super::handlers::list_enquiries::list_enquiries;
use super::handlers::list_users::list_users;
use super::handlers::refresh_token::refresh_token;
use super::handlers::root::health;
use super::handlers::root::root;
use super::handlers::sign_in::login;
use super::handlers::sign_in::sign_in;
use super::handlers::submit_enquiry::submit_enquiry;
use super::handlers::user_stubs::delete_user;
use super::handlers::user_stubs::get_user;
use super::handlers::user_stubs::update_user;
use super::handlers::ApiError;
use super::handlers::ErrorMessage;
use super::middleware::require_admin;
use crate::domain::enquiry::ports::EnquiryServicePort;
use crate::domain::user::ports::UserServicePort;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub enquiry_service: Arc<dyn EnquiryServicePort>,
    pub token_service: Arc<TokenService>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    enquiry_service: Arc<dyn EnquiryServicePort>,
    token_service: Arc<TokenService>,
) -> Router {
    let state = AppState {
        user_service,
        enquiry_service,
        token_service,
    };

    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/enquiry", post(submit_enquiry))
        .route("/create-user", post(create_user))
        .route("/auth/signin", post(sign_in))
        .route("/auth/login", post(login));

    let protected_routes = Router::new()
        .route("/enquiries", get(list_enquiries))
        .route("/enquiries/:id", get(get_enquiry))
        .route("/auth/refresh", post(refresh_token))
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(PREFLIGHT_MAX_AGE);

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(middleware::map_response(envelope_method_not_allowed))
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(cors_layer)
                .layer(security_headers),
        )
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound(ErrorMessage::new(
        "Endpoint not found",
        "The requested endpoint does not exist",
    ))
}

/// Give the router's own bodiless 405 the standard error envelope, keeping
/// its `Allow` header.
async fn envelope_method_not_allowed(response: Response<Body>) -> Response<Body> {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut enveloped = ApiError::MethodNotAllowed(ErrorMessage::new(
        "Method not allowed",
        "The requested method is not supported for this endpoint",
    ))
    .into_response();

    if let Some(allow) = allow {
        enveloped.headers_mut().insert(header::ALLOW, allow);
    }

    enveloped
}
