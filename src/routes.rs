use crate::{
    config::ServerConfig,
    error::StudentsError,
    routes::students::{create_student, delete_student, get_student, list_students, update_student},
    state::StudentsState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::get,
};
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer};

pub mod students;

pub async fn not_found() -> StudentsError {
    StudentsError::RouteNotFound
}

pub async fn method_not_allowed() -> StudentsError {
    StudentsError::MethodNotAllowed
}

fn panic_into_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(ToString::to_string))
        .unwrap_or_else(|| "no panic message".to_string());

    StudentsError::Panicked { message }.into_response()
}

/// Body limits are enforced by the extractors so oversized bodies still get an envelope.
fn with_middleware(router: Router, server_config: &ServerConfig) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_into_response))
        .layer(DefaultBodyLimit::max(server_config.max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

pub fn router(state: StudentsState, server_config: &ServerConfig) -> Router {
    let routes = Router::new()
        .route("/api/students", get(list_students).post(create_student))
        .route(
            "/api/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state);

    with_middleware(routes, server_config)
}
