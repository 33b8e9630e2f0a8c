// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, feedback, likes, results, sections, tests},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Nests the auth, test, section and user sub-routers under `/api`.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store, config, identity provider).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
        HeaderValue::from_static("http://localhost:5173"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/signup", post(auth::sign_up))
        .route("/signin", post(auth::sign_in))
        .route("/signout", post(auth::sign_out))
        .route("/session", get(auth::get_session))
        .route("/user", put(auth::update_user));

    let test_routes = Router::new()
        .route("/", get(tests::list_tests).post(tests::create_test))
        .route("/{id}", get(tests::get_test).put(tests::update_test))
        .route("/{id}/paper", get(tests::get_paper))
        .route("/{id}/like", post(likes::toggle_like))
        .route("/{id}/likes", get(likes::like_count))
        .route("/{id}/like-status", get(likes::like_status))
        .route(
            "/{id}/sections",
            get(sections::list_test_sections).put(sections::assign_sections),
        )
        .route(
            "/{id}/results",
            get(results::list_test_results).post(results::submit_attempt),
        )
        .route(
            "/{id}/feedback",
            get(feedback::list_feedback).post(feedback::submit_feedback),
        );

    let section_routes = Router::new()
        .route("/", get(sections::list_sections).post(sections::create_section))
        .route(
            "/{id}",
            put(sections::update_section).delete(sections::delete_section),
        );

    let user_routes = Router::new()
        .route("/{id}/tests", get(tests::list_user_tests))
        .route("/{id}/results", get(results::list_user_results));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/tests", test_routes)
        .nest("/api/sections", section_routes)
        .nest("/api/users", user_routes)
        // Global Middleware (outermost first)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
