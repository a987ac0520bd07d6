// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    ApiDoc,
    handlers::{auth, catalogue, olympics, results, student_tests},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware, staff_middleware},
};

/// Assembles the main application router.
///
/// * Public reads and the auth endpoints need no token.
/// * Attempts, results and links need an authenticated user.
/// * Olympics writes need staff; catalogue writes need an admin.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/subjects", get(catalogue::list_subjects))
        .route("/api/olympics", get(olympics::list_olympics))
        .route("/api/olympics/{id}", get(olympics::get_olympic))
        .route(
            "/api/olympics/{id}/subjects",
            get(olympics::list_olympic_subjects),
        )
        .route("/api/olympics/{id}/results", get(results::list_results))
        .route("/api/olympic-results/{id}", get(results::get_result));

    let user_routes = Router::new()
        .route("/api/olympics/{id}/results", post(results::create_result))
        .route(
            "/api/olympics/{id}/student-tests",
            get(results::list_student_tests).post(results::link_student_test),
        )
        .route("/api/tests", post(student_tests::create_test))
        .route("/api/tests/{id}", get(student_tests::get_test))
        .route(
            "/api/tests/{id}/answers/{answer_id}",
            get(student_tests::get_answer).patch(student_tests::answer_question),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Auth first, then the role check; route_layer so unmatched paths stay 404
    let staff_routes = Router::new()
        .route("/api/olympics", post(olympics::create_olympic))
        .route(
            "/api/olympics/{id}",
            put(olympics::update_olympic).patch(olympics::update_olympic),
        )
        .route_layer(middleware::from_fn(staff_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/api/admin/subjects", post(catalogue::create_subject))
        .route("/api/admin/questions", post(catalogue::create_question))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(staff_routes)
        .merge(admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
