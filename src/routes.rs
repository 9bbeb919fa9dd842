// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, course, lookup, profile, question, review, student},
    state::AppState,
    utils::jwt::{auth_middleware, educator_middleware, student_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, lookups, profiles, courses, questions, student).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let lookup_routes = Router::new()
        .route("/levels", get(lookup::list_levels))
        .route("/programs", get(lookup::list_programs));

    let profile_routes = Router::new()
        .route("/me", get(profile::get_me).put(profile::upsert_me))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Course management, the question bank, and the review/publish
    // workflow all require an owning educator.
    let course_routes = Router::new()
        .route("/", get(course::list_my_courses).post(course::create_course))
        .route("/{id}", get(course::get_course))
        .route("/{id}/materials", get(course::list_materials))
        .route("/{id}/questions", get(question::list_course_questions))
        .route(
            "/{id}/review",
            post(review::begin_review).get(review::get_draft),
        )
        .route("/{id}/review/publish", post(review::publish_draft))
        .route("/{id}/review/discard", post(review::discard_draft))
        .route(
            "/{id}/review/questions/{index}",
            put(review::edit_draft_question).delete(review::delete_draft_question),
        )
        .route(
            "/{id}/review/questions/{index}/choices/{choice}",
            put(review::edit_draft_choice),
        )
        // Double middleware protection: Auth first, then role check
        .layer(middleware::from_fn(educator_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let question_routes = Router::new()
        .route(
            "/{id}",
            put(question::update_question).delete(question::delete_question),
        )
        .layer(middleware::from_fn(educator_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let student_routes = Router::new()
        .route("/courses", get(student::list_courses))
        .route("/courses/{id}/review", get(student::review_feed))
        .route("/questions/{id}/answer", post(student::submit_answer))
        .layer(middleware::from_fn(student_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/lookups", lookup_routes)
        .nest("/api/profiles", profile_routes)
        .nest("/api/courses", course_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/student", student_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
