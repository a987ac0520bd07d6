// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub use routes::create_router;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Olympics API",
        version = "1.0.0",
        description = "Olympics events, subjects, results and student test attempts"
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::catalogue::list_subjects,
        handlers::catalogue::create_subject,
        handlers::catalogue::create_question,
        handlers::olympics::list_olympics,
        handlers::olympics::create_olympic,
        handlers::olympics::get_olympic,
        handlers::olympics::update_olympic,
        handlers::olympics::list_olympic_subjects,
        handlers::results::list_results,
        handlers::results::create_result,
        handlers::results::get_result,
        handlers::results::list_student_tests,
        handlers::results::link_student_test,
        handlers::student_tests::create_test,
        handlers::student_tests::get_test,
        handlers::student_tests::get_answer,
        handlers::student_tests::answer_question,
    ),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Catalogue", description = "Subjects and the question bank"),
        (name = "Olympics", description = "Olympics events and their subject slots"),
        (name = "Results", description = "Scored submissions and linked attempts"),
        (name = "Tests", description = "Student test attempts and answers"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
