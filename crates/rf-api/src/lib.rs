//! # rf-api
//!
//! The web routing and orchestration layer for Rusty-Fund.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod views;

use actix_web::web;

/// Configures the read-only routes for projects, discovery, search and users.
///
/// # Developer Note
/// Everything lives under `/api`, so the binary can serve a frontend bundle
/// from `/` without route clashes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/projects", web::get().to(handlers::project_index))
            .route("/projects/{project_id}", web::get().to(handlers::project_show))
            .route("/project_discovery", web::get().to(handlers::project_discovery))
            .route("/project_searches", web::get().to(handlers::project_searches))
            .route("/users/{user_id}", web::get().to(handlers::user_show)),
    );
}
