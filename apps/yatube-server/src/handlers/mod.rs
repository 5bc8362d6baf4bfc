//! HTTP handlers and route configuration.

mod auth;
mod groups;
mod health;
mod posts;
mod presenters;

use actix_web::{HttpRequest, HttpResponse, web};
use yatube_shared::ErrorResponse;

use crate::middleware::error::AppError;
use crate::observability::RequestId;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _| AppError::NotFound(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    )
    // Pages
    .route("/", web::get().to(posts::index))
    .route("/group/{slug}/", web::get().to(posts::group_posts))
    .route("/profile/{username}/", web::get().to(posts::profile))
    .route("/posts/{post_id}/", web::get().to(posts::post_detail))
    .service(
        web::resource("/create/")
            .route(web::get().to(posts::post_create_form))
            .route(web::post().to(posts::post_create)),
    )
    .service(
        web::resource("/posts/{post_id}/edit/")
            .route(web::get().to(posts::post_edit_form))
            .route(web::post().to(posts::post_edit)),
    )
    // Accounts
    .service(
        web::scope("/auth")
            .route("/signup/", web::post().to(auth::signup))
            .service(
                web::resource("/login/")
                    .route(web::get().to(auth::login_prompt))
                    .route(web::post().to(auth::login)),
            )
            .route("/me/", web::get().to(auth::me)),
    )
    // API
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::resource("/groups")
                    .route(web::get().to(groups::list_groups))
                    .route(web::post().to(groups::create_group)),
            )
            .route("/groups/{slug}", web::delete().to(groups::delete_group))
            .route("/posts/{post_id}", web::delete().to(groups::delete_post)),
    );
}

/// Fallback for unknown paths.
pub async fn not_found(req: HttpRequest, request_id: RequestId) -> HttpResponse {
    tracing::debug!(path = %req.path(), "No route");
    HttpResponse::NotFound().json(
        ErrorResponse::not_found(format!("No page at {}", req.path()))
            .with_instance(req.path())
            .with_request_id(request_id.as_str()),
    )
}
