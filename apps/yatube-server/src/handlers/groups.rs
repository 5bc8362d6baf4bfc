//! Group listing and administrative group/post removal.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use yatube_core::services::NewGroup;
use yatube_shared::ApiResponse;
use yatube_shared::dto::{CreateGroupRequest, GroupResponse};

use super::presenters;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/groups
pub async fn list_groups(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let groups: Vec<GroupResponse> = state
        .groups
        .list()
        .await?
        .iter()
        .map(presenters::group)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(groups)))
}

/// POST /api/groups - admin only
pub async fn create_group(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateGroupRequest>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    let req = body.into_inner();

    let group = state
        .groups
        .create(NewGroup {
            title: req.title,
            slug: req.slug,
            description: req.description,
        })
        .await?;

    tracing::info!(slug = %group.slug, by = %identity.username, "Group created");
    Ok(HttpResponse::Created().json(ApiResponse::ok(presenters::group(&group))))
}

/// DELETE /api/groups/{slug} - admin only; the group's posts are kept.
pub async fn delete_group(
    state: web::Data<AppState>,
    identity: Identity,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    state.groups.delete(&slug).await?;

    tracing::info!(slug = %slug, by = %identity.username, "Group deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/posts/{post_id} - admin only
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    let post_id = post_id.into_inner();
    state.posts.delete(post_id).await?;

    tracing::info!(post_id = %post_id, by = %identity.username, "Post deleted");
    Ok(HttpResponse::NoContent().finish())
}
