//! Post pages: feeds, detail and the post editor.

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, http::StatusCode, http::header, web,
};
use serde::Serialize;
use std::future::{Ready, ready};
use uuid::Uuid;

use yatube_core::domain::Post;
use yatube_core::forms::PostForm;
use yatube_core::pagination::PageRequest;
use yatube_core::services::EditorOutcome;
use yatube_shared::TemplateResponse;
use yatube_shared::dto::{
    GroupListContext, IndexContext, PostDetailContext, PostFormRequest, ProfileContext,
};

use super::presenters;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::urls;

pub const INDEX_TEMPLATE: &str = "posts/index.html";
pub const GROUP_LIST_TEMPLATE: &str = "posts/group_list.html";
pub const PROFILE_TEMPLATE: &str = "posts/profile.html";
pub const POST_DETAIL_TEMPLATE: &str = "posts/post_detail.html";
pub const CREATE_POST_TEMPLATE: &str = "posts/create_post.html";

/// `?page=` of the listings. Anything unusable means the first page.
///
/// Extraction never fails: a repeated `page` takes its last value and an
/// unreadable query string counts as absent.
#[derive(Debug, Default)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    fn from_query(query: &str) -> Self {
        let page = web::Query::<Vec<(String, String)>>::from_query(query)
            .ok()
            .and_then(|pairs| {
                pairs
                    .into_inner()
                    .into_iter()
                    .rev()
                    .find_map(|(key, value)| (key == "page").then_some(value))
            });
        Self { page }
    }

    fn request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref())
    }
}

impl FromRequest for PageQuery {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_query(req.query_string())))
    }
}

fn render<C: Serialize>(status: StatusCode, template: &str, context: C) -> HttpResponse {
    HttpResponse::build(status).json(TemplateResponse::new(template, context))
}

fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    query: PageQuery,
) -> AppResult<HttpResponse> {
    let page = state.posts.index(query.request()).await?;

    Ok(render(
        StatusCode::OK,
        INDEX_TEMPLATE,
        IndexContext {
            page_obj: presenters::page_obj(page),
        },
    ))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: PageQuery,
) -> AppResult<HttpResponse> {
    let feed = state.posts.group_feed(&slug, query.request()).await?;

    Ok(render(
        StatusCode::OK,
        GROUP_LIST_TEMPLATE,
        GroupListContext {
            group: presenters::group(&feed.group),
            page_obj: presenters::page_obj(feed.page),
        },
    ))
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    username: web::Path<String>,
    query: PageQuery,
) -> AppResult<HttpResponse> {
    let feed = state.posts.profile_feed(&username, query.request()).await?;

    Ok(render(
        StatusCode::OK,
        PROFILE_TEMPLATE,
        ProfileContext {
            author: presenters::author(&feed.author),
            posts_count: feed.posts_count,
            page_obj: presenters::page_obj(feed.page),
        },
    ))
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = state.posts.detail(post_id.into_inner()).await?;

    Ok(render(
        StatusCode::OK,
        POST_DETAIL_TEMPLATE,
        PostDetailContext {
            post: presenters::post(&detail.view),
            posts_count: detail.posts_count,
        },
    ))
}

/// GET /create/
pub async fn post_create_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let principal = identity.principal();
    let outcome = state.posts.create_form(&principal).await?;

    editor_response(&state, outcome, urls::POST_CREATE, |_| {
        Err(AppError::Internal("form request saved a post".to_string()))
    })
}

/// POST /create/
pub async fn post_create(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: Option<web::Json<PostFormRequest>>,
) -> AppResult<HttpResponse> {
    let principal = identity.principal();
    let outcome = state.posts.create(&principal, post_form(body)).await?;

    editor_response(&state, outcome, urls::POST_CREATE, |post| {
        tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");
        principal
            .username()
            .map(urls::profile)
            .ok_or_else(|| AppError::Internal("post saved for an anonymous caller".to_string()))
    })
}

/// GET /posts/{post_id}/edit/
pub async fn post_edit_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    let outcome = state.posts.edit_form(&identity.principal(), post_id).await?;

    editor_response(&state, outcome, &urls::post_edit(post_id), |_| {
        Err(AppError::Internal("form request saved a post".to_string()))
    })
}

/// POST /posts/{post_id}/edit/
pub async fn post_edit(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<Uuid>,
    body: Option<web::Json<PostFormRequest>>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    let outcome = state
        .posts
        .edit(&identity.principal(), post_id, post_form(body))
        .await?;

    editor_response(&state, outcome, &urls::post_edit(post_id), |post| {
        tracing::info!(post_id = %post.id, "Post edited");
        Ok(urls::post_detail(post.id))
    })
}

/// An unreadable body is treated as an empty form so that validation
/// reports the missing text.
fn post_form(body: Option<web::Json<PostFormRequest>>) -> PostForm {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    let group = body.group_input();
    PostForm::from_submission(body.text, group.as_deref())
}

fn editor_response(
    state: &AppState,
    outcome: EditorOutcome,
    page_path: &str,
    saved_location: impl FnOnce(&Post) -> AppResult<String>,
) -> AppResult<HttpResponse> {
    match outcome {
        EditorOutcome::Form(editor) => {
            let status = if editor.errors.is_empty() {
                StatusCode::OK
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            let context = presenters::form_context(&editor, state.locale);
            Ok(render(status, CREATE_POST_TEMPLATE, context))
        }
        EditorOutcome::Saved(post) => Ok(redirect(saved_location(&post)?)),
        EditorOutcome::LoginRequired => Ok(redirect(urls::login_with_next(page_path))),
        EditorOutcome::NotAuthor { post_id } => {
            tracing::debug!(post_id = %post_id, "Edit by non-author redirected");
            Ok(redirect(urls::post_detail(post_id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_takes_last_page_value() {
        assert_eq!(PageQuery::from_query("page=1&page=2").request().number(), 2);
        assert_eq!(PageQuery::from_query("q=x&page=3").request().number(), 3);
        assert_eq!(PageQuery::from_query("").request().number(), 1);
        assert_eq!(PageQuery::from_query("page=%zz").request().number(), 1);
    }
}
