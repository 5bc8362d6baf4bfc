//! Account handlers: sign-up, login and the current identity.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use std::sync::Arc;

use yatube_core::domain::User;
use yatube_core::ports::{BaseRepository, PasswordService, TokenService, UserRepository};
use yatube_shared::dto::{AuthResponse, LoginPrompt, LoginRequest, SignupRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::urls;

const MIN_PASSWORD_LEN: usize = 8;

fn issue_token(
    state: &AppState,
    token_service: &dyn TokenService,
    user: &User,
) -> AppResult<AuthResponse> {
    let roles = state.roles_for(&user.username);
    let token = token_service.generate_token(user.id, &user.username, roles.clone())?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: u64::try_from(token_service.expiration_seconds()).unwrap_or(0),
        user: UserResponse {
            id: user.id,
            username: user.username.clone(),
            roles,
        },
    })
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if !User::is_valid_username(&req.username) {
        return Err(AppError::Validation(vec![
            "Username may contain only letters, digits and @/./+/-/_".to_string(),
        ]));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(vec![format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )]));
    }

    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = password_service.hash(&req.password)?;
    let user = state.users.save(User::new(req.username, password_hash)).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User signed up");

    let response = issue_token(&state, token_service.get_ref().as_ref(), &user)?;
    Ok(HttpResponse::Created().json(response))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !password_service.verify(&req.password, &user.password_hash)? {
        tracing::debug!(username = %req.username, "Wrong password");
        return Err(AppError::Unauthorized);
    }

    let response = issue_token(&state, token_service.get_ref().as_ref(), &user)?;
    Ok(HttpResponse::Ok().json(response))
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

/// GET /auth/login/ - where anonymous authors are sent.
pub async fn login_prompt(query: web::Query<NextQuery>) -> HttpResponse {
    HttpResponse::Ok().json(LoginPrompt {
        login_url: urls::LOGIN.to_string(),
        next: query.into_inner().next,
    })
}

/// GET /auth/me/
pub async fn me(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse {
        id: identity.user_id,
        username: identity.username,
        roles: identity.roles,
    })
}
