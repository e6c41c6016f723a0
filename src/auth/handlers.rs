use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{Credentials, TokenResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    error::ApiError,
    extract::ApiJson,
    state::AppState,
};

const SERVER_ERROR: &str = "Server error";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
}

fn require_complete(payload: &Credentials) -> Result<(), ApiError> {
    if payload.is_complete() {
        Ok(())
    } else {
        warn!("credentials missing email or password");
        Err(ApiError::BadRequest("Email and password are required".into()))
    }
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Credentials>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_complete(&payload)?;

    let hash = hash_password(&payload.password).map_err(|e| ApiError::internal(SERVER_ERROR, e))?;

    let Some(user) = state
        .users
        .insert_if_absent(&payload.email, &hash)
        .await
        .map_err(|e| ApiError::internal(SERVER_ERROR, e))?
    else {
        warn!("email already registered");
        return Err(ApiError::BadRequest(
            "Email already registered. Please use a different email.".into(),
        ));
    };

    info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    require_complete(&payload)?;

    let user = match state.users.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!("login unknown email");
            return Err(ApiError::Unauthorized(
                "User not found. Please register first.".into(),
            ));
        }
        Err(e) => return Err(ApiError::internal(SERVER_ERROR, e)),
    };

    let ok = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| ApiError::internal(SERVER_ERROR, e))?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized(
            "Invalid credentials. Please try again.".into(),
        ));
    }

    let token = JwtKeys::from_ref(&state)
        .sign(user.id)
        .map_err(|e| ApiError::internal(SERVER_ERROR, e))?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse { token }))
}
