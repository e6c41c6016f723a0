use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    error::ApiError,
    extract::ApiJson,
    faqs::repo_types::{demo_faq, Faq, FaqFields},
    state::AppState,
};

pub fn faq_routes() -> Router<AppState> {
    Router::new()
        .route("/faqs", get(list_faqs).post(create_faq))
        .route("/faqs/:id", put(update_faq).delete(delete_faq))
        .route("/initialize", get(initialize_demo))
}

/// Ids that do not parse can never match a stored record.
fn parse_id(raw: &str) -> Option<Uuid> {
    let id = Uuid::parse_str(raw).ok();
    if id.is_none() {
        debug!(id = %raw, "malformed faq id");
    }
    id
}

#[instrument(skip(state))]
pub async fn list_faqs(State(state): State<AppState>) -> Result<Json<Vec<Faq>>, ApiError> {
    let faqs = state
        .faqs
        .list()
        .await
        .map_err(|e| ApiError::internal("Error fetching FAQs", e))?;
    Ok(Json(faqs))
}

#[instrument(skip(state))]
pub async fn create_faq(
    State(state): State<AppState>,
    ApiJson(fields): ApiJson<FaqFields>,
) -> Result<(StatusCode, Json<Faq>), ApiError> {
    let faq = state
        .faqs
        .create(fields)
        .await
        .map_err(|e| ApiError::internal("Error adding FAQ", e))?;
    info!(faq_id = %faq.id, "faq created");
    Ok((StatusCode::CREATED, Json(faq)))
}

/// Responds `null` when nothing matches `id`.
#[instrument(skip(state))]
pub async fn update_faq(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(fields): ApiJson<FaqFields>,
) -> Result<Json<Option<Faq>>, ApiError> {
    let Some(id) = parse_id(&id) else {
        return Ok(Json(None));
    };
    let faq = state
        .faqs
        .update(id, fields)
        .await
        .map_err(|e| ApiError::internal("Error updating FAQ", e))?;
    match &faq {
        Some(_) => info!(faq_id = %id, "faq updated"),
        None => debug!(faq_id = %id, "update matched no faq"),
    }
    Ok(Json(faq))
}

#[instrument(skip(state))]
pub async fn delete_faq(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if let Some(id) = parse_id(&id) {
        let removed = state
            .faqs
            .delete(id)
            .await
            .map_err(|e| ApiError::internal("Error deleting FAQ", e))?;
        if removed > 0 {
            info!(faq_id = %id, "faq deleted");
        } else {
            debug!(faq_id = %id, "delete matched no faq");
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn initialize_demo(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let inserted = state
        .faqs
        .seed_if_absent(demo_faq())
        .await
        .map_err(|e| ApiError::internal("Error initializing demo FAQ", e))?;

    if inserted {
        info!("demo faq seeded");
        Ok((StatusCode::CREATED, Json(json!({ "message": "Demo FAQ added" }))))
    } else {
        Ok((StatusCode::OK, Json(json!({ "message": "Demo FAQ already exists" }))))
    }
}
