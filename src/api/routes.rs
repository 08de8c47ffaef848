//! axum router exposing the conversation operations.
//!
//! Authentication is performed upstream (gateway / session layer); this
//! surface trusts the `x-principal-id` and `x-principal-role` headers the
//! gateway injects and turns them into a [`Principal`].

use std::sync::Arc;

use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::chat::router::ChatRouter;
use crate::models::message::ConversationRef;
use crate::models::principal::{Principal, Role};
use crate::AppError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ApiState {
    /// The conversation routing core.
    pub router: Arc<ChatRouter>,
}

/// Build the application router.
#[must_use]
pub fn app_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/unread", get(unread_total))
        .route(
            "/shipments/{id}/messages",
            get(list_single).post(send_single),
        )
        .route("/shipments/{id}/read", post(mark_read_single))
        .route("/shipments/{id}/unread", get(unread_single))
        .route("/pools/{id}/messages", get(list_pooled).post(send_pooled))
        .route("/pools/{id}/read", post(mark_read_pooled))
        .route("/pools/{id}/unread", get(unread_pooled))
        .with_state(state)
}

/// Handler for `GET /health` — returns 200 OK with a plain-text body.
async fn health() -> &'static str {
    "ok"
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AccessDenied(_) => StatusCode::FORBIDDEN,
            Self::NoCounterparty(_) | Self::MissingTarget(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Config(_) | Self::Db(_) | Self::Notify(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// JSON error payload.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let id = header_value(parts, "x-principal-id")
            .ok_or((StatusCode::UNAUTHORIZED, "missing x-principal-id header"))?;
        let role = header_value(parts, "x-principal-role")
            .and_then(|raw| Role::parse(&raw))
            .ok_or((StatusCode::UNAUTHORIZED, "missing or invalid x-principal-role header"))?;

        Ok(match role {
            Role::Customer => Self::Customer(id),
            Role::Agent => Self::Agent(id),
        })
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .filter(|v| !v.is_empty())
}

/// Optional sub-thread selector for pooled conversation endpoints.
#[derive(Debug, Deserialize)]
struct ThreadQuery {
    shipment_id: Option<String>,
}

/// Request body for sending a message.
#[derive(Debug, Deserialize)]
struct SendBody {
    body: String,
    /// Target member sub-thread (pooled sends by agents).
    shipment_id: Option<String>,
}

/// Response payload for unread count endpoints.
#[derive(Debug, Serialize)]
struct UnreadBody {
    unread: u64,
}

/// Response payload for mark-read endpoints.
#[derive(Debug, Serialize)]
struct MarkReadBody {
    marked: u64,
}

async fn list_single(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    principal: Principal,
) -> Result<Response, AppError> {
    let conversation = ConversationRef::Single { shipment_id: id };
    let messages = state.router.list_messages(&conversation, &principal).await?;
    Ok(Json(messages).into_response())
}

async fn send_single(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    principal: Principal,
    Json(request): Json<SendBody>,
) -> Result<Response, AppError> {
    let conversation = ConversationRef::Single { shipment_id: id };
    let message = state
        .router
        .send(&conversation, &principal, request.body)
        .await?;
    Ok((StatusCode::CREATED, Json(message)).into_response())
}

async fn mark_read_single(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    principal: Principal,
) -> Result<Response, AppError> {
    let conversation = ConversationRef::Single { shipment_id: id };
    let marked = state.router.mark_read(&conversation, &principal).await?;
    Ok(Json(MarkReadBody { marked }).into_response())
}

async fn unread_single(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    principal: Principal,
) -> Result<Response, AppError> {
    let unread = state.router.unread_count_for_shipment(&id, &principal).await?;
    Ok(Json(UnreadBody { unread }).into_response())
}

async fn list_pooled(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Query(query): Query<ThreadQuery>,
    principal: Principal,
) -> Result<Response, AppError> {
    let conversation = ConversationRef::Pooled {
        pool_id: id,
        shipment_id: query.shipment_id,
    };
    let messages = state.router.list_messages(&conversation, &principal).await?;
    Ok(Json(messages).into_response())
}

async fn send_pooled(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    principal: Principal,
    Json(request): Json<SendBody>,
) -> Result<Response, AppError> {
    let conversation = ConversationRef::Pooled {
        pool_id: id,
        shipment_id: request.shipment_id,
    };
    let message = state
        .router
        .send(&conversation, &principal, request.body)
        .await?;
    Ok((StatusCode::CREATED, Json(message)).into_response())
}

async fn mark_read_pooled(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Query(query): Query<ThreadQuery>,
    principal: Principal,
) -> Result<Response, AppError> {
    let conversation = ConversationRef::Pooled {
        pool_id: id,
        shipment_id: query.shipment_id,
    };
    let marked = state.router.mark_read(&conversation, &principal).await?;
    Ok(Json(MarkReadBody { marked }).into_response())
}

async fn unread_pooled(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    principal: Principal,
) -> Result<Response, AppError> {
    let unread = state.router.unread_count_for_pool(&id, &principal).await?;
    Ok(Json(UnreadBody { unread }).into_response())
}

async fn unread_total(
    State(state): State<ApiState>,
    principal: Principal,
) -> Result<Response, AppError> {
    let unread = state.router.unread_count(&principal).await?;
    Ok(Json(UnreadBody { unread }).into_response())
}
