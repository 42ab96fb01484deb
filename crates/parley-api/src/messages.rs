use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::SecondsFormat;
use tracing::{debug, warn};
use uuid::Uuid;

use parley_db::models::MessageRow;
use parley_types::Message;
use parley_types::models::parse_timestamp;

use crate::error::{ApiError, run_blocking};
use crate::state::AppState;

/// POST {base}: store a message. Any client-supplied id is discarded;
/// the store always assigns a fresh one.
pub async fn create_message(
    State(state): State<AppState>,
    Json(req): Json<Message>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(id) = req.id {
        debug!("Ignoring client-supplied message id {}", id);
    }

    // Stored as UTC; the client's original offset is not kept.
    let sent_at = req
        .timestamp
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::AutoSi, true));

    let row = run_blocking(move || {
        state
            .db
            .save_message(&req.sender_name, &req.text, sent_at.as_deref())
    })
    .await?;

    debug!("Stored message {} from {}", row.id, row.sender_name);

    Ok((StatusCode::CREATED, Json(message_from_row(row))))
}

/// GET {base}: every stored message.
pub async fn list_messages(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = run_blocking(move || state.db.find_all_messages()).await?;

    let messages: Vec<Message> = rows.into_iter().map(message_from_row).collect();
    Ok(Json(messages))
}

/// GET {base}/{id}: the message, or `null` when nothing matches.
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    // Ids are always UUIDs, so anything else simply matches nothing.
    let Ok(id) = id.parse::<Uuid>() else {
        debug!("Lookup for non-UUID message id '{}'", id);
        return Ok(Json(None::<Message>));
    };

    let row = run_blocking(move || state.db.find_message_by_id(&id.to_string())).await?;

    Ok(Json(row.map(message_from_row)))
}

/// DELETE {base}/{id}, also bound to PUT for older clients.
/// Deleting an unknown id still answers 204.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let Ok(id) = id.parse::<Uuid>() else {
        debug!("Delete for non-UUID message id '{}'", id);
        return Ok(StatusCode::NO_CONTENT);
    };

    let removed = run_blocking(move || state.db.delete_message_by_id(&id.to_string())).await?;

    if removed {
        debug!("Deleted message {}", id);
    } else {
        debug!("Delete for unknown message {}", id);
    }

    Ok(StatusCode::NO_CONTENT)
}

fn message_from_row(row: MessageRow) -> Message {
    let id = row.id.parse().unwrap_or_else(|e| {
        warn!("Corrupt message id '{}': {}", row.id, e);
        Uuid::default()
    });

    let timestamp = row.sent_at.as_deref().and_then(|raw| {
        parse_timestamp(raw)
            .map_err(|e| warn!("Corrupt sent_at '{}' on message '{}': {}", raw, row.id, e))
            .ok()
    });

    Message {
        id: Some(id),
        sender_name: row.sender_name,
        text: row.text,
        timestamp,
    }
}
