use axum::{
    Router,
    routing::{get, post},
};

use crate::health::health;
use crate::messages;
use crate::state::AppState;

/// Path of the health check. A message base path may not reuse it.
pub const HEALTH_PATH: &str = "/health";

/// Build the message routes under `base_path` (e.g. `/chat`), plus `/health`.
///
/// `base_path` must start with `/`, carry no trailing slash and differ from
/// [`HEALTH_PATH`].
pub fn router(state: AppState, base_path: &str) -> Router {
    let by_id = format!("{base_path}/{{id}}");

    Router::new()
        .route(
            base_path,
            post(messages::create_message).get(messages::list_messages),
        )
        .route(
            &by_id,
            get(messages::get_message)
                .delete(messages::delete_message)
                // Older clients delete with PUT
                .put(messages::delete_message),
        )
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}
