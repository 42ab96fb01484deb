//! HTTP layer for the Parley message store: handlers, shared state and
//! error mapping. The server binary adds CORS, tracing and the listener.

pub mod error;
pub mod health;
pub mod messages;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{HEALTH_PATH, router};
pub use state::{AppState, AppStateInner};
