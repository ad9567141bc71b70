//! HTTP control surface for the pacing engine
//!
//! Routes map one-to-one onto the engine's entry points: start/end the
//! session, read live status, and query meal history.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
