//! Web server module (Axum + API).

pub mod api;
pub mod router;
pub mod server;
pub mod state;

pub use server::run_server;
pub use state::AppState;
