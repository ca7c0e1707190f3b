pub mod cli;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build as app_router;
pub use state::AppState;
