pub mod health;
pub mod middleware;
pub mod routes;
pub mod status;

pub use routes::{create_router, AppState};
