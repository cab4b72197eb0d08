// Service Monitor Library

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod observability;

pub use crate::config::Config;
pub use crate::errors::{AppError, Result};
