pub mod connection;

pub use connection::{check_connection, normalize_database_url, validate_database_url};
