use crate::errors::{AppError, Result};
use sqlx::{postgres::PgConnectOptions, ConnectOptions, Connection};
use std::{borrow::Cow, str::FromStr, time::Duration};

/// Schemes the Postgres wire driver accepts.
const SUPPORTED_SCHEMES: &[&str] = &["postgres", "postgresql"];

/// Strip a driver suffix from the URL scheme.
///
/// ORM-style URLs name the driver inside the scheme, e.g.
/// `postgresql+psycopg2://user@host/db`. The wire driver only understands
/// `postgresql://user@host/db`. Everything after `://` is kept untouched,
/// and URLs without a driver suffix are returned as-is.
pub fn normalize_database_url(url: &str) -> Cow<'_, str> {
    let Some((scheme, rest)) = split_scheme(url) else {
        return Cow::Borrowed(url);
    };

    match scheme.split_once('+') {
        Some((base, _driver)) if !base.is_empty() => Cow::Owned(format!("{}://{}", base, rest)),
        _ => Cow::Borrowed(url),
    }
}

/// Normalize the URL and check that it targets Postgres.
pub fn validate_database_url(url: &str) -> Result<String> {
    if url.trim().is_empty() {
        return Err(AppError::Configuration(
            "Database URL is required".to_string(),
        ));
    }

    let normalized = normalize_database_url(url);
    let scheme = split_scheme(&normalized)
        .map(|(scheme, _)| scheme)
        .ok_or_else(|| {
            AppError::Configuration("Database URL must have the form scheme://...".to_string())
        })?;

    if !SUPPORTED_SCHEMES.contains(&scheme) {
        return Err(AppError::Configuration(format!(
            "Unsupported database scheme '{}'",
            scheme
        )));
    }

    Ok(normalized.into_owned())
}

/// Open a single connection, then close it straight away.
///
/// Connect and close together are bounded by `connect_timeout`. No retries
/// and no pooling: each call is one fresh attempt.
pub async fn check_connection(url: &str, connect_timeout: Duration) -> Result<()> {
    let url = validate_database_url(url)?;
    let options = PgConnectOptions::from_str(&url)?;

    let attempt = async {
        let connection = options.connect().await?;

        // The attempt already succeeded; a failed goodbye doesn't change that.
        if let Err(e) = connection.close().await {
            tracing::warn!(error = %e, "Failed to close probe connection cleanly");
        }

        Ok::<(), AppError>(())
    };

    tokio::time::timeout(connect_timeout, attempt)
        .await
        .map_err(|_| AppError::ConnectTimeout(connect_timeout))?
}

fn split_scheme(url: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = url.split_once("://")?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    valid.then_some((scheme, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{net::SocketAddr, time::Instant};
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    #[test]
    fn test_normalize_strips_driver_suffix() {
        assert_eq!(
            normalize_database_url("postgresql+psycopg2://app:secret@db:5432/app"),
            "postgresql://app:secret@db:5432/app"
        );
        assert_eq!(
            normalize_database_url("postgres+asyncpg://localhost/app?sslmode=disable"),
            "postgres://localhost/app?sslmode=disable"
        );
    }

    #[test]
    fn test_normalize_leaves_plain_urls_alone() {
        let url = "postgresql://app:p+ss@db/app";
        assert!(matches!(normalize_database_url(url), Cow::Borrowed(_)));
        assert_eq!(normalize_database_url(url), url);

        assert_eq!(normalize_database_url("not a url"), "not a url");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_database_url("postgresql+psycopg2://db/app").into_owned();
        assert_eq!(normalize_database_url(&once), once);
    }

    #[test]
    fn test_validate_accepts_postgres_schemes() {
        assert_eq!(
            validate_database_url("postgresql+psycopg2://db/app").unwrap(),
            "postgresql://db/app"
        );
        assert!(validate_database_url("postgres://db/app").is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        assert!(matches!(
            validate_database_url(""),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(
            validate_database_url("db:5432/app"),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(
            validate_database_url("mysql://db/app"),
            Err(AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_check_connection_refused() {
        // Nothing listens on port 1
        let result = check_connection("postgresql://app@127.0.0.1:1/app", Duration::from_secs(3)).await;

        match result {
            Err(AppError::Database(_)) | Err(AppError::ConnectTimeout(_)) => {}
            other => panic!("expected connection failure, got {:?}", other),
        }
    }

    /// Accepts connections and never says a word back.
    async fn spawn_silent_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        addr
    }

    /// Minimal Postgres backend: trust auth, then idles until the client leaves.
    async fn spawn_trusting_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    // StartupMessage: Int32 length (self-inclusive), then body
                    let len = socket.read_i32().await.unwrap() as usize;
                    let mut startup = vec![0u8; len - 4];
                    socket.read_exact(&mut startup).await.unwrap();

                    // AuthenticationOk, then ReadyForQuery(idle)
                    socket.write_all(&[b'R', 0, 0, 0, 8, 0, 0, 0, 0]).await.unwrap();
                    socket.write_all(&[b'Z', 0, 0, 0, 5, b'I']).await.unwrap();

                    // Drain Terminate until EOF
                    let mut rest = Vec::new();
                    let _ = socket.read_to_end(&mut rest).await;
                });
            }
        });

        addr
    }

    #[tokio::test]
    async fn test_check_connection_times_out_on_silent_server() {
        let addr = spawn_silent_server().await;
        let timeout = Duration::from_secs(1);
        let started = Instant::now();

        let result = check_connection(&format!("postgresql://app@{}/app", addr), timeout).await;
        let elapsed = started.elapsed();

        assert!(matches!(result, Err(AppError::ConnectTimeout(t)) if t == timeout));
        assert!(elapsed >= timeout);
        assert!(elapsed < timeout + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_check_connection_succeeds_and_closes() {
        let addr = spawn_trusting_server().await;
        let url = format!("postgresql+psycopg2://app@{}/app?sslmode=disable", addr);

        let result = check_connection(&url, Duration::from_secs(3)).await;
        assert!(result.is_ok(), "expected success, got {:?}", result);
    }

    #[tokio::test]
    async fn test_check_connection_malformed_url() {
        let result = check_connection("definitely not a url", Duration::from_secs(3)).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
