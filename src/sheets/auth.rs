use crate::config::{Config, GoogleConfig};
use crate::error::{AppError, Result};
use crate::sheets::client::AUTH_SCOPE;
use hyper_util::client::legacy::connect::HttpConnector;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use yup_oauth2::{
    ServiceAccountAuthenticator, authenticator::Authenticator, hyper_rustls::HttpsConnector,
};

type AuthType = Authenticator<HttpsConnector<HttpConnector>>;

/// Create and verify authenticator by fetching a token
pub(super) async fn create_and_verify_authenticator(config: &GoogleConfig) -> Result<AuthType> {
    let auth = from_service_account(&config.service_account_key).await?;

    // Fail early on a revoked key or a service account without access
    let _token = auth
        .token(&[AUTH_SCOPE])
        .await
        .map_err(|e| AppError::Auth(format!("Failed to get token: {}", e)))?;

    Ok(auth)
}

async fn from_service_account(key_path: &Path) -> Result<AuthType> {
    let key = yup_oauth2::read_service_account_key(key_path)
        .await
        .map_err(|e| {
            AppError::Auth(format!(
                "Failed to read service account key at {:?}: {}",
                key_path, e
            ))
        })?;
    debug!(client_email = %key.client_email, "Loaded service account key");

    let mut builder = ServiceAccountAuthenticator::builder(key);
    match token_cache_path() {
        Ok(path) => builder = builder.persist_tokens_to_disk(path),
        Err(e) => warn!("Token cache unavailable, keeping tokens in memory: {}", e),
    }

    let auth = builder
        .build()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to build authenticator: {}", e)))?;

    Ok(auth)
}

fn token_cache_path() -> Result<PathBuf> {
    Config::cache_file("google_tokens.json")
}
