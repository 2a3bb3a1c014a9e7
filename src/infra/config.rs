use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use url::Url;

pub struct AppConfig {
    pub stripe_secret_key: SecretString,
    /// Publishable key, echoed to the frontend in boleto responses.
    pub stripe_public_key: String,
    pub stripe_webhook_secret: SecretString,
    /// Base64-encoded service-account JSON.
    pub firebase_credentials: SecretString,
    pub firestore_database: String,
    pub bind_addr: SocketAddr,
    /// Where the test-trigger endpoints send their signed events.
    pub self_base_url: Url,
    /// `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
    /// Mounts the `/testar-webhook*` routes. Keep disabled in production.
    pub enable_test_routes: bool,
    pub webhook_tolerance_secs: i64,
    pub boleto_due_days: i64,
    /// Optional JSON log file next to the console output.
    pub log_file: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let stripe_secret_key = SecretString::new(get_env::<String>("STRIPE_SECRET_KEY").into());
        let stripe_public_key: String = get_env("STRIPE_PUBLIC_KEY");
        let stripe_webhook_secret =
            SecretString::new(get_env::<String>("STRIPE_WEBHOOK_SECRET").into());
        let firebase_credentials =
            SecretString::new(get_env::<String>("FIREBASE_CREDENTIALS").into());
        let firestore_database: String =
            get_env_default("FIRESTORE_DATABASE", "(default)".to_string());

        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:5000".parse().unwrap());
        let self_base_url: Url = std::env::var("SELF_BASE_URL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| default_self_base_url(bind_addr));
        let cors_origin: Option<HeaderValue> = std::env::var("CORS_ORIGIN").ok().map(|s| {
            s.parse()
                .expect("CORS_ORIGIN must be a valid header value")
        });

        let enable_test_routes: bool = get_env_default("ENABLE_TEST_ROUTES", false);
        let webhook_tolerance_secs: i64 = get_env_default("WEBHOOK_TOLERANCE_SECS", 300);
        let boleto_due_days: i64 = get_env_default("BOLETO_DUE_DAYS", 7);
        let log_file: Option<String> = std::env::var("LOG_FILE").ok().filter(|s| !s.is_empty());

        Self {
            stripe_secret_key,
            stripe_public_key,
            stripe_webhook_secret,
            firebase_credentials,
            firestore_database,
            bind_addr,
            self_base_url,
            cors_origin,
            enable_test_routes,
            webhook_tolerance_secs,
            boleto_due_days,
            log_file,
        }
    }
}

pub fn default_self_base_url(bind_addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{}", bind_addr)).expect("socket address forms a valid URL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_self_base_url() {
        let url = default_self_base_url("127.0.0.1:5000".parse().unwrap());
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(url.join("/webhook").unwrap().as_str(), "http://127.0.0.1:5000/webhook");
    }
}
