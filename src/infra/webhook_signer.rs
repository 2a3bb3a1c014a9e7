use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Builds a `Stripe-Signature` header value for `body`, the same way the
/// processor signs its deliveries.
pub fn sign_webhook_payload(secret: &str, timestamp: i64, body: &str) -> String {
    let signed_content = format!("{}.{}", timestamp, body);
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(signed_content.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    format!("t={},v1={}", timestamp, signature)
}

/// Signs `body` with the current time.
pub fn sign_now(secret: &str, body: &str) -> String {
    sign_webhook_payload(secret, chrono::Utc::now().timestamp(), body)
}
