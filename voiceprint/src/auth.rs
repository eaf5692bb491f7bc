//! HMAC-SHA256 request signing.
//!
//! The service authenticates each call through three URL query parameters:
//! `authorization`, `date` and `host`. The authorization value is a
//! base64-encoded descriptor naming the api_key and carrying a signature
//! over `host: {host}\ndate: {date}\nPOST {path} HTTP/1.1`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Current UTC time in RFC 1123 format, e.g. `Fri, 23 Apr 2021 02:35:47 GMT`.
pub(crate) fn rfc1123_date() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Base64 authorization descriptor for one POST request at `date`.
pub(crate) fn authorization(
    host: &str,
    path: &str,
    api_key: &str,
    api_secret: &str,
    date: &str,
) -> String {
    let origin = format!("host: {host}\ndate: {date}\nPOST {path} HTTP/1.1");

    // HMAC-SHA256 accepts keys of any length, so this cannot fail.
    let mut mac = HmacSha256::new_from_slice(api_secret.as_bytes())
        .expect("hmac-sha256 key of any length");
    mac.update(origin.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    let descriptor = format!(
        "api_key=\"{api_key}\", algorithm=\"hmac-sha256\", \
         headers=\"host date request-line\", signature=\"{signature}\""
    );
    BASE64.encode(descriptor.as_bytes())
}

/// Signed query parameters (`authorization`, `date`, `host`) for one request.
pub(crate) fn signed_query(
    host: &str,
    path: &str,
    api_key: &str,
    api_secret: &str,
) -> [(&'static str, String); 3] {
    let date = rfc1123_date();
    let authorization = authorization(host, path, api_key, api_secret, &date);
    [
        ("authorization", authorization),
        ("date", date),
        ("host", host.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_is_rfc1123_shaped() {
        let date = rfc1123_date();
        assert!(date.ends_with(" GMT"));
        // "Fri, 23 Apr 2021 02:35:47 GMT"
        let parts: Vec<&str> = date.split(' ').collect();
        assert_eq!(parts.len(), 6);
        assert!(parts[0].ends_with(','));
    }

    #[test]
    fn authorization_descriptor_fields() {
        let auth = authorization(
            "api.xf-yun.com",
            "/v1/private/s1aa729d0",
            "test-key",
            "test-secret",
            "Fri, 23 Apr 2021 02:35:47 GMT",
        );
        let decoded = BASE64.decode(auth).unwrap();
        let descriptor = String::from_utf8(decoded).unwrap();
        assert!(descriptor.contains("api_key=\"test-key\""));
        assert!(descriptor.contains("algorithm=\"hmac-sha256\""));
        assert!(descriptor.contains("headers=\"host date request-line\""));
        // HMAC-SHA256 output is 32 bytes -> 44 base64 chars.
        let signature = descriptor
            .split("signature=\"")
            .nth(1)
            .and_then(|s| s.strip_suffix('"'))
            .unwrap();
        assert_eq!(signature.len(), 44);
    }

    #[test]
    fn signature_depends_on_date() {
        let a = authorization("h", "/p", "k", "s", "Mon, 01 Jan 2024 00:00:00 GMT");
        let b = authorization("h", "/p", "k", "s", "Tue, 02 Jan 2024 00:00:00 GMT");
        assert_ne!(a, b);
    }

    #[test]
    fn query_parameter_order() {
        let query = signed_query("api.xf-yun.com", "/v1/private/s1aa729d0", "k", "s");
        assert_eq!(query[0].0, "authorization");
        assert_eq!(query[1].0, "date");
        assert_eq!(query[2].0, "host");
        assert_eq!(query[2].1, "api.xf-yun.com");
    }
}
