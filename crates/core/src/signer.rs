//! AWS Signature Version 2 request signing.
//!
//! RadosGW authenticates admin requests with the legacy S3 scheme. The
//! `Authorization` header has the format:
//!
//! ```text
//! AWS <AccessKey>:<Signature>
//! ```
//!
//! Where `Signature = Base64(HMAC-SHA1(SecretKey, StringToSign))` and:
//!
//! ```text
//! StringToSign = HTTP-Verb + "\n" +
//!                Content-MD5 + "\n" +
//!                Content-Type + "\n" +
//!                Date + "\n" +
//!                CanonicalizedAmzHeaders +
//!                CanonicalizedResource
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use jiff::Timestamp;
use jiff::tz::TimeZone;
use sha1::Sha1;
use tracing::debug;

use crate::config::Credentials;
use crate::error::Result;
use crate::request::AdminRequest;

type HmacSha1 = Hmac<Sha1>;

/// Headers whose values are signed, in string-to-sign order.
const SIGNABLE_HEADERS: [&str; 2] = ["Content-MD5", "Content-Type"];

/// Prefix selecting the headers that go into the canonicalized AMZ block.
const AMZ_PREFIX: &str = "x-amz-";

/// Sign `request` with the current time.
///
/// Returns a copy carrying `Date` and `Authorization` headers.
pub fn authenticate(request: &AdminRequest, credentials: &Credentials) -> Result<AdminRequest> {
    authenticate_at(request, credentials, Timestamp::now())
}

/// Sign `request` as if sent at `now`.
///
/// The `Date` header is set before canonicalizing so the signed date line is
/// exactly the one sent on the wire.
pub fn authenticate_at(
    request: &AdminRequest,
    credentials: &Credentials,
    now: Timestamp,
) -> Result<AdminRequest> {
    let request = request.with_header("Date", &http_date(now))?;

    let string_to_sign = canonical_string(&request, None);
    let signature = sign_string(&string_to_sign, credentials.secret_key());

    debug!(
        access_key = %credentials.access_key(),
        method = %request.method(),
        path = %request.uri().path(),
        "Signed request with SigV2"
    );

    request.with_header(
        "Authorization",
        &format!("AWS {}:{}", credentials.access_key(), signature),
    )
}

/// Compute the SigV2 signature: Base64(HMAC-SHA1(secret, string)).
pub fn sign_string(string: &str, secret_key: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret_key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(string.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Build the SigV2 string to sign.
///
/// A non-empty `expires` replaces the `Date` header on the date line, even
/// when the request carries one. Query-string authentication signs this way.
pub fn canonical_string(request: &AdminRequest, expires: Option<&str>) -> String {
    let mut buffer = format!("{}\n", request.method().as_str().to_ascii_uppercase());

    for header in SIGNABLE_HEADERS {
        buffer.push_str(&request.header_line(header));
        buffer.push('\n');
    }

    let date = match expires {
        Some(expires) if !expires.is_empty() => expires.to_owned(),
        _ => request.header_line("date"),
    };
    buffer.push_str(&date);
    buffer.push('\n');

    buffer.push_str(&canonicalized_amz_headers(request));
    buffer.push_str(canonicalized_resource(request));

    debug!(string_to_sign = ?buffer, "Built SigV2 string to sign");

    buffer
}

/// Build the CanonicalizedAmzHeaders block.
///
/// Each surviving `x-amz-*` header becomes `name:value` with the name
/// lowercased and the value trimmed; empty values are dropped but `"0"` is
/// kept. Lines are sorted and each is terminated by a newline.
fn canonicalized_amz_headers(request: &AdminRequest) -> String {
    let headers = request.headers();

    let mut lines: Vec<String> = headers
        .keys()
        .filter(|name| name.as_str().to_ascii_lowercase().starts_with(AMZ_PREFIX))
        .filter_map(|name| {
            let value = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).trim().to_owned())
                .collect::<Vec<_>>()
                .join(",");
            let value = value.trim();

            if value.is_empty() {
                None
            } else {
                Some(format!("{}:{}", name.as_str().to_ascii_lowercase(), value))
            }
        })
        .collect();

    if lines.is_empty() {
        return String::new();
    }

    lines.sort();

    let mut block = lines.join("\n");
    block.push('\n');
    block
}

/// Build the CanonicalizedResource: the URI path, without host or query.
fn canonicalized_resource(request: &AdminRequest) -> &str {
    request.uri().path()
}

/// Format a timestamp as an RFC 2822 date in UTC, e.g.
/// `Tue, 01 Jan 2019 12:00:00 +0000`.
pub fn http_date(timestamp: Timestamp) -> String {
    timestamp
        .to_zoned(TimeZone::UTC)
        .strftime("%a, %d %b %Y %H:%M:%S %z")
        .to_string()
}
