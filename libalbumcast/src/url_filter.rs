//! Outbound URL safety filter
//!
//! Album share data carries user-controlled URLs (public page, cover photo,
//! photo list). Every one of them ends up embedded in requests the engine
//! makes on the server's behalf, so each URL is vetted before any provider
//! adapter sees it. Disallowed URLs are dropped from the payload, never
//! surfaced as errors: sanitization degrades the post, it does not abort it.

use tracing::warn;
use url::Url;

use crate::types::AlbumShareData;

/// Hostnames and prefixes that must never be dialed from the server side.
/// Matching is equals-or-prefix on the lowercased host, so
/// `localhost.example.com` is rejected along with `localhost`.
const BLOCKED_HOST_PREFIXES: [&str; 7] = [
    "localhost",
    "127.0.0.1",
    "0.0.0.0",
    "::1",
    "169.254.",
    "10.",
    "192.168.",
];

/// Returns true when the URL is safe to embed in an outbound request.
///
/// Only `https` URLs pointing at public hosts pass. Anything unparseable is
/// rejected rather than reported.
pub fn is_allowed(raw: &str) -> bool {
    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return false,
    };

    if parsed.scheme() != "https" {
        return false;
    }

    let host = match parsed.host_str() {
        Some(host) => host.to_lowercase(),
        None => return false,
    };
    // IPv6 hosts come back bracketed.
    let host = host.trim_start_matches('[').trim_end_matches(']');

    if BLOCKED_HOST_PREFIXES
        .iter()
        .any(|blocked| host == *blocked || host.starts_with(blocked))
    {
        return false;
    }

    if is_private_class_b(host) {
        return false;
    }

    true
}

/// 172.16.0.0/12 check via octet parsing.
fn is_private_class_b(host: &str) -> bool {
    let mut octets = host.split('.');
    let first = octets.next();
    let second = octets.next().and_then(|o| o.parse::<u8>().ok());
    match (first, second) {
        (Some("172"), Some(n)) => (16..=31).contains(&n),
        _ => false,
    }
}

/// Returns a copy of the album data with every disallowed URL removed.
///
/// The public URL degrades to an empty string, the cover photo to absent,
/// and the photo list to its allowed subset with order preserved. The
/// declared `photo_count` is deliberately left untouched.
pub fn sanitize(data: &AlbumShareData) -> AlbumShareData {
    let mut sanitized = data.clone();

    if !sanitized.public_url.is_empty() && !is_allowed(&sanitized.public_url) {
        warn!(url = %sanitized.public_url, "dropping unsafe album public URL");
        sanitized.public_url = String::new();
    }

    if let Some(cover) = &sanitized.cover_photo_url {
        if !is_allowed(cover) {
            warn!(url = %cover, "dropping unsafe cover photo URL");
            sanitized.cover_photo_url = None;
        }
    }

    sanitized.photo_urls.retain(|photo_url| {
        let allowed = is_allowed(photo_url);
        if !allowed {
            warn!(url = %photo_url, "dropping unsafe photo URL");
        }
        allowed
    });

    sanitized
}
