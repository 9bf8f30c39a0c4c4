//! Outbound URL checks for remote media acquisition.

use crate::error::IngestionError;
use std::net::IpAddr;
use url::Url;

/// Private, loopback, link-local, unspecified, broadcast, or cloud-metadata address.
pub fn is_internal_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
        }
        IpAddr::V6(v6) => {
            let segs = v6.segments();
            v6.is_loopback()
                || v6.is_unspecified()
                || (segs[0] & 0xfe00) == 0xfc00 // unique-local fc00::/7
                || (segs[0] & 0xffc0) == 0xfe80 // link-local fe80::/10
                || v6
                    .to_ipv4_mapped()
                    .is_some_and(|v4| is_internal_ip(&IpAddr::V4(v4)))
        }
    }
}

pub fn is_internal_host(host: &str) -> bool {
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if bare.eq_ignore_ascii_case("localhost") || bare.ends_with(".localhost") {
        return true;
    }
    bare.parse::<IpAddr>().is_ok_and(|ip| is_internal_ip(&ip))
}

/// Parse a remote media URL and enforce scheme (and optionally host) rules.
///
/// With `block_internal` set, every resolved address of the host is checked,
/// not just the literal.
pub async fn validate_remote_url(raw: &str, block_internal: bool) -> Result<Url, IngestionError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| IngestionError::Download(format!("invalid URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(IngestionError::Download(format!(
            "unsupported URL scheme: {}",
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .ok_or_else(|| IngestionError::Download("URL has no host".into()))?
        .to_string();

    if !block_internal {
        return Ok(url);
    }

    if is_internal_host(&host) {
        return Err(IngestionError::Download(format!(
            "host '{host}' is an internal address"
        )));
    }

    let port = url.port_or_known_default().unwrap_or(443);
    if let Ok(addrs) = tokio::net::lookup_host((host.as_str(), port)).await {
        for addr in addrs {
            if is_internal_ip(&addr.ip()) {
                return Err(IngestionError::Download(format!(
                    "host '{host}' resolves to internal address {}",
                    addr.ip()
                )));
            }
        }
    }

    Ok(url)
}
