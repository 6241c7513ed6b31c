//! Request extractors for caller identity and the entitlement cookie

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};

/// Name of the cookie carrying the signed entitlement token
pub const ENTITLEMENT_COOKIE: &str = "hoa_entitlements";

/// Client address used to key rate limits.
///
/// First `X-Forwarded-For` entry, then `X-Real-IP`, then the socket peer, then `unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = ip_from_headers(&parts.headers)
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());
        Ok(ClientIp(ip))
    }
}

/// Raw entitlement token presented by the caller, if any. Never rejects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitlementCookie(pub Option<String>);

impl EntitlementCookie {
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Helper function to extract a cookie value from request headers
pub fn extract_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let prefix = format!("{}=", cookie_name);
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .map(|s| s.trim())
        .find(|s| s.starts_with(&prefix))?
        .strip_prefix(&prefix)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

impl<S> FromRequestParts<S> for EntitlementCookie
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(EntitlementCookie(extract_cookie(
            &parts.headers,
            ENTITLEMENT_COOKIE,
        )))
    }
}
