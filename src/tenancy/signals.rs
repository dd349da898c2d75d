use axum::http::{header, HeaderMap, Uri};
use serde::Serialize;

use super::host;

pub const FORWARDED_HOST_HEADER: &str = "x-forwarded-host";
pub const TENANT_SLUG_HEADER: &str = "x-tenant-slug";
pub const TENANT_QUERY_PARAM: &str = "tenant";
pub const TENANT_COOKIE: &str = "tenant_slug";

/// Where an explicitly supplied tenant slug came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlugSource {
    Subdomain,
    Header,
    Query,
    Cookie,
    OldestActive,
}

/// Everything a request tells us about its tenant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSignals {
    pub forwarded_host: Option<String>,
    pub origin: Option<String>,
    pub host: Option<String>,
    pub tenant_slug_header: Option<String>,
    pub tenant_query: Option<String>,
    pub tenant_cookie: Option<String>,
}

impl RequestSignals {
    pub fn from_request_parts(headers: &HeaderMap, uri: &Uri) -> Self {
        let host = header_value(headers, header::HOST.as_str())
            .or_else(|| uri.authority().map(|a| a.as_str().to_string()));

        Self {
            forwarded_host: header_value(headers, FORWARDED_HOST_HEADER),
            origin: header_value(headers, header::ORIGIN.as_str()),
            host,
            tenant_slug_header: header_value(headers, TENANT_SLUG_HEADER),
            tenant_query: uri.query().and_then(|q| query_value(q, TENANT_QUERY_PARAM)),
            tenant_cookie: cookie_value(headers, TENANT_COOKIE),
        }
    }

    /// The host to look up, in priority order: forwarded host, origin, host.
    /// Lowercased, port kept.
    pub fn candidate_host(&self) -> Option<String> {
        if let Some(forwarded) = &self.forwarded_host {
            // Proxy chains append; the client-facing host comes first
            let first = forwarded.split(',').next().unwrap_or_default();
            if let Some(host) = host::normalize(first) {
                return Some(host);
            }
        }

        if let Some(origin) = self.origin.as_deref().and_then(origin_authority) {
            return Some(origin);
        }

        self.host.as_deref().and_then(host::normalize)
    }

    /// Explicit slug in header → query → cookie order
    pub fn explicit_slug(&self) -> Option<(&str, SlugSource)> {
        [
            (&self.tenant_slug_header, SlugSource::Header),
            (&self.tenant_query, SlugSource::Query),
            (&self.tenant_cookie, SlugSource::Cookie),
        ]
        .into_iter()
        .find_map(|(value, source)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (v, source))
        })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `host[:port]` of an Origin header; `null` and garbage yield `None`
fn origin_authority(origin: &str) -> Option<String> {
    let url = url::Url::parse(origin.trim()).ok()?;
    let host = url.host_str()?;
    let authority = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    host::normalize(&authority)
}

fn query_value(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}
