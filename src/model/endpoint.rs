//! Displayed endpoints are derived on demand from a resource's URLs; they
//! are never stored.

use url::Url;

use super::Resource;
use crate::constants::MAX_TOOLTIP_ENDPOINTS;
use crate::constants::NO_ENDPOINTS_LABEL;

/// A resource endpoint prepared for display: a text label plus the raw URL.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedEndpoint {
    pub name: Option<String>,
    pub text: String,
    pub url: Option<String>,
}

/// Compute the endpoints shown for a resource, preserving declaration order.
/// Internal-only URLs are excluded unless `include_internal` is set.
pub fn displayed_endpoints(
    resource: &Resource,
    include_internal: bool,
) -> Vec<DisplayedEndpoint> {
    resource
        .urls
        .iter()
        .filter(|u| include_internal || !u.is_internal)
        .map(|u| DisplayedEndpoint {
            name: u.name.clone(),
            text: u.url.clone(),
            url: Some(u.url.clone()),
        })
        .collect()
}

/// Resolve the label for a representative endpoint: `host:port` when the
/// endpoint parses as an absolute URL, the raw text otherwise, and a fixed
/// fallback when there is nothing to show. Never fails.
pub fn resolved_endpoint_text(endpoint: Option<&DisplayedEndpoint>) -> String {
    let text = endpoint.map(|e| {
        if !e.text.is_empty() {
            e.text.clone()
        } else {
            e.url.clone().unwrap_or_default()
        }
    });

    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return NO_ENDPOINTS_LABEL.to_string(),
    };

    if let Ok(url) = Url::parse(&text) {
        if let (Some(host), Some(port)) = (url.host_str(), url.port_or_known_default()) {
            return format!("{host}:{port}");
        }
    }

    text
}

/// Tooltip for the endpoints column: one endpoint shows its text, a few show
/// a comma-joined list, and the remainder collapses into a `+ N` suffix.
pub fn endpoints_tooltip(resource: &Resource) -> String {
    let endpoints = displayed_endpoints(resource, false);

    if endpoints.is_empty() {
        return String::new();
    }

    if endpoints.len() == 1 {
        return endpoints[0].text.clone();
    }

    let mut tooltip = endpoints
        .iter()
        .take(MAX_TOOLTIP_ENDPOINTS)
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    if endpoints.len() > MAX_TOOLTIP_ENDPOINTS {
        tooltip.push_str(&format!(" + {}", endpoints.len() - MAX_TOOLTIP_ENDPOINTS));
    }

    tooltip
}
