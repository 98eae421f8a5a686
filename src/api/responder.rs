use std::any::Any;

use axum::{
    extract::{Request, State},
    http::{header::ACCEPT, HeaderMap, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Json, Response},
};

use crate::api::error::{AppError, ErrorReport};
use crate::config::Mode;

/// Terminal middleware that renders every error response.
///
/// Handlers, extractor rejections, the fallback route and caught panics all
/// produce an `AppError`; this is the only place that turns one into the
/// body the client sees.
pub async fn respond(State(mode): State<Mode>, request: Request, next: Next) -> Response {
    let wants_html = prefers_html(request.headers());
    let method = request.method().clone();
    let uri = request.uri().clone();

    let mut response = next.run(request).await;
    let report = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => report,
        // A known path with the wrong verb is answered by the method router itself
        None if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
            AppError::RouteNotFound.report()
        }
        None => return response,
    };

    if report.status.is_server_error() {
        log::error!(
            "{} {} failed with {}: {}",
            method,
            uri,
            report.status,
            report.detail.as_deref().unwrap_or(&report.message)
        );
    } else {
        log::debug!("{} {} -> {}: {}", method, uri, report.status, report.message);
    }

    render(&report, mode, wants_html)
}

fn render(report: &ErrorReport, mode: Mode, wants_html: bool) -> Response {
    let include_detail = !mode.is_production();
    if wants_html {
        (report.status, Html(report.to_html(include_detail))).into_response()
    } else {
        (report.status, Json(report.to_json(include_detail))).into_response()
    }
}

/// True when the client ranks `text/html` above JSON.
///
/// Higher q-value wins; on a tie the range listed first wins.
fn prefers_html(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(ACCEPT).and_then(|value| value.to_str().ok()) else {
        return false;
    };

    let mut html: Option<(f32, usize)> = None;
    let mut json: Option<(f32, usize)> = None;
    for (position, range) in accept.split(',').enumerate() {
        let mut params = range.split(';');
        let media_type = params.next().unwrap_or_default().trim();
        let quality = params
            .filter_map(|param| param.trim().strip_prefix("q="))
            .find_map(|q| q.trim().parse::<f32>().ok())
            .unwrap_or(1.0);

        let slot = match media_type {
            "text/html" => &mut html,
            "application/json" => &mut json,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some((quality, position));
        }
    }

    match (html, json) {
        (Some((html_q, _)), _) if html_q <= 0.0 => false,
        (Some((html_q, html_pos)), Some((json_q, json_pos))) => {
            html_q > json_q || (html_q == json_q && html_pos < json_pos)
        }
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Router fallback for requests that matched no route
pub async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}

/// Turns a panic inside a handler into an ordinary unhandled error
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Unhandled(anyhow::anyhow!("handler panicked: {}", message)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn browsers_get_html() {
        assert!(prefers_html(&accept(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
        )));
        assert!(!prefers_html(&accept("application/json")));
        assert!(!prefers_html(&accept("application/json, text/html")));
        assert!(!prefers_html(&HeaderMap::new()));
    }

    #[test]
    fn accept_quality_values_are_honoured() {
        assert!(!prefers_html(&accept("text/html;q=0.1, application/json")));
        assert!(prefers_html(&accept("application/json;q=0.5, text/html")));
        assert!(prefers_html(&accept("text/html;q=0.9, application/json;q=0.9")));
        assert!(!prefers_html(&accept("text/html;q=0")));
    }

    #[test]
    fn panic_payload_becomes_unhandled_error() {
        let response = panic_response(Box::new("boom"));
        let report = response.extensions().get::<ErrorReport>().unwrap();
        assert_eq!(report.status.as_u16(), 500);
        assert_eq!(report.detail.as_deref(), Some("handler panicked: boom"));
    }
}
