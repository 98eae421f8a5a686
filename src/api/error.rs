use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::model::{FieldError, ValidationError};
use crate::store::StoreError;

pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong, please try again";

/// Every way a request can fail once it has reached a handler
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    NotFound(String),
    #[error("Route does not exist")]
    RouteNotFound,
    #[error("{}", GENERIC_FAILURE_MESSAGE)]
    Unhandled(#[source] anyhow::Error),
}

impl AppError {
    pub fn task_not_found(id: &str) -> Self {
        Self::NotFound(format!("No task with id: {}", id))
    }

    pub fn author_not_found(id: &str) -> Self {
        Self::NotFound(format!("No author with id: {}", id))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn report(&self) -> ErrorReport {
        let (errors, detail) = match self {
            AppError::Validation(err) => (err.errors.clone(), None),
            AppError::Unhandled(err) => (Vec::new(), Some(format!("{:#}", err))),
            AppError::NotFound(_) | AppError::RouteNotFound => (Vec::new(), None),
        };
        ErrorReport {
            status: self.status(),
            message: self.to_string(),
            errors,
            detail,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(err) => AppError::Validation(err),
            StoreError::Backend(err) => AppError::Unhandled(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationError::malformed(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(ValidationError::new("query", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(ValidationError::new("path", rejection.body_text()))
    }
}

/// What the centralized responder needs to render an error.
///
/// Attached to the response extensions so the error survives until the
/// outermost layer, which decides on the final format.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
    pub errors: Vec<FieldError>,
    pub detail: Option<String>,
}

impl ErrorReport {
    pub fn to_json(&self, include_detail: bool) -> Value {
        let mut body = json!({ "msg": self.message });
        if !self.errors.is_empty() {
            body["errors"] = json!(self.errors);
        }
        if include_detail {
            if let Some(detail) = &self.detail {
                body["detail"] = json!(detail);
            }
        }
        body
    }

    pub fn to_html(&self, include_detail: bool) -> String {
        let mut html = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"UTF-8\"><title>{status}</title></head>\n<body>\n<h1>{message}</h1>\n<h2>{status}</h2>\n",
            status = self.status,
            message = escape_html(&self.message),
        );
        if !self.errors.is_empty() {
            html.push_str("<ul>\n");
            for error in &self.errors {
                html.push_str(&format!(
                    "<li><strong>{}</strong>: {}</li>\n",
                    escape_html(&error.field),
                    escape_html(&error.message)
                ));
            }
            html.push_str("</ul>\n");
        }
        if include_detail {
            if let Some(detail) = &self.detail {
                html.push_str(&format!("<pre>{}</pre>\n", escape_html(detail)));
            }
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let report = self.report();
        // Without the responder layer this is the final body, so keep it free of diagnostics
        let mut response = (report.status, Json(report.to_json(false))).into_response();
        response.extensions_mut().insert(report);
        response
    }
}
