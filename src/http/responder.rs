//! Exception-to-JSON translation at the edge of request handling.
//!
//! Every uncaught failure funnels through [`ErrorResponder::respond`], which
//! produces the uniform envelope:
//!
//! ```json
//! { "errors": [{ "general": "..." }], "message": "...", "code": 400 }
//! ```
//!
//! Validation failures get their own envelope with the first message per
//! field. Requests that do not want JSON are passed back to the framework's
//! default rendering (`None`).

use std::backtrace::Backtrace;

use log::error;
use serde_json::{json, Map, Value};

use crate::error::CoreError;
use crate::http::{HttpRequest, JsonResponse};
use crate::translate::Translator;
use crate::types::HttpStatus;

/// A failure surfacing at the request boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// The route exists but not for this method.
    MethodNotAllowed,
    /// A record lookup came up empty.
    ModelNotFound,
    /// Input validation failed: per-field message lists, in input order.
    Validation(Vec<(String, Vec<String>)>),
    /// CSRF token mismatch.
    TokenMismatch,
    /// A failure already carrying an HTTP status.
    Http { status: u16, message: String },
    /// Anything else.
    Internal(String),
}

impl From<CoreError> for RequestError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(_) => RequestError::ModelNotFound,
            other => RequestError::Internal(other.to_string()),
        }
    }
}

impl RequestError {
    fn type_name(&self) -> &'static str {
        match self {
            RequestError::MethodNotAllowed => "MethodNotAllowed",
            RequestError::ModelNotFound => "ModelNotFound",
            RequestError::Validation(_) => "Validation",
            RequestError::TokenMismatch => "TokenMismatch",
            RequestError::Http { .. } => "Http",
            RequestError::Internal(_) => "Internal",
        }
    }
}

/// Maps request errors to JSON envelopes.
pub struct ErrorResponder<'a> {
    translator: &'a dyn Translator,
    prefix: &'a str,
    debug: bool,
}

impl<'a> ErrorResponder<'a> {
    pub fn new(translator: &'a dyn Translator, prefix: &'a str, debug: bool) -> Self {
        Self {
            translator,
            prefix,
            debug,
        }
    }

    /// Render an error for a request. Returns `None` when the request does
    /// not want JSON, leaving rendering to the framework default.
    pub fn respond(&self, request: &dyn HttpRequest, err: RequestError) -> Option<JsonResponse> {
        if !request.wants_json() {
            return None;
        }

        // Normalize framework conditions before generic handling
        let err = match err {
            RequestError::MethodNotAllowed | RequestError::ModelNotFound => RequestError::Http {
                status: HttpStatus::NOT_FOUND as u16,
                message: self.translate("not_found"),
            },
            RequestError::Validation(messages) => {
                return Some(self.validation_response(messages));
            }
            RequestError::TokenMismatch => {
                RequestError::Internal(self.translate("csrf_token_error"))
            }
            other => other,
        };

        Some(self.generic_response(err))
    }

    fn translate(&self, key: &str) -> String {
        self.translator.translate(&format!("{}.{}", self.prefix, key))
    }

    /// `{errors: [{field: first message}], message, code}` with a fixed 422.
    /// Only the first message per field survives.
    fn validation_response(&self, messages: Vec<(String, Vec<String>)>) -> JsonResponse {
        let code = HttpStatus::UNPROCESSABLE_ENTITY;
        let errors: Vec<Value> = messages
            .into_iter()
            .filter_map(|(field, mut field_messages)| {
                if field_messages.is_empty() {
                    return None;
                }
                Some(json!({ field: field_messages.remove(0) }))
            })
            .collect();

        JsonResponse::new(
            code as u16,
            json!({
                "errors": errors,
                "message": "Unprocessable entity",
                "code": code,
            }),
        )
    }

    fn generic_response(&self, err: RequestError) -> JsonResponse {
        let (status, message) = match &err {
            RequestError::Http { status, message } => (*status, message.clone()),
            RequestError::Internal(message) => (HttpStatus::BAD_REQUEST as u16, message.clone()),
            // Normalized away in respond(); kept total for direct callers
            other => (HttpStatus::BAD_REQUEST as u16, format!("{:?}", other)),
        };
        let general = if message.is_empty() {
            self.translate("something_went_wrong")
        } else {
            message.clone()
        };

        error!("request failed with {}: {}", status, general);

        let mut body = Map::new();
        body.insert("errors".to_string(), json!([{ "general": general }]));
        if self.debug {
            body.insert("exception".to_string(), json!(err.type_name()));
            let trace: Vec<String> = Backtrace::force_capture()
                .to_string()
                .lines()
                .map(str::to_string)
                .collect();
            body.insert("trace".to_string(), json!(trace));
        }
        body.insert("message".to_string(), json!(message));
        body.insert("code".to_string(), json!(status));

        JsonResponse::new(status, Value::Object(body))
    }
}
