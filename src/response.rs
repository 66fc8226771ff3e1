use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use log::debug;
use serde::Serialize;

use crate::error::AppError;

#[derive(Serialize)]
pub struct ErrorDto {
    pub error: String,
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("rejected request body: {}", err);
    AppError::invalid_input().into()
}

pub fn response_from_error(err: &AppError) -> HttpResponse {
    match err {
        // 404 carries no body
        AppError::NotFound => HttpResponse::NotFound().finish(),
        _ => {
            let status = actix_web::ResponseError::status_code(err);
            HttpResponse::build(status).json(ErrorDto { error: err.msg() })
        }
    }
}

/// Bodyless success with the given status (201, 204, 205 and friends).
pub fn empty(status: StatusCode) -> HttpResponse {
    HttpResponse::build(status).finish()
}
