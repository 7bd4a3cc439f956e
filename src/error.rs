//! Error handling

use axum::response::IntoResponse;
use tracing::info;

use crate::caption::CaptionError;

/// definitions for the memesmith application.
#[derive(Debug)]
pub enum MemesmithError {
    /// When you didn't do the right thing
    BadRequest,
    /// Uploaded bytes that do not decode as a supported image
    UnreadableImage,
    /// Caption generation failed; carries the marker-prefixed message
    Caption(CaptionError),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl From<CaptionError> for MemesmithError {
    fn from(err: CaptionError) -> Self {
        MemesmithError::Caption(err)
    }
}

impl From<std::io::Error> for MemesmithError {
    fn from(err: std::io::Error) -> Self {
        MemesmithError::InternalServerError(err.to_string())
    }
}

impl From<axum::http::Error> for MemesmithError {
    fn from(err: axum::http::Error) -> Self {
        MemesmithError::InternalServerError(err.to_string())
    }
}

impl From<image::ImageError> for MemesmithError {
    fn from(err: image::ImageError) -> Self {
        MemesmithError::InternalServerError(err.to_string())
    }
}

impl IntoResponse for MemesmithError {
    fn into_response(self) -> axum::response::Response {
        match self {
            MemesmithError::BadRequest => {
                info!("Bad request received");
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Bad Request"));
                *response.status_mut() = axum::http::StatusCode::BAD_REQUEST;
                response
            }
            MemesmithError::UnreadableImage => {
                info!("Upload could not be decoded as an image");
                let mut response = axum::response::Response::new(axum::body::Body::from(
                    "Could not decode the uploaded image. PNG and JPEG are supported.",
                ));
                *response.status_mut() = axum::http::StatusCode::BAD_REQUEST;
                response
            }
            MemesmithError::Caption(err) => {
                tracing::error!("Caption generation failed: {}", err);
                let mut response =
                    axum::response::Response::new(axum::body::Body::from(err.to_string()));
                *response.status_mut() = axum::http::StatusCode::BAD_GATEWAY;
                response
            }
            MemesmithError::InternalServerError(message) => {
                tracing::error!("Internal server error: {}", message);
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Internal server error"));
                *response.status_mut() = axum::http::StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
        }
    }
}
