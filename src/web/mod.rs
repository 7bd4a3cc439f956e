//! The axum surface: upload form, meme endpoint, stylesheet.

use std::io::Cursor;
use std::num::NonZeroU16;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderValue, header::CONTENT_TYPE};
use axum::response::IntoResponse;
use base64::Engine;
use base64::engine::general_purpose;
use tracing::{debug, error, info};

use crate::caption::CaptionClient;
use crate::constants::{DEFAULT_TOPIC, DOWNLOAD_FILENAME, MAX_UPLOAD_BYTES, X_MEMESMITH_CAPTION};
use crate::error::MemesmithError;
use crate::render;

mod views;

use views::{IndexTemplate, MemeTemplate};

#[derive(Clone)]
pub(crate) struct AppState {
    caption_client: CaptionClient,
    font_path: Arc<PathBuf>,
}

impl AppState {
    fn new(caption_client: CaptionClient, font_path: PathBuf) -> Self {
        Self {
            caption_client,
            font_path: Arc::new(font_path),
        }
    }
}

async fn index_handler() -> IndexTemplate {
    IndexTemplate {
        default_topic: DEFAULT_TOPIC,
    }
}

async fn create_meme_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<axum::response::Response, MemesmithError> {
    let mut image_bytes: Option<Vec<u8>> = None;
    let mut topic = String::new();

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        debug!("Failed to read multipart field: {}", err);
        MemesmithError::BadRequest
    })? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "image" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| MemesmithError::InternalServerError(err.to_string()))?;
                image_bytes = Some(bytes.to_vec());
            }
            "topic" => {
                topic = field
                    .text()
                    .await
                    .map_err(|err| MemesmithError::InternalServerError(err.to_string()))?;
            }
            _ => {}
        }
    }

    let image_bytes = image_bytes.ok_or(MemesmithError::BadRequest)?;
    let source = decode_source_image(&image_bytes)?;

    let caption = state.caption_client.generate_caption(&topic).await?;
    info!("Generated caption: {}", caption);

    let rendered = render::add_caption(&source, &caption, &state.font_path);
    let png = encode_png(&rendered.image)?;

    let template = MemeTemplate {
        caption: caption.clone(),
        warnings: rendered
            .notices
            .iter()
            .map(|notice| notice.to_string())
            .collect(),
        image_b64: general_purpose::STANDARD.encode(&png),
        download_filename: DOWNLOAD_FILENAME,
    };

    let mut response = template.into_response();
    if let Ok(value) = HeaderValue::from_str(&caption) {
        response.headers_mut().insert(X_MEMESMITH_CAPTION, value);
    }
    Ok(response)
}

/// Decodes uploaded bytes into an RGB image, dropping any alpha channel.
fn decode_source_image(bytes: &[u8]) -> Result<image::RgbImage, MemesmithError> {
    if bytes.len() < 4 {
        debug!("Upload is too short to be an image");
        return Err(MemesmithError::UnreadableImage);
    }

    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| {
            debug!("Failed to guess image format: {}", err);
            MemesmithError::UnreadableImage
        })?;
    let decoded = reader.decode().map_err(|err| {
        debug!("Failed to decode image: {}", err);
        MemesmithError::UnreadableImage
    })?;
    Ok(decoded.to_rgb8())
}

fn encode_png(image: &image::RgbImage) -> Result<Vec<u8>, MemesmithError> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
    Ok(png)
}

async fn styles_handler() -> impl IntoResponse {
    const STYLES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/styles.css"));
    ([(CONTENT_TYPE, "text/css")], STYLES)
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(index_handler))
        .route("/meme", axum::routing::post(create_meme_handler))
        .route("/static/styles.css", axum::routing::get(styles_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Builds the app state and serves it until the listener fails.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    gemini_api_key: Option<String>,
    model: &str,
    font_path: PathBuf,
) -> Result<(), anyhow::Error> {
    let caption_client = CaptionClient::new(gemini_api_key, model);
    let app = create_router().with_state(AppState::new(caption_client, font_path));

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::constants::AI_CAPTION_ERROR_PREFIX;

    const BOUNDARY: &str = "memesmith-test-boundary";

    fn setup_app() -> Router {
        let state = AppState::new(
            CaptionClient::new(None, "test-model"),
            PathBuf::from("missing-font.ttf"),
        );
        create_router().with_state(state)
    }

    async fn read_body(response: axum::response::Response) -> String {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        String::from_utf8_lossy(&bytes).to_string()
    }

    /// Builds a multipart body from (name, filename, bytes) triples.
    fn multipart_body(fields: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, bytes) in fields {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match filename {
                Some(filename) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn meme_request(fields: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/meme")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields)))
            .expect("build request")
    }

    fn png_fixture() -> Vec<u8> {
        let image = image::RgbImage::from_pixel(16, 16, image::Rgb([10, 20, 30]));
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("encode test png");
        png
    }

    #[tokio::test]
    async fn index_page_renders_the_form() {
        let app = setup_app();

        let request = Request::builder()
            .method("GET")
            .uri("/")
            .body(Body::empty())
            .expect("build request");
        let response = app.oneshot(request).await.expect("send request");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        assert!(body.contains("memesmith"));
        assert!(body.contains("multipart/form-data"));
        assert!(body.contains(DEFAULT_TOPIC));
    }

    #[tokio::test]
    async fn styles_are_served_as_css() {
        let app = setup_app();

        let request = Request::builder()
            .method("GET")
            .uri("/static/styles.css")
            .body(Body::empty())
            .expect("build request");
        let response = app.oneshot(request).await.expect("send request");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .expect("content type header"),
            "text/css"
        );
    }

    #[tokio::test]
    async fn meme_without_an_image_field_is_rejected() {
        let app = setup_app();

        let response = app
            .oneshot(meme_request(&[("topic", None, b"cats")]))
            .await
            .expect("send request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn undecodable_upload_is_rejected() {
        let app = setup_app();

        let response = app
            .oneshot(meme_request(&[
                ("image", Some("base.png"), b"this is not an image at all"),
                ("topic", None, b"cats"),
            ]))
            .await
            .expect("send request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_body(response).await;
        assert!(body.contains("decode"));
    }

    #[tokio::test]
    async fn missing_credential_reports_the_marker_string() {
        let app = setup_app();
        let png = png_fixture();

        let response = app
            .oneshot(meme_request(&[
                ("image", Some("base.png"), &png),
                ("topic", None, b"rust"),
            ]))
            .await
            .expect("send request");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = read_body(response).await;
        assert!(
            body.starts_with(AI_CAPTION_ERROR_PREFIX),
            "body should carry the marker prefix: {body}"
        );
    }
}
