//! Shared constants for caption generation and rendering.

use image::Rgb;
use std::time::Duration;

/// Default Gemini model used for caption generation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL for the Gemini generateContent API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Fixed prefix carried by every caption-generation failure message.
pub const AI_CAPTION_ERROR_PREFIX: &str = "AI Caption Error:";

/// Default path of the caption font, relative to the working directory.
pub const DEFAULT_FONT_PATH: &str = "fonts/DejaVuSans.ttf";

/// Topic pre-filled into the generate form.
pub const DEFAULT_TOPIC: &str = "My Brain After Coding";

/// Custom header echoing the generated caption on meme responses.
pub const X_MEMESMITH_CAPTION: &str = "x-memesmith-caption";

/// Download filename offered for finished memes.
pub const DOWNLOAD_FILENAME: &str = "ai_generated_meme.png";

/// Caption font size is the image height divided by this.
pub const FONT_HEIGHT_DIVISOR: f32 = 15.0;

/// Wrapped caption lines target at most this fraction of the image width.
pub const WRAP_WIDTH_RATIO: f32 = 0.9;

/// Gap kept between the caption block and the bottom edge, as a fraction of
/// the image height.
pub const BOTTOM_MARGIN_RATIO: f32 = 0.05;

/// Outline thickness is the font size divided by this, with a minimum of one.
pub const STROKE_WIDTH_DIVISOR: f32 = 20.0;

/// Vertical gap in pixels between wrapped caption lines.
pub const LINE_SPACING: u32 = 4;

/// Glyph size of the built-in fallback bitmap font. Fixed; the fallback does
/// not honor the computed caption font size.
pub const BUILTIN_GLYPH_SIZE: u32 = 8;

/// Caption fill color.
pub const FILL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Caption outline color.
pub const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Per-request timeout for caption generation calls.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Upload size cap for the meme endpoint.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
