//! Font resolution and glyph metrics for the caption renderer.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::debug;

use crate::constants::BUILTIN_GLYPH_SIZE;

/// Non-fatal degradations hit while rendering a caption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderNotice {
    /// The configured font could not be read or parsed; the built-in bitmap
    /// font was used instead.
    FontFallback {
        /// The path that failed to resolve.
        path: String,
        /// The underlying read or parse failure.
        reason: String,
    },
}

impl std::fmt::Display for RenderNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FontFallback { path, reason } => write!(
                f,
                "Font file not usable at {path} ({reason}). Using the built-in font."
            ),
        }
    }
}

/// A font usable for caption layout and drawing.
pub enum ResolvedFont {
    /// A TrueType/OpenType font honoring the computed pixel size.
    Truetype {
        /// Parsed font data.
        font: FontVec,
        /// Uniform pixel scale derived from the image height.
        scale: PxScale,
    },
    /// The fixed-size built-in bitmap font. Ignores the computed pixel size
    /// and covers basic Latin only; loading it cannot fail.
    Builtin,
}

impl ResolvedFont {
    /// Loads the font at `path` at `font_size` pixels, falling back to the
    /// built-in bitmap font when the file is missing or unparseable.
    pub fn resolve(path: &Path, font_size: u32) -> (Self, Option<RenderNotice>) {
        match load_truetype(path, font_size) {
            Ok(font) => (font, None),
            Err(reason) => {
                debug!("Falling back to the built-in font: {}", reason);
                (
                    Self::Builtin,
                    Some(RenderNotice::FontFallback {
                        path: path.display().to_string(),
                        reason,
                    }),
                )
            }
        }
    }

    /// Pixel size the font actually renders at.
    pub fn size(&self) -> u32 {
        match self {
            Self::Truetype { scale, .. } => scale.y.round() as u32,
            Self::Builtin => BUILTIN_GLYPH_SIZE,
        }
    }

    /// Rendered pixel width of a single line of text.
    pub fn line_width(&self, text: &str) -> u32 {
        match self {
            Self::Truetype { font, scale } => text_size(*scale, font, text).0,
            Self::Builtin => BUILTIN_GLYPH_SIZE * text.chars().count() as u32,
        }
    }

    /// Height of one line, independent of the text drawn on it.
    pub fn line_height(&self) -> u32 {
        match self {
            Self::Truetype { scale, .. } => scale.y.round() as u32,
            Self::Builtin => BUILTIN_GLYPH_SIZE,
        }
    }

    /// Draws one line with its top-left corner at `(x, y)`, clipped to the
    /// canvas bounds.
    pub fn draw_line(&self, canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, text: &str) {
        match self {
            Self::Truetype { font, scale } => {
                draw_text_mut(canvas, color, x, y, *scale, font, text);
            }
            Self::Builtin => draw_bitmap_line(canvas, color, x, y, text),
        }
    }
}

fn load_truetype(path: &Path, font_size: u32) -> Result<ResolvedFont, String> {
    let bytes = std::fs::read(path).map_err(|err| err.to_string())?;
    let font = FontVec::try_from_vec(bytes).map_err(|err| err.to_string())?;
    Ok(ResolvedFont::Truetype {
        font,
        scale: PxScale::from(font_size as f32),
    })
}

/// Blits 8x8 bitmap glyphs with a monospace advance, skipping characters the
/// basic set does not cover.
fn draw_bitmap_line(canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, text: &str) {
    let (width, height) = canvas.dimensions();
    for (index, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            continue;
        };
        let glyph_x = x + index as i32 * BUILTIN_GLYPH_SIZE as i32;
        for (row, row_bits) in glyph.iter().enumerate() {
            for bit in 0..8u8 {
                if row_bits & (1u8 << bit) == 0 {
                    continue;
                }
                let px = glyph_x + i32::from(bit);
                let py = y + row as i32;
                if (0..width as i32).contains(&px) && (0..height as i32).contains(&py) {
                    canvas.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}
