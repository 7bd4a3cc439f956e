//! Caption rendering: wrap, measure, outline, and burn text into an image.
//!
//! The renderer never fails. Every sub-step that can degrade (a missing or
//! broken font file) swaps in a fallback and records a [`RenderNotice`]; a
//! captioned copy of the source image is always returned.

mod font;
mod wrap;

pub use font::{RenderNotice, ResolvedFont};
pub use wrap::wrap_caption;

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::constants::{
    BOTTOM_MARGIN_RATIO, FILL_COLOR, FONT_HEIGHT_DIVISOR, LINE_SPACING, OUTLINE_COLOR,
    STROKE_WIDTH_DIVISOR, WRAP_WIDTH_RATIO,
};

/// A rendered meme plus any degradations hit along the way.
pub struct CaptionedImage {
    /// The captioned copy of the source image.
    pub image: RgbImage,
    /// Non-fatal degradation notices, suitable for showing to the user.
    pub notices: Vec<RenderNotice>,
}

/// Geometry of the wrapped caption block on the canvas.
struct BlockLayout {
    x: i64,
    y: i64,
    width: u32,
    line_height: u32,
}

/// Caption font size in pixels for an image `height` pixels tall.
pub fn font_size_for(height: u32) -> u32 {
    ((height as f32 / FONT_HEIGHT_DIVISOR).round() as u32).max(1)
}

/// Outline thickness for a caption rendered at `font_size` pixels.
pub fn stroke_width_for(font_size: u32) -> u32 {
    ((font_size as f32 / STROKE_WIDTH_DIVISOR).round() as u32).max(1)
}

/// Draws `caption` onto the bottom of a copy of `image`.
///
/// The caption is word-wrapped to 90% of the image width, centered per line,
/// anchored above a 5%-of-height bottom margin, and drawn white over a black
/// offset-redraw outline. The source image is never modified.
pub fn add_caption(image: &RgbImage, caption: &str, font_path: &Path) -> CaptionedImage {
    let mut out = image.clone();
    let mut notices = Vec::new();

    let (img_w, img_h) = out.dimensions();
    let font_size = font_size_for(img_h);
    let (font, notice) = ResolvedFont::resolve(font_path, font_size);
    if let Some(notice) = notice {
        notices.push(notice);
    }

    let wrap_budget = (img_w as f32 * WRAP_WIDTH_RATIO).floor() as u32;
    let lines = wrap_caption(caption, wrap_budget, |line| font.line_width(line));
    if lines.is_empty() {
        return CaptionedImage { image: out, notices };
    }

    let line_height = font.line_height();
    let block_w = lines
        .iter()
        .map(|line| font.line_width(line))
        .max()
        .unwrap_or(0);
    let block_h = line_height * lines.len() as u32 + LINE_SPACING * (lines.len() as u32 - 1);

    let bottom_margin = (img_h as f32 * BOTTOM_MARGIN_RATIO).round() as i64;
    let layout = BlockLayout {
        x: (i64::from(img_w) - i64::from(block_w)) / 2,
        y: i64::from(img_h) - i64::from(block_h) - bottom_margin,
        width: block_w,
        line_height,
    };

    // Offset redraws approximate a stroked outline; cost grows quadratically
    // with the stroke width.
    let stroke = i64::from(stroke_width_for(font.size()));
    for dy in -stroke..=stroke {
        for dx in -stroke..=stroke {
            if dx == 0 && dy == 0 {
                continue;
            }
            draw_block(&mut out, &font, OUTLINE_COLOR, &layout, dx, dy, &lines);
        }
    }
    draw_block(&mut out, &font, FILL_COLOR, &layout, 0, 0, &lines);

    CaptionedImage { image: out, notices }
}

/// Draws the wrapped block, each line centered within the block width.
fn draw_block(
    canvas: &mut RgbImage,
    font: &ResolvedFont,
    color: Rgb<u8>,
    layout: &BlockLayout,
    dx: i64,
    dy: i64,
    lines: &[String],
) {
    for (index, line) in lines.iter().enumerate() {
        let line_w = font.line_width(line);
        let line_x = layout.x + dx + (i64::from(layout.width) - i64::from(line_w)) / 2;
        let line_y =
            layout.y + dy + index as i64 * i64::from(layout.line_height + LINE_SPACING);
        font.draw_line(canvas, color, line_x as i32, line_y as i32, line);
    }
}
