use std::io::Write;
use std::path::Path;

use image::{Rgb, RgbImage};
use memesmith::config::setup_logging;
use memesmith::render::add_caption;

const BACKGROUND: Rgb<u8> = Rgb([90, 90, 90]);

#[test]
fn caption_ink_stays_in_the_bottom_band() {
    let _ = setup_logging(true);

    let source = RgbImage::from_pixel(1000, 1000, BACKGROUND);
    let result = add_caption(
        &source,
        "when the code finally compiles",
        Path::new("no-such-font.ttf"),
    );

    assert_eq!(result.image.dimensions(), (1000, 1000));

    let mut changed = 0usize;
    for (x, y, pixel) in result.image.enumerate_pixels() {
        if *pixel != BACKGROUND {
            changed += 1;
            assert!(y >= 800, "stray caption pixel at ({x}, {y})");
        }
    }
    assert!(changed > 0, "caption left no pixels behind");
}

#[test]
fn source_image_is_never_mutated() {
    let source = RgbImage::from_pixel(640, 480, BACKGROUND);
    let before = source.clone();

    let result = add_caption(
        &source,
        "immutability is a feature",
        Path::new("no-such-font.ttf"),
    );

    assert_eq!(source, before);
    assert_eq!(result.image.dimensions(), (640, 480));
}

#[test]
fn corrupt_font_file_still_produces_a_meme() {
    let mut font_file = tempfile::NamedTempFile::new().expect("create temp file");
    font_file
        .write_all(b"00 not a truetype font")
        .expect("write temp file");

    let source = RgbImage::from_pixel(300, 200, BACKGROUND);
    let result = add_caption(&source, "degraded but present", font_file.path());

    assert_eq!(result.image.dimensions(), (300, 200));
    assert_eq!(result.notices.len(), 1);
    assert_ne!(result.image, source);
}

#[test]
fn long_captions_wrap_instead_of_spilling_sideways() {
    let source = RgbImage::from_pixel(240, 800, BACKGROUND);
    let result = add_caption(
        &source,
        "an extremely long caption that cannot possibly fit on a single line here",
        Path::new("no-such-font.ttf"),
    );

    // With an 8 px fallback glyph and a 216 px budget, the caption has to
    // break across lines; every changed pixel still sits in the bottom half.
    for (x, y, pixel) in result.image.enumerate_pixels() {
        if *pixel != BACKGROUND {
            assert!(y >= 400, "stray caption pixel at ({x}, {y})");
        }
    }
}
