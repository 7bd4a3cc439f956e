use anyhow::{Context, Result, anyhow};
use clap::Parser;
use memesmith::caption::CaptionClient;
use memesmith::constants::{DEFAULT_FONT_PATH, DEFAULT_MODEL};
use memesmith::render::add_caption;
use std::fs;
use std::path::PathBuf;

/// Create an AI-captioned meme from a local image.
///
/// Minimal UX:
///   meme_generator cat.png "Monday meetings"
#[derive(Parser, Debug)]
#[command(name = "meme_generator")]
#[command(about = "Caption a local image with a Gemini-generated meme line")]
struct Args {
    /// Base image to caption (PNG or JPEG)
    image: PathBuf,

    /// Topic for the caption
    topic: String,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Text model used for caption generation
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Caption font; the built-in bitmap font is used when this is missing
    #[arg(long, default_value = DEFAULT_FONT_PATH)]
    font_path: PathBuf,

    /// Skip the model call and use this caption verbatim
    #[arg(long)]
    caption: Option<String>,

    /// Output path for the finished PNG
    #[arg(long, default_value = "meme.png")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let source = image::open(&args.image)
        .with_context(|| format!("Failed to open {}", args.image.display()))?
        .to_rgb8();

    let caption = match args.caption {
        Some(caption) => caption,
        None => {
            let client = CaptionClient::new(args.gemini_api_key, &args.model);
            client
                .generate_caption(&args.topic)
                .await
                .map_err(|err| anyhow!("{err}"))?
        }
    };
    eprintln!("Caption: {caption}");

    let rendered = add_caption(&source, &caption, &args.font_path);
    for notice in &rendered.notices {
        eprintln!("Warning: {notice}");
    }

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    rendered
        .image
        .save(&args.out)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;

    eprintln!("Saved: {}", args.out.display());
    Ok(())
}
