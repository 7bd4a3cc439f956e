//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;
use std::path::PathBuf;

use crate::constants::{DEFAULT_FONT_PATH, DEFAULT_MODEL};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "MEMESMITH_DEBUG")]
    /// Enable debug logging. Env: MEMESMITH_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "9000", env = "MEMESMITH_PORT")]
    /// http listener, defaults to `9000`.
    /// Env: MEMESMITH_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "MEMESMITH_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: MEMESMITH_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    /// Gemini API key. Caption generation reports a configuration error when
    /// this is unset. Env: GEMINI_API_KEY
    pub gemini_api_key: Option<String>,

    #[clap(long, default_value = DEFAULT_MODEL, env = "MEMESMITH_MODEL")]
    /// Text model used for caption generation.
    /// Env: MEMESMITH_MODEL
    pub model: String,

    #[clap(long, short, default_value = DEFAULT_FONT_PATH, env = "MEMESMITH_FONT_PATH")]
    /// Path to a TrueType/OpenType caption font. Falls back to the built-in
    /// bitmap font when missing. Env: MEMESMITH_FONT_PATH
    pub font_path: PathBuf,
}
