use clap::Parser;
use memesmith::config::setup_logging;
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = memesmith::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    if let Err(err) = memesmith::web::setup_server(
        &cli.listen_address,
        cli.port,
        cli.gemini_api_key,
        &cli.model,
        cli.font_path,
    )
    .await
    {
        error!("Application error: {}", err);
    }
}
