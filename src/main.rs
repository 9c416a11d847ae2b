// Entrypoint for the CLI application.
// - Parses flags, resolves the endpoint configuration and builds the client.
// - With a file argument: one prediction, then exit. Without: the menu.

use clap::Parser;
use emotion_predict_cli::{
    api::PredictClient,
    config::{default_config_path, ClientConfig, ConfigOverrides},
    logging,
    ui::{main_menu, predict_once, UiOptions},
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "emotion-predict",
    version,
    about = "Send a .wav recording to a speech emotion prediction API"
)]
struct Args {
    /// .wav file to send. Omit to open the interactive menu.
    file: Option<PathBuf>,
    /// Base URL of the prediction service (e.g. http://localhost:8001)
    #[arg(long)]
    url: Option<String>,
    /// Path of the predict endpoint, appended to the base URL
    #[arg(long)]
    path: Option<String>,
    /// Multipart field name the service reads the file from
    #[arg(long)]
    field: Option<String>,
    /// Request timeout in seconds; 0 waits forever
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
    /// Config file to read instead of ~/.emotion_predict.json
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Never open the native file dialog
    #[arg(long)]
    no_dialog: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    logging::init(args.verbose);

    let cli = ConfigOverrides {
        base_url: args.url,
        predict_path: args.path,
        field_name: args.field,
        timeout_secs: args.timeout,
    };
    let config = ClientConfig::resolve(args.config.as_deref(), &cli)?;
    log::debug!("resolved config: {:?}", config);
    let api = PredictClient::new(config)?;

    if let Some(file) = args.file {
        return predict_once(&api, &file);
    }

    let opts = UiOptions {
        use_dialog: !args.no_dialog,
        config_path: args.config.unwrap_or_else(default_config_path),
    };
    // Blocks until the user exits.
    main_menu(api, &opts)?;
    Ok(ExitCode::SUCCESS)
}
