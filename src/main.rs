//! `souschef` command line program. Asks for ingredients and preferences,
//! generates a recipe and optionally saves it.

use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use souschef::{session::Stdin, Client, Config, Model, Session, Store};

/// Generate recipes from the ingredients you have using Google's Gemini
/// models.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Environment variable holding the API key.
    #[arg(long, default_value = Config::DEFAULT_KEY_VAR)]
    api_key_env: String,
    /// Model to try, in order. May be given more than once. Overrides
    /// `SOUSCHEF_MODELS`.
    #[arg(short, long = "model")]
    models: Vec<Model>,
    /// Directory recipes are saved to. Overrides `SOUSCHEF_OUTPUT_DIR`.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Request timeout in seconds. Overrides `SOUSCHEF_TIMEOUT`.
    #[arg(short, long)]
    timeout: Option<u64>,
    /// API base URL. Overrides `SOUSCHEF_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,
}

/// Apply command line overrides to the environment configuration.
fn configure(args: Args) -> souschef::config::Result<Config> {
    let mut config = Config::from_env_var(&args.api_key_env)?;

    if !args.models.is_empty() {
        config = config.models(args.models)?;
    }
    if let Some(dir) = args.output_dir {
        config = config.output_dir(dir);
    }
    if let Some(secs) = args.timeout {
        config = config.timeout(Duration::from_secs(secs));
    }
    if let Some(url) = args.base_url {
        config = config.base_url(url);
    }

    Ok(config)
}

/// Print a fatal configuration error with instructions for fixing it.
fn configuration_error(error: &dyn std::fmt::Display, key_var: &str) {
    eprintln!("Configuration Error: {error}");
    eprintln!();
    eprintln!("To fix this:");
    eprintln!(
        "1. Get an API key from https://aistudio.google.com/app/apikey"
    );
    eprintln!("2. Set it in your environment: export {key_var}='your-api-key'");
    eprintln!("   or add `{key_var}=your-api-key` to a `.env` file");
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing `.env` file is fine.
    dotenvy::dotenv().ok();

    #[cfg(feature = "log")]
    env_logger::init();

    let args = Args::parse();
    let key_var = args.api_key_env.clone();

    let config = match configure(args) {
        Ok(config) => config,
        Err(error) => {
            configuration_error(&error, &key_var);
            return ExitCode::FAILURE;
        }
    };

    let store = Store::new(config.output_dir.clone());

    let client = match Client::connect(config).await {
        Ok(client) => client,
        Err(error) if error.is_configuration() => {
            configuration_error(&error, &key_var);
            return ExitCode::FAILURE;
        }
        Err(error) => {
            eprintln!("Could not start: {error}");
            return ExitCode::FAILURE;
        }
    };

    let mut session =
        Session::new(client, Stdin::spawn(), std::io::stdout(), store);

    match session.run().await {
        Ok(_reason) => {
            #[cfg(feature = "log")]
            log::debug!("Exiting after {:?}", _reason);
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Unexpected error: {error}");
            ExitCode::FAILURE
        }
    }
}
