use std::process::ExitCode;

use chrono::Local;
use dotenv;
use tracing::{
    error,
    info,
    warn,
};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
pub mod price_info;
pub mod price_source;
pub mod report;
pub mod snapshot;
pub mod storage;
pub mod units;
pub mod updater;
pub mod valuation;

use config::{
    Config,
    StorageKind,
};
use price_source::HttpPriceSource;
use storage::{
    json_file::JsonFile,
    stdout::Stdout,
    Storage,
};
use updater::Updater;



/// Exit status for configuration problems, nothing was fetched or written.
const EXIT_CONFIG: u8 = 2;



#[tokio::main]
async fn main() -> ExitCode {
    // Values can also come straight from process environment (i.e. CI
    // secrets), so missing .env is fine. Loaded first so that RUST_LOG from
    // .env is honored.
    let dotenv_res = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    if let Err(e) = dotenv_res {
        if !e.not_found() {
            warn!("could not load .env, error: {:?}", e);
        }
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {}", e);
            return ExitCode::from(EXIT_CONFIG)
        }
    };

    if let Some(name) = config.source.missing_key() {
        warn!("{} is not configured, {} prices will not be available", name,
            config.source.provider.name()
        );
    }

    let source = match HttpPriceSource::new(config.source.clone()) {
        Ok(source) => source,
        Err(e) => {
            error!("could not build HTTP client: {}", e);
            return ExitCode::from(EXIT_CONFIG)
        }
    };

    info!("Gold & Silver price update");

    // Storage is picked by configuration, the rest of the run does not care.
    let outcome = match config.storage {
        StorageKind::File => {
            let storage = JsonFile::new(&config.data_path);
            update(&config, &source, &storage).await
        }
        StorageKind::Stdout => {
            update(&config, &source, &Stdout::new()).await
        }
    };

    outcome.into()
}



async fn update(config: &Config, source: &HttpPriceSource,
    storage: &(impl Storage + Sync)
)
    -> updater::Outcome
{
    let updater = Updater {
        source,
        storage,
        weights: &config.weights,
        base: &config.source.base,
        quote: &config.source.quote,
    };

    let now = Local::now();
    updater.run(&now).await
}
