// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hdb_datasource_strava::auth::{load_credentials, oauth2_config};
use hdb_datasource_strava::collector::StravaCollector;
use hdb_datasource_strava::config::Config;
use hdb_datasource_strava::constants::{config_keys, defaults};
use hdb_datasource_strava::logging::LoggingConfig;
use hdb_datasource_strava::oauth2_client::OAuth2Client;
use hdb_datasource_strava::publisher::StdoutPublisher;
use hdb_datasource_strava::scheduled::ScheduledCollector;
use hdb_datasource_strava::secrets::EnvironmentSecretsManager;
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path of the TOML config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect stats and activities once and publish the event (default)
    Run,
    /// Print the URL to authorize this application and obtain STRAVA_AUTH_CODE
    AuthUrl {
        #[arg(long, default_value = "hdb-datasource-strava")]
        state: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config).context("Failed to load configuration")?;
    LoggingConfig::from_config(&config)
        .init()
        .context("Failed to initialize logging")?;

    let secrets = EnvironmentSecretsManager::new();

    match args.command.unwrap_or(Command::Run) {
        Command::Run => {
            let collector = bootstrap(&config, &secrets)?;
            if let Err(e) = collector.run().await {
                error!(error = %e, "Strava collection failed");
                return Err(e.into());
            }
        }
        Command::AuthUrl { state } => {
            let credentials = load_credentials(&config, &secrets)?;
            let client = OAuth2Client::new(oauth2_config(&config, credentials));
            println!("Visit this URL to authorize the application:");
            println!("{}", client.authorization_url(&state)?);
            println!("Then store the `code` parameter of the redirect as STRAVA_AUTH_CODE.");
        }
    }

    Ok(())
}

/// Create the scheduled collector with the Strava datasource.
fn bootstrap(config: &Config, secrets: &EnvironmentSecretsManager) -> Result<ScheduledCollector> {
    let datasource =
        StravaCollector::new(config, secrets).context("Failed to create Strava datasource")?;
    let queue = config.get_or(config_keys::HDB_QUEUE, defaults::HDB_QUEUE);

    Ok(ScheduledCollector::new(
        queue,
        Box::new(datasource),
        Box::new(StdoutPublisher),
    ))
}
