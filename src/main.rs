//! Astronomy feed CLI
//!
//! Shows the astronomy picture of the day and today's near-earth objects.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use skywatch::{
    menu, ClientConfig, ConsolePresenter, Credential, Pipeline, PipelineBuilder, Presenter,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "skywatch")]
#[command(about = "Astronomy picture of the day and near-earth object feeds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory the picture of the day is saved into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Request timeout in seconds (transport default if unset)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Override the picture feed endpoint
    #[arg(long, env = "SKYWATCH_APOD_ENDPOINT", hide = true)]
    apod_endpoint: Option<String>,

    /// Override the near-earth object feed endpoint
    #[arg(long, env = "SKYWATCH_NEO_ENDPOINT", hide = true)]
    neo_endpoint: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the astronomy picture of the day and save its image
    Apod,

    /// List near-earth objects making a close approach on a given day
    Neo {
        /// Day to query (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Interactive menu (the default when no command is given)
    Menu,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so presenter output on stdout stays clean
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let credential = match Credential::from_env() {
        Ok(credential) => credential,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    let mut client_config = ClientConfig::new();
    if let Some(secs) = cli.timeout {
        client_config = client_config.with_timeout(Duration::from_secs(secs));
    }

    let mut builder = PipelineBuilder::new()
        .credential(credential)
        .client_config(client_config)
        .output_dir(&cli.output_dir);
    if let Some(endpoint) = cli.apod_endpoint {
        builder = builder.picture_endpoint(endpoint);
    }
    if let Some(endpoint) = cli.neo_endpoint {
        builder = builder.neo_endpoint(endpoint);
    }
    let pipeline = builder.build()?;

    tracing::debug!("Saving images to {}", cli.output_dir.display());

    let mut presenter = ConsolePresenter::stdout();

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Apod => {
            let fetch = pipeline.picture().await;
            presenter.render_picture(&fetch)?;
        }

        Commands::Neo { date } => {
            show_asteroids(&pipeline, &mut presenter, date).await?;
        }

        Commands::Menu => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            menu::run_menu(&pipeline, stdin, &mut presenter, || Local::now().date_naive()).await?;
        }
    }

    Ok(())
}

async fn show_asteroids<P: Presenter>(
    pipeline: &Pipeline<skywatch::HttpClient>,
    presenter: &mut P,
    date: Option<NaiveDate>,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = match date {
        Some(date) => pipeline.asteroid_table(date).await,
        None => pipeline.todays_asteroid_table().await,
    };
    presenter.render_asteroids(&outcome)?;
    Ok(())
}
