mod render;

use clap::{Args, Parser, Subcommand};
use eatnow_places::{strategies_for, Coordinate, SearchRequest, StrategyMode, TieredSearch};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "eatnow")]
#[command(about = "Find open places to eat near a coordinate")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a tiered nearby search against the places API.
    Search(SearchArgs),
    /// Print the strategies tried at each radius, in priority order.
    Strategies {
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[derive(Debug, Args)]
struct SearchArgs {
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,
    /// Radius in meters. Pass once to pin the radius or several times
    /// (ascending) to auto-expand. Defaults to `EATNOW_SEARCH_RADII_M`.
    #[arg(long = "radius", value_name = "METERS")]
    radii: Vec<u32>,
    /// Maximum venues to return. Defaults to `EATNOW_CARDS_PER_REPLY`.
    #[arg(long)]
    limit: Option<usize>,
    /// Free-text food preference, e.g. "ramen".
    #[arg(long)]
    keyword: Option<String>,
    /// Query all strategies of a radius concurrently.
    #[arg(long)]
    parallel: bool,
    /// Print the outcome as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Strategies { keyword } => {
            init_tracing("warn")?;
            for (i, strategy) in strategies_for(keyword.as_deref()).iter().enumerate() {
                println!("{}. {strategy}", i + 1);
            }
        }
        Commands::Config => {
            let config = eatnow_core::load_app_config_from_env()?;
            init_tracing(&config.log_level)?;
            println!("{config:#?}");
        }
        Commands::Search(args) => {
            let config = eatnow_core::load_app_config_from_env()?;
            init_tracing(&config.log_level)?;
            run_search(&config, args).await?;
        }
    }

    Ok(())
}

/// Logs go to stderr so `--json` output on stdout stays machine-readable.
fn init_tracing(default_directive: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn run_search(config: &eatnow_core::AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        (-90.0..=90.0).contains(&args.lat) && (-180.0..=180.0).contains(&args.lng),
        "coordinate out of range: {},{}",
        args.lat,
        args.lng
    );

    let mut search = TieredSearch::from_app_config(config)?;
    if args.parallel {
        search = search.with_mode(StrategyMode::Parallel);
    }

    let radii = if args.radii.is_empty() {
        config.search_radii_m.clone()
    } else {
        args.radii
    };
    let request = SearchRequest {
        origin: Coordinate::new(args.lat, args.lng),
        radii_m: &radii,
        limit: args.limit.unwrap_or(config.cards_per_reply),
        keyword: args.keyword.as_deref(),
    };

    let outcome = search.search_until(&request, ctrl_c()).await?;

    if args.json {
        println!("{}", render::outcome_json(&outcome)?);
    } else {
        print!("{}", render::outcome_table(&outcome));
    }
    Ok(())
}

async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; never cancel.
        std::future::pending::<()>().await;
    }
    tracing::info!("received ctrl-c, cancelling search");
}
