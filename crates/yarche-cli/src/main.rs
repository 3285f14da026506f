mod collect;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use yarche_scraper::HttpPageFetcher;

#[derive(Debug, Parser)]
#[command(name = "yarche-cli")]
#[command(about = "Catalog scraper for the Yarche online store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Export the category tree of every configured store
    Categories,
    /// Scrape products and export, archive, and mail them per store
    Products {
        /// Scrape only this store address instead of every configured one
        #[arg(long)]
        tt_id: Option<String>,

        /// Keep the archive on disk instead of mailing it
        #[arg(long)]
        no_email: bool,
    },
}

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = yarche_core::load_app_config()?;
    init_tracing(&config.log_level);
    tracing::debug!(?config, "configuration loaded");

    let mut fetcher = HttpPageFetcher::from_config(&config)?;

    let result = match cli.command {
        Commands::Categories => collect::run_categories(&mut fetcher, &config).await.map(|_| ()),
        Commands::Products { tt_id, no_email } => {
            let selection = match &config.categories_path {
                Some(path) => yarche_core::load_category_selection(path)?,
                None => yarche_core::CategorySelection::default(),
            };
            let options = collect::ProductRunOptions {
                tt_filter: tt_id,
                send_email: !no_email,
            };
            collect::run_products(&mut fetcher, &config, &selection, &options)
                .await
                .map(|exports| {
                    for export in &exports {
                        tracing::info!(
                            csv = %export.csv.display(),
                            archive = ?export.archive,
                            products = export.products,
                            "store exported"
                        );
                    }
                })
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "run failed");
    }
    result
}
