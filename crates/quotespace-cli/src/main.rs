use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use quotespace_cache::{KeyValueStore, MemoryStore, SqliteStore};
use quotespace_core::{
    Config, DailyQuote, DailyQuoteService, FallbackQuoteFetcher, Quote, SystemClock,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "quotespace")]
#[command(version, about = "A quote of the day per category, with favorites", long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "QUOTESPACE_CONFIG")]
    config: Option<PathBuf>,

    /// Key-value store file (overrides storage.db_path)
    #[arg(long, global = true, env = "QUOTESPACE_DB")]
    db: Option<PathBuf>,

    /// Keep everything in memory; nothing is saved
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show today's quote (fetched at most once a day per category)
    Today {
        /// Category to use instead of the selected one
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Fetch a new quote and make it today's quote
    Refresh {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show the selected category, or select a new one
    Category {
        name: Option<String>,
    },
    /// List suggested categories
    Categories,
    /// Manage favorites
    Fav {
        #[command(subcommand)]
        action: FavCommand,
    },
}

#[derive(clap::Subcommand)]
enum FavCommand {
    /// Favorite today's quote, or unfavorite it if it already is one
    Toggle {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List favorites, newest first
    List {
        /// Only show favorites whose text or author contains this
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Remove a favorite by id
    Remove { id: String },
    /// Remove all favorites
    Clear,
    /// Print a favorite ready to paste somewhere
    Share { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so quotes on stdout can be piped
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "quotespace_cli=info,quotespace_core=info,quotespace_api=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env();
            config
        }
        None => Config::load()?,
    };

    let store: Arc<dyn KeyValueStore> = if cli.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        let db_path = match cli.db {
            Some(path) => path,
            None => config.db_path()?,
        };
        tracing::debug!("Using store at {}", db_path.display());
        Arc::new(SqliteStore::new(&db_path)?)
    };

    let fetcher = Arc::new(FallbackQuoteFetcher::from_config(&config)?);
    let service = DailyQuoteService::new(
        store,
        Arc::new(SystemClock),
        fetcher,
        config.quotes.default_category.clone(),
    );

    match cli.command.unwrap_or(Commands::Today { category: None }) {
        Commands::Today { category } => {
            let category = resolve_category(&service, category).await;
            let daily = service.load_daily(Some(&category)).await?;
            print_daily(&daily);
        }
        Commands::Refresh { category } => {
            let category = resolve_category(&service, category).await;
            tracing::info!("Refreshing quote for {}", category);
            let daily = service.refresh(Some(&category)).await?;
            print_daily(&daily);
        }
        Commands::Category { name: Some(name) } => {
            service.select_category(&name).await?;
            println!("Selected category: {}", name);
        }
        Commands::Category { name: None } => {
            println!("{}", service.current_category().await);
        }
        Commands::Categories => {
            let current = service.current_category().await;
            for category in &config.quotes.categories {
                let marker = if category.eq_ignore_ascii_case(&current) { "*" } else { " " };
                println!("{} {}", marker, category);
            }
        }
        Commands::Fav { action } => run_fav(&service, action).await?,
    }

    Ok(())
}

async fn run_fav(service: &DailyQuoteService, action: FavCommand) -> anyhow::Result<()> {
    let favorites = service.favorites();

    match action {
        FavCommand::Toggle { category } => {
            let category = resolve_category(service, category).await;
            let daily = service.load_daily(Some(&category)).await?;
            if service.toggle_favorite(&daily.quote).await? {
                println!("Added to favorites: {}", daily.quote.id);
            } else {
                println!("Removed from favorites: {}", daily.quote.id);
            }
        }
        FavCommand::List { search } => {
            let list = match search.as_deref() {
                Some(query) => favorites.search_favorites(query).await,
                None => favorites.get_favorites().await,
            };

            if list.is_empty() {
                println!("No favorites yet.");
            }
            for quote in &list {
                print_quote(quote);
                println!();
            }
        }
        FavCommand::Remove { id } => {
            favorites.remove_favorite(&id).await?;
            println!("Removed {}", id);
        }
        FavCommand::Clear => {
            favorites.clear_favorites().await?;
            println!("Cleared all favorites.");
        }
        FavCommand::Share { id } => {
            let quote = favorites
                .find_favorite(&id)
                .await
                .ok_or(quotespace_core::Error::NotFound(id))?;
            println!("{}", quote.share_text());
        }
    }

    Ok(())
}

async fn resolve_category(service: &DailyQuoteService, category: Option<String>) -> String {
    match category {
        Some(category) => category,
        None => service.current_category().await,
    }
}

fn print_daily(daily: &DailyQuote) {
    print_quote(&daily.quote);

    let mut flags = Vec::new();
    if daily.is_favorite {
        flags.push("★ favorite");
    }
    if daily.from_cache {
        flags.push("cached today");
    }
    if !flags.is_empty() {
        println!("  ({})", flags.join(", "));
    }
}

fn print_quote(quote: &Quote) {
    println!("\"{}\"", quote.text);
    println!("  — {}", quote.author);
    if let Some(category) = &quote.category {
        println!("  [{}]", category);
    }
    println!("  id: {}", quote.id);
}
