use clap::{Parser, Subcommand, ValueEnum};
use movielite::cli::{self as prog_cli, OutputMode};
use movielite::config::{AppConfig, load_config};
use movielite::movies::{
    CountMoviesParams, DEFAULT_FIND_LIMIT, DEFAULT_TOP_LIMIT, FindMoviesParams,
    MovieDetailsParams, MovieService, TopMoviesParams,
};
use movielite::server::ToolServer;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Human,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "movielite", version, about = "Movie database query tools", long_about = None)]
struct Cli {
    #[arg(long, global = true, help = "Path to a config file (TOML)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Connection string; overrides MONGO_URI and config files")]
    uri: Option<String>,
    #[arg(long, global = true, help = "Database name (default sample_mflix)")]
    database: Option<String>,
    #[arg(long, global = true, help = "Collection name (default movies)")]
    collection: Option<String>,
    #[arg(long, global = true, value_enum, default_value_t = Format::Human, help = "Output format for one-shot commands")]
    format: Format,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Serve the query tools over stdio (JSON-RPC 2.0, one message per line)")]
    Serve,
    #[command(about = "Find movies by title, genre, actor, year or minimum rating")]
    Find {
        #[arg(long, help = "Case-insensitive title substring")]
        title: Option<String>,
        #[arg(long, help = "Exact genre, e.g. Comedy")]
        genre: Option<String>,
        #[arg(long, help = "Case-insensitive cast member substring")]
        actor: Option<String>,
        #[arg(long, help = "Release year")]
        year: Option<i32>,
        #[arg(long, help = "Minimum IMDb rating")]
        min_rating: Option<f64>,
        #[arg(long, default_value_t = DEFAULT_FIND_LIMIT, allow_negative_numbers = true, help = "Maximum results; 0 means no limit")]
        limit: i64,
    },
    #[command(about = "Count movies matching the criteria")]
    Count {
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        min_rating: Option<f64>,
    },
    #[command(about = "Best rated movies, optionally per year or genre")]
    Top {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long, default_value_t = DEFAULT_TOP_LIMIT, allow_negative_numbers = true)]
        limit: i64,
    },
    #[command(about = "Full record of a movie by exact title")]
    Details {
        #[arg(help = "Exact, case-sensitive title")]
        title: String,
    },
    #[command(about = "Print the effective configuration with secrets masked")]
    Config,
}

fn fail(msg: &str) -> ! {
    log::error!("{msg}");
    eprintln!("error: {msg}");
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    let mut cfg = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => fail(&e.to_string()),
    };
    cfg.override_with(AppConfig {
        uri: cli.uri.clone(),
        database: cli.database.clone(),
        collection: cli.collection.clone(),
        ..AppConfig::default()
    });
    if let Err(e) = movielite::logger::configure_logging(
        cfg.log_dir.as_deref(),
        cfg.log_level.as_deref(),
        movielite::logger::retention_from_env(),
        movielite::logger::dev6_from_env(),
    ) {
        eprintln!("warning: logging disabled: {e}");
    }

    let cmd = match cli.command {
        Commands::Config => {
            match toml::to_string_pretty(&cfg.redacted()) {
                Ok(s) => print!("{s}"),
                Err(e) => fail(&e.to_string()),
            }
            return;
        }
        Commands::Serve => None,
        Commands::Find { title, genre, actor, year, min_rating, limit } => Some(
            prog_cli::Command::Find(FindMoviesParams { title, genre, actor, year, min_rating, limit }),
        ),
        Commands::Count { genre, year, min_rating } => {
            Some(prog_cli::Command::Count(CountMoviesParams { genre, year, min_rating }))
        }
        Commands::Top { year, genre, limit } => {
            Some(prog_cli::Command::Top(TopMoviesParams { year, genre, limit }))
        }
        Commands::Details { title } => {
            Some(prog_cli::Command::Details(MovieDetailsParams { title }))
        }
    };

    let store_cfg = match cfg.store_config() {
        Ok(s) => s,
        Err(e) => fail(&e.to_string()),
    };
    log::info!(
        "connecting to {} ({}.{})",
        movielite::config::redact_uri(&store_cfg.uri),
        store_cfg.database,
        store_cfg.collection
    );
    let store = match movielite::store::connect(&store_cfg) {
        Ok(s) => s,
        Err(e) => fail(&e.to_string()),
    };
    let service = MovieService::new(store);

    let r: Result<(), Box<dyn std::error::Error>> = match cmd {
        None => {
            let server = ToolServer::new(service);
            let stdin = std::io::stdin();
            server.serve(stdin.lock(), std::io::stdout()).map_err(Into::into)
        }
        Some(cmd) => {
            let mode = match cli.format {
                Format::Human => OutputMode::Human,
                Format::Json => OutputMode::Json,
            };
            let stdout = std::io::stdout();
            prog_cli::run_with_format(&service, cmd, mode, &mut stdout.lock())
        }
    };
    if let Err(e) = r {
        fail(&e.to_string());
    }
}
