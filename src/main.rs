use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use pokedex_api::mcp_interface::handle_search_command;
use pokedex_api::{
    create_router, init_tracing, AppState, FacetSelection, Pokedex, PokedexConfig, ServerError,
};

#[derive(Parser)]
#[command(name = "pokedex-api", about = "Query service for a static Pokemon dataset")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve(ServeArgs),
    /// Search the dataset from the terminal
    Search(SearchArgs),
}

#[derive(Args)]
struct DatasetArgs {
    /// RON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON dataset to use instead of the embedded one
    #[arg(long)]
    data: Option<PathBuf>,
}

impl DatasetArgs {
    fn load_config(&self) -> Result<PokedexConfig, ServerError> {
        let mut config = PokedexConfig::load_or_default(self.config.as_deref())?;
        if let Some(data) = &self.data {
            config.dataset = Some(data.clone());
        }
        Ok(config)
    }
}

#[derive(Args)]
struct ServeArgs {
    #[command(flatten)]
    dataset: DatasetArgs,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args)]
struct SearchArgs {
    #[command(flatten)]
    dataset: DatasetArgs,
    /// Name to search for; omit to list everything
    #[arg(default_value = "")]
    query: String,
    /// Required type (repeatable)
    #[arg(long = "type")]
    types: Vec<String>,
    /// Required weakness (repeatable)
    #[arg(long = "weakness")]
    weaknesses: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    init_tracing();

    match Cli::parse().command {
        Command::Serve(args) => serve(args).await,
        Command::Search(args) => search(args),
    }
}

async fn serve(args: ServeArgs) -> Result<(), ServerError> {
    let mut config = args.dataset.load_config()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let pokedex = Pokedex::load(&config.dataset_source())?;
    let app = create_router(AppState::new(Arc::new(pokedex), config.default_limit));

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn search(args: SearchArgs) -> Result<(), ServerError> {
    let config = args.dataset.load_config()?;
    let pokedex = Pokedex::load(&config.dataset_source())?;

    let selection = FacetSelection::new(args.types, args.weaknesses);
    println!("{}", handle_search_command(&pokedex, &args.query, &selection));
    Ok(())
}
