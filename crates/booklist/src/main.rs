use crate::prelude::*;
use clap::Parser;

mod browse;
mod client;
mod config;
mod connectivity;
mod error;
mod open;
mod prelude;
mod search;
mod session;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Search paid e-books in the public books API and open their purchase pages"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Volumes endpoint of the books API
    #[clap(
        long,
        env = "BOOKLIST_API_BASE",
        global = true,
        default_value = booklist_core::query::DEFAULT_API_BASE
    )]
    api_base: String,

    /// Maximum number of results per search (1-40)
    #[clap(
        long,
        env = "BOOKLIST_MAX_RESULTS",
        global = true,
        default_value_t = booklist_core::query::DEFAULT_MAX_RESULTS,
        value_parser = clap::value_parser!(u32).range(1..=booklist_core::query::MAX_RESULTS_LIMIT as i64)
    )]
    max_results: u32,

    /// Seconds allowed to establish the connection
    #[clap(long, env = "BOOKLIST_CONNECT_TIMEOUT", global = true, default_value = "20")]
    connect_timeout: u64,

    /// Seconds allowed between reads of the response
    #[clap(long, env = "BOOKLIST_READ_TIMEOUT", global = true, default_value = "10")]
    read_timeout: u64,

    /// Fail the whole search when any result is malformed
    #[clap(long, env = "BOOKLIST_STRICT", global = true, default_value = "false")]
    strict: bool,

    /// Whether to display additional information.
    #[clap(long, env = "BOOKLIST_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Search paid e-books and list them
    Search(crate::search::SearchOptions),

    /// Open a purchase page in the default browser
    Open(crate::open::OpenOptions),

    /// Interactive search: type queries, open results by number
    Browse(crate::browse::BrowseOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Search(options) => crate::search::run(options, app.global).await,
        SubCommands::Open(options) => crate::open::run(options, app.global).await,
        SubCommands::Browse(options) => crate::browse::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
