use crate::prelude::{println, *};
use booklist_core::books::{format_price, BookRecord};
use booklist_core::search::{status_message, SearchFailure, SearchOutcome};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::client::BooksClient;
use crate::config::ClientConfig;
use crate::connectivity::{check_connectivity, PROBE_TIMEOUT};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Numbered, colored list
    #[default]
    Text,
    /// One row per book
    Table,
    /// Tagged search outcome as JSON
    Json,
}

#[derive(Debug, clap::Args, Clone)]
pub struct SearchOptions {
    /// Search terms, joined with spaces
    #[arg(value_name = "QUERY", required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub async fn run(options: SearchOptions, global: crate::Global) -> Result<()> {
    let query = options.query.join(" ");
    let config = ClientConfig::from(&global);

    if global.verbose {
        println!("Books API: {}", config.api_base);
        println!();
    }

    let client = BooksClient::new(config)?;
    let outcome = search_data(&client, &query, options.format == OutputFormat::Text).await;

    match options.format {
        OutputFormat::Json => println!("{}", format_outcome_json(&outcome)?),
        OutputFormat::Table => print!("{}", format_outcome_table(&outcome)),
        OutputFormat::Text => print!("{}", format_books_text(&query, &outcome)),
    }

    match outcome {
        SearchOutcome::Failure(failure) => Err(Error::Search(failure).into()),
        SearchOutcome::Success(_) => Ok(()),
    }
}

/// Probe connectivity, then run one search
///
/// When the API host can't be reached the search is not attempted and the
/// outcome is [`SearchFailure::NoConnectivity`].
pub async fn search_data(client: &BooksClient, query: &str, show_spinner: bool) -> SearchOutcome {
    if let Err(failure) = check_connectivity(&client.config().api_base, PROBE_TIMEOUT).await {
        return SearchOutcome::Failure(failure);
    }

    let spinner = show_spinner.then(|| new_spinner(query));
    let outcome = client.search(query).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    outcome
}

fn new_spinner(query: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(f!("Searching for {query}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn format_outcome_json(outcome: &SearchOutcome) -> Result<String> {
    serde_json::to_string_pretty(outcome).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

/// One list row, shared with the interactive browser
pub fn format_book_entry(position: usize, book: &BookRecord) -> String {
    let mut result = String::new();

    result.push_str(&f!(
        "\n{} {}\n",
        f!("[{position}]").yellow().bold(),
        book.title().white().bold()
    ));
    result.push_str(&f!(
        "    {}: {} | {}: {} {} | {}: {}\n",
        "By".green(),
        book.author().bright_white(),
        "Price".green(),
        format_price(book.price()).bright_yellow(),
        book.currency().bright_yellow(),
        "Language".green(),
        book.language().bright_magenta()
    ));
    result.push_str(&f!(
        "    {}: {}\n",
        "Buy".green(),
        book.purchase_url().cyan().underline()
    ));

    result
}

fn format_books_text(query: &str, outcome: &SearchOutcome) -> String {
    let mut result = String::new();

    result.push_str(&f!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&f!(
        "{}\n",
        f!("BOOKS MATCHING \"{query}\" ({} results)", outcome.books().len())
            .bright_cyan()
            .bold()
    ));
    result.push_str(&f!("{}\n", "=".repeat(80).bright_cyan()));

    if let Some(message) = status_message(outcome) {
        result.push_str(&f!("\n{}\n", message.yellow()));
        if let Some(failure) = outcome.failure() {
            result.push_str(&f!("{}\n", failure.to_string().bright_black()));
        }
    } else {
        for (idx, book) in outcome.books().iter().enumerate() {
            result.push_str(&format_book_entry(idx + 1, book));
        }

        result.push_str(&f!(
            "\n{}:\n  {}\n",
            "To open a purchase page".bright_white().bold(),
            "booklist open <url>".cyan()
        ));
    }

    result.push('\n');
    result
}

fn format_outcome_table(outcome: &SearchOutcome) -> String {
    let mut result = format_books_table(outcome.books());

    if let Some(message) = status_message(outcome) {
        result.push_str(&f!("{}\n", message.yellow()));
        if let Some(failure) = outcome.failure() {
            result.push_str(&f!("{}\n", failure.to_string().bright_black()));
        }
    }

    result
}

fn format_books_table(books: &[BookRecord]) -> String {
    let mut table = new_table();
    table.set_titles(prettytable::row![
        "#", "Title", "Author", "Price", "Currency", "Language", "Buy link"
    ]);

    for (idx, book) in books.iter().enumerate() {
        table.add_row(prettytable::row![
            idx + 1,
            book.title(),
            book.author(),
            format_price(book.price()),
            book.currency(),
            book.language(),
            book.purchase_url()
        ]);
    }

    table.to_string()
}
