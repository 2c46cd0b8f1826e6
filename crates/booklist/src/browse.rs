use crate::prelude::{eprintln, println, *};
use booklist_core::books::ResultSet;
use booklist_core::search::{status_message, SearchOutcome};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::client::BooksClient;
use crate::config::ClientConfig;
use crate::connectivity::{check_connectivity, PROBE_TIMEOUT};
use crate::open::open_purchase_page;
use crate::search::format_book_entry;
use crate::session::{Completion, SearchSession};

#[derive(Debug, clap::Args, Clone)]
pub struct BrowseOptions {
    /// Search to run before reading input
    #[arg(value_name = "QUERY")]
    pub query: Vec<String>,
}

/// A line typed at the browse prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Open(usize),
    Quit,
    Help,
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> BrowseCommand {
    let line = line.trim();

    if line.is_empty() {
        return BrowseCommand::Empty;
    }

    let Some(command) = line.strip_prefix(':') else {
        return BrowseCommand::Search(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("q" | "quit"), None, None) => BrowseCommand::Quit,
        (Some("h" | "help"), None, None) => BrowseCommand::Help,
        (Some("o" | "open"), Some(position), None) => match position.parse::<usize>() {
            Ok(position) if position > 0 => BrowseCommand::Open(position),
            _ => BrowseCommand::Invalid(f!("not a result number: {position}")),
        },
        _ => BrowseCommand::Invalid(f!("unknown command: {line}")),
    }
}

/// Book list owned by the prompt, replaced wholesale on every accepted search
#[derive(Debug, Default)]
pub struct BrowseState {
    results: ResultSet,
}

impl BrowseState {
    pub fn replace(&mut self, outcome: &SearchOutcome) {
        self.results = outcome.books().to_vec();
    }

    pub fn purchase_url(&self, position: usize) -> Result<&str, Error> {
        position
            .checked_sub(1)
            .and_then(|idx| self.results.get(idx))
            .map(|book| book.purchase_url())
            .ok_or(Error::NoSuchResult(position))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }
}

pub async fn run(options: BrowseOptions, global: crate::Global) -> Result<()> {
    let config = ClientConfig::from(&global);
    let client = BooksClient::new(config)?;
    let (mut session, completions) = SearchSession::new(client.clone());
    let mut state = BrowseState::default();

    print_help();

    if !options.query.is_empty() {
        start_search(&client, &mut session, options.query.join(" ")).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                match parse_command(&line) {
                    BrowseCommand::Search(query) => start_search(&client, &mut session, query).await,
                    BrowseCommand::Open(position) => {
                        match state
                            .purchase_url(position)
                            .and_then(open_purchase_page)
                        {
                            Ok(()) => println!("{}", "Opened in your browser".green()),
                            Err(e) => eprintln!("{}", e.to_string().red()),
                        }
                    }
                    BrowseCommand::Quit => break,
                    BrowseCommand::Help => print_help(),
                    BrowseCommand::Empty => {}
                    BrowseCommand::Invalid(reason) => eprintln!("{}", reason.red()),
                }
            }
            Ok(completion) = completions.recv() => {
                if let Some(completion) = session.accept(completion) {
                    show_completion(&mut state, &completion);
                }
            }
        }
    }

    session.cancel();
    Ok(())
}

async fn start_search(client: &BooksClient, session: &mut SearchSession, query: String) {
    if let Err(failure) = check_connectivity(&client.config().api_base, PROBE_TIMEOUT).await {
        session.cancel();
        let outcome = SearchOutcome::Failure(failure);
        if let Some(message) = status_message(&outcome) {
            println!("{}", message.yellow());
        }
        return;
    }

    if session.is_searching() {
        println!("{}", "Replacing the pending search".bright_black());
    }

    let ticket = session.submit(query.clone());
    log::debug!("Search #{} submitted", ticket.value());
    println!("{}", f!("Searching for {query}...").bright_black());
}

fn show_completion(state: &mut BrowseState, completion: &Completion) {
    state.replace(&completion.outcome);

    println!(
        "\n{}",
        f!("Results for \"{}\"", completion.query).bright_cyan().bold()
    );

    match status_message(&completion.outcome) {
        Some(message) => println!("{}", message.yellow()),
        None => {
            for (idx, book) in completion.outcome.books().iter().enumerate() {
                print!("{}", format_book_entry(idx + 1, book));
            }
            println!(
                "\n{}",
                f!("Type :open <1-{}> to buy, or a new search", state.len()).bright_black()
            );
        }
    }
}

fn print_help() {
    println!("{}", "Type a search and press enter.".bright_white());
    println!("  {}  open result N in your browser", ":open N".cyan());
    println!("  {}     show this help", ":help".cyan());
    println!("  {}     exit", ":quit".cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use booklist_core::books::BookRecord;
    use booklist_core::search::SearchFailure;

    fn outcome_with(titles: &[&str]) -> SearchOutcome {
        SearchOutcome::Success(
            titles
                .iter()
                .enumerate()
                .map(|(idx, title)| {
                    BookRecord::new(
                        *title,
                        "Author",
                        1.0,
                        "USD",
                        "en",
                        f!("https://example.com/{idx}"),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_parse_command_search() {
        assert_eq!(
            parse_command("  the great gatsby \n"),
            BrowseCommand::Search("the great gatsby".to_string())
        );
        assert_eq!(
            parse_command("1984"),
            BrowseCommand::Search("1984".to_string())
        );
    }

    #[test]
    fn test_parse_command_open() {
        assert_eq!(parse_command(":open 3"), BrowseCommand::Open(3));
        assert_eq!(parse_command(":o 12"), BrowseCommand::Open(12));
    }

    #[test]
    fn test_parse_command_open_invalid_position() {
        assert!(matches!(parse_command(":open 0"), BrowseCommand::Invalid(_)));
        assert!(matches!(parse_command(":open x"), BrowseCommand::Invalid(_)));
        assert!(matches!(parse_command(":open"), BrowseCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_command_control() {
        assert_eq!(parse_command(":quit"), BrowseCommand::Quit);
        assert_eq!(parse_command(":q"), BrowseCommand::Quit);
        assert_eq!(parse_command(":help"), BrowseCommand::Help);
        assert_eq!(parse_command("   "), BrowseCommand::Empty);
        assert!(matches!(parse_command(":frobnicate"), BrowseCommand::Invalid(_)));
    }

    #[test]
    fn test_state_purchase_url_by_position() {
        let mut state = BrowseState::default();
        state.replace(&outcome_with(&["First", "Second"]));

        assert_eq!(state.purchase_url(1).unwrap(), "https://example.com/0");
        assert_eq!(state.purchase_url(2).unwrap(), "https://example.com/1");
        assert!(matches!(state.purchase_url(3), Err(Error::NoSuchResult(3))));
        assert!(matches!(state.purchase_url(0), Err(Error::NoSuchResult(0))));
    }

    #[test]
    fn test_state_replaced_wholesale() {
        let mut state = BrowseState::default();
        state.replace(&outcome_with(&["First", "Second", "Third"]));
        assert_eq!(state.len(), 3);

        state.replace(&outcome_with(&["Only"]));
        assert_eq!(state.len(), 1);

        state.replace(&SearchOutcome::Failure(SearchFailure::HttpStatus(500)));
        assert_eq!(state.len(), 0);
    }
}
