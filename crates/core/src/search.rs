//! Tagged search outcome.
//!
//! A search either produced a (possibly empty) [`ResultSet`] or failed for a
//! reason the caller can tell apart from "nothing matched".

use serde::{Deserialize, Serialize};

use crate::books::{extract_books, BatchPolicy, BookRecord, ResultSet, SkippedItem};

/// The only status code that leads to decoding
pub const SUCCESS_STATUS: u16 = 200;

pub const NO_BOOKS_FOUND: &str = "No Books Found";
pub const NO_INTERNET_CONNECTION: &str = "No Internet Connection";

/// Why a search produced no result set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SearchFailure {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No internet connection")]
    NoConnectivity,
}

/// Result of one search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum SearchOutcome {
    Success(ResultSet),
    Failure(SearchFailure),
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Success(_))
    }

    /// Books to display, empty for failures
    pub fn books(&self) -> &[BookRecord] {
        match self {
            SearchOutcome::Success(books) => books,
            SearchOutcome::Failure(_) => &[],
        }
    }

    pub fn failure(&self) -> Option<&SearchFailure> {
        match self {
            SearchOutcome::Success(_) => None,
            SearchOutcome::Failure(failure) => Some(failure),
        }
    }

    /// Collapse into a bare result set, mapping every failure to an empty list
    pub fn into_result_set(self) -> ResultSet {
        match self {
            SearchOutcome::Success(books) => books,
            SearchOutcome::Failure(_) => Vec::new(),
        }
    }
}

impl From<Result<ResultSet, SearchFailure>> for SearchOutcome {
    fn from(result: Result<ResultSet, SearchFailure>) -> Self {
        match result {
            Ok(books) => SearchOutcome::Success(books),
            Err(failure) => SearchOutcome::Failure(failure),
        }
    }
}

/// Turn an HTTP status and body into a search outcome
///
/// Items dropped under [`BatchPolicy::SkipInvalid`] are returned next to the
/// outcome so the caller can report them.
pub fn classify_response(
    status: u16,
    body: &str,
    policy: BatchPolicy,
) -> (SearchOutcome, Vec<SkippedItem>) {
    if status != SUCCESS_STATUS {
        return (
            SearchOutcome::Failure(SearchFailure::HttpStatus(status)),
            Vec::new(),
        );
    }

    match extract_books(body, policy) {
        Ok(extraction) => (SearchOutcome::Success(extraction.books), extraction.skipped),
        Err(e) => (
            SearchOutcome::Failure(SearchFailure::MalformedResponse(e.to_string())),
            Vec::new(),
        ),
    }
}

/// Message to show in place of the list, if the list can't be shown
pub fn status_message(outcome: &SearchOutcome) -> Option<&'static str> {
    match outcome {
        SearchOutcome::Success(books) if books.is_empty() => Some(NO_BOOKS_FOUND),
        SearchOutcome::Success(_) => None,
        SearchOutcome::Failure(SearchFailure::NoConnectivity) => Some(NO_INTERNET_CONNECTION),
        SearchOutcome::Failure(SearchFailure::Network(_)) => {
            Some("Could not reach the books service")
        }
        SearchOutcome::Failure(SearchFailure::HttpStatus(_)) => {
            Some("The books service returned an error")
        }
        SearchOutcome::Failure(SearchFailure::MalformedResponse(_)) => {
            Some("The books service sent an unreadable response")
        }
    }
}
