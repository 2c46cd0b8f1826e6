//! Core library for booklist
//!
//! This crate implements the **Functional Core** of the booklist application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The booklist project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`booklist_core`** (this crate): Pure transformation functions with zero I/O
//! - **`booklist`**: HTTP, terminal and browser I/O plus orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no logging
//! - **Testable**: Can be tested with fixture JSON, no HTTP server required
//!
//! # Module Organization
//!
//! - [`query`]: Builds the volumes search URL from a raw user query
//! - [`books`]: Decodes the volumes JSON payload into [`books::BookRecord`] values
//! - [`search`]: Tagged search outcome and failure taxonomy
//! - [`generation`]: Ticket counter used to discard stale search completions
//!
//! # Example Usage
//!
//! ```rust
//! use booklist_core::books::BatchPolicy;
//! use booklist_core::search::{classify_response, SearchOutcome};
//!
//! let body = r#"{"totalItems": 0}"#;
//! let (outcome, skipped) = classify_response(200, body, BatchPolicy::SkipInvalid);
//!
//! assert_eq!(outcome, SearchOutcome::Success(vec![]));
//! assert!(skipped.is_empty());
//! ```

pub mod books;
pub mod generation;
pub mod query;
pub mod search;
