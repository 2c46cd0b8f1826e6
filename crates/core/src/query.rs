//! Search URL construction for the volumes endpoint.

/// Default volumes endpoint of the public books API
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/books/v1/volumes";

/// Number of results requested when the caller doesn't configure one
pub const DEFAULT_MAX_RESULTS: u32 = 40;

/// Largest `maxResults` value the API accepts
pub const MAX_RESULTS_LIMIT: u32 = 40;

/// Restricts results to e-books that can be bought
pub const PAID_EBOOKS_FILTER: &str = "paid-ebooks";

/// Encode a raw user query for the `q` parameter
///
/// Only literal spaces are rewritten (to `+`). Every other character is
/// passed through untouched.
pub fn encode_query(raw: &str) -> String {
    raw.replace(' ', "+")
}

/// Build the full search URL for a raw user query
///
/// ```rust
/// use booklist_core::query::build_search_url;
///
/// let url = build_search_url("https://example.com/books/v1/volumes", "dune", 10);
/// assert_eq!(
///     url,
///     "https://example.com/books/v1/volumes?q=dune&filter=paid-ebooks&maxResults=10"
/// );
/// ```
pub fn build_search_url(base_url: &str, raw_query: &str, max_results: u32) -> String {
    format!(
        "{}?q={}&filter={PAID_EBOOKS_FILTER}&maxResults={max_results}",
        base_url.trim_end_matches('?'),
        encode_query(raw_query)
    )
}
