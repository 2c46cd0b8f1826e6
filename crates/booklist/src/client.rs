use crate::config::ClientConfig;
use crate::prelude::*;
use booklist_core::books::ResultSet;
use booklist_core::query::build_search_url;
use booklist_core::search::{classify_response, SearchFailure, SearchOutcome};

const USER_AGENT: &str = concat!("booklist/", env!("CARGO_PKG_VERSION"));

/// Books API client
///
/// Wraps a single `reqwest::Client` so every search reuses the same
/// connection pool and timeout settings. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct BooksClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl BooksClient {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn search_url(&self, query: &str) -> String {
        build_search_url(&self.config.api_base, query, self.config.max_results)
    }

    /// Run one search
    ///
    /// Never fails: transport, status and decoding problems come back as
    /// [`SearchOutcome::Failure`].
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let url = self.search_url(query);
        log::info!("GET {url}");

        let (status, body) = match self.fetch(&url).await {
            Ok(response) => response,
            Err(failure) => {
                log::error!("Problem retrieving the book JSON results: {failure}");
                return SearchOutcome::Failure(failure);
            }
        };

        let (outcome, skipped) = classify_response(status, &body, self.config.policy);

        for item in &skipped {
            log::warn!("Skipping item {}: {}", item.index, item.reason);
        }

        match &outcome {
            SearchOutcome::Success(books) => {
                log::info!("Decoded {} books for {query:?}", books.len());
            }
            SearchOutcome::Failure(SearchFailure::HttpStatus(code)) => {
                log::warn!("Error response code: {code}");
            }
            SearchOutcome::Failure(failure) => {
                log::error!("Problem parsing the book JSON results: {failure}");
            }
        }

        outcome
    }

    /// Run one search and keep only the books, failures become an empty list
    pub async fn search_result_set(&self, query: &str) -> ResultSet {
        self.search(query).await.into_result_set()
    }

    async fn fetch(&self, url: &str) -> Result<(u16, String), SearchFailure> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SearchFailure::Network(describe(&e)))?;

        let status = response.status().as_u16();
        if status != booklist_core::search::SUCCESS_STATUS {
            return Ok((status, String::new()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SearchFailure::Network(describe(&e)))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();
        log::debug!("Response body: {body}");

        Ok((status, body))
    }
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        f!("request timed out: {error}")
    } else if error.is_connect() {
        f!("connection failed: {error}")
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booklist_core::books::{BatchPolicy, MISSING_AUTHOR_INFO, UNKNOWN_AUTHOR};
    use mockito::{Matcher, Server};
    use std::time::Duration;

    const VOLUMES_PATH: &str = "/books/v1/volumes";

    const TWO_BOOKS: &str = r#"{
        "kind": "books#volumes",
        "totalItems": 2,
        "items": [
            {
                "volumeInfo": {
                    "title": "The Great Gatsby",
                    "authors": ["F. Scott Fitzgerald"],
                    "language": "en"
                },
                "saleInfo": {
                    "country": "US",
                    "retailPrice": {"amount": 2.99, "currencyCode": "USD"},
                    "buyLink": "https://play.google.com/store/books/details?id=gatsby"
                }
            },
            {
                "volumeInfo": {
                    "title": "Gatsby Annotated",
                    "authors": null,
                    "language": "en"
                },
                "saleInfo": {
                    "retailPrice": {"amount": 5, "currencyCode": "USD"},
                    "buyLink": "https://play.google.com/store/books/details?id=annotated"
                }
            }
        ]
    }"#;

    fn client_for(server: &Server, policy: BatchPolicy) -> BooksClient {
        BooksClient::new(ClientConfig {
            api_base: f!("{}{VOLUMES_PATH}", server.url()),
            connect_timeout: Duration::from_secs(2),
            read_timeout: Duration::from_secs(2),
            policy,
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_decodes_books() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", VOLUMES_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "the great gatsby".into()),
                Matcher::UrlEncoded("filter".into(), "paid-ebooks".into()),
                Matcher::UrlEncoded("maxResults".into(), "40".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TWO_BOOKS)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, BatchPolicy::Strict);
        let outcome = client.search("the great gatsby").await;

        mock.assert_async().await;
        let books = outcome.books();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title(), "The Great Gatsby");
        assert_eq!(books[0].author(), "F. Scott Fitzgerald");
        assert_eq!(books[0].price(), 2.99);
        assert_eq!(books[0].currency(), "USD");
        assert_eq!(books[0].language(), "en");
        assert_eq!(
            books[0].purchase_url(),
            "https://play.google.com/store/books/details?id=gatsby"
        );
        assert_eq!(books[1].author(), UNKNOWN_AUTHOR);
        assert_eq!(books[1].price(), 5.0);
    }

    #[tokio::test]
    async fn test_search_url_uses_plus_for_spaces() {
        let server = Server::new_async().await;
        let client = client_for(&server, BatchPolicy::SkipInvalid);

        let url = client.search_url("the great gatsby");

        assert!(url.starts_with(&server.url()));
        assert!(url.contains("q=the+great+gatsby&filter=paid-ebooks&maxResults=40"));
    }

    #[tokio::test]
    async fn test_search_honours_configured_cap() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", VOLUMES_PATH)
            .match_query(Matcher::UrlEncoded("maxResults".into(), "7".into()))
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        let client = BooksClient::new(ClientConfig {
            api_base: f!("{}{VOLUMES_PATH}", server.url()),
            max_results: 7,
            ..ClientConfig::default()
        })
        .unwrap();
        let outcome = client.search("dune").await;

        mock.assert_async().await;
        assert_eq!(outcome, SearchOutcome::Success(vec![]));
    }

    #[tokio::test]
    async fn test_search_missing_authors_key() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", VOLUMES_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"items": [{
                    "volumeInfo": {"title": "Anonymous", "language": "fr"},
                    "saleInfo": {
                        "retailPrice": {"amount": 1.5, "currencyCode": "EUR"},
                        "buyLink": "https://example.com/anon"
                    }
                }]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server, BatchPolicy::Strict);
        let books = client.search_result_set("anonymous").await;

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].author(), MISSING_AUTHOR_INFO);
    }

    #[tokio::test]
    async fn test_search_empty_items() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", VOLUMES_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"kind": "books#volumes", "totalItems": 0, "items": []}"#)
            .create_async()
            .await;

        let client = client_for(&server, BatchPolicy::Strict);
        let outcome = client.search("zzzzzz").await;

        assert_eq!(outcome, SearchOutcome::Success(vec![]));
    }

    #[tokio::test]
    async fn test_search_http_errors() {
        for status in [404, 500] {
            let mut server = Server::new_async().await;
            let _m = server
                .mock("GET", VOLUMES_PATH)
                .match_query(Matcher::Any)
                .with_status(status)
                .with_body(TWO_BOOKS)
                .create_async()
                .await;

            let client = client_for(&server, BatchPolicy::SkipInvalid);
            let outcome = client.search("gatsby").await;

            assert_eq!(
                outcome,
                SearchOutcome::Failure(SearchFailure::HttpStatus(status as u16))
            );
            assert!(client.search_result_set("gatsby").await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_search_invalid_json() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", VOLUMES_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = client_for(&server, BatchPolicy::SkipInvalid);
        let outcome = client.search("gatsby").await;

        assert!(matches!(
            outcome,
            SearchOutcome::Failure(SearchFailure::MalformedResponse(_))
        ));
        assert!(client.search_result_set("gatsby").await.is_empty());
    }

    #[tokio::test]
    async fn test_search_strict_policy_aborts_batch() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", VOLUMES_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"items": [
                    {"volumeInfo": {"title": "Free", "language": "en"}, "saleInfo": {"buyLink": "x"}},
                    {
                        "volumeInfo": {"title": "Paid", "authors": ["A"], "language": "en"},
                        "saleInfo": {
                            "retailPrice": {"amount": 3.0, "currencyCode": "USD"},
                            "buyLink": "https://example.com/paid"
                        }
                    }
                ]}"#,
            )
            .expect(2)
            .create_async()
            .await;

        let strict = client_for(&server, BatchPolicy::Strict).search("x").await;
        assert!(matches!(
            strict,
            SearchOutcome::Failure(SearchFailure::MalformedResponse(_))
        ));

        let lenient = client_for(&server, BatchPolicy::SkipInvalid)
            .search("x")
            .await;
        assert_eq!(lenient.books().len(), 1);
        assert_eq!(lenient.books()[0].title(), "Paid");
    }

    #[tokio::test]
    async fn test_search_connection_refused_is_network_failure() {
        let client = BooksClient::new(ClientConfig {
            api_base: "http://127.0.0.1:1/books/v1/volumes".to_string(),
            connect_timeout: Duration::from_secs(2),
            ..ClientConfig::default()
        })
        .unwrap();

        let outcome = client.search("gatsby").await;

        assert!(matches!(
            outcome,
            SearchOutcome::Failure(SearchFailure::Network(_))
        ));
    }
}
