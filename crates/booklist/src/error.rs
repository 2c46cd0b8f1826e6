use booklist_core::search::SearchFailure;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid purchase URL: {0}")]
    InvalidPurchaseUrl(String),

    #[error("Failed to open browser: {0}")]
    BrowserLaunch(String),

    #[error("No result number {0} in the current list")]
    NoSuchResult(usize),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error(transparent)]
    Search(#[from] SearchFailure),
}
