use crate::prelude::{println, *};
use reqwest::Url;

#[derive(Debug, clap::Args, Clone)]
pub struct OpenOptions {
    /// Purchase page URL, as printed by `booklist search`
    #[arg(value_name = "URL")]
    pub url: String,
}

pub async fn run(options: OpenOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Opening {}", options.url);
    }

    open_purchase_page(&options.url)?;
    Ok(())
}

/// Only absolute http(s) links are handed to the browser
pub fn validate_purchase_url(url: &str) -> Result<Url, Error> {
    let parsed =
        Url::parse(url.trim()).map_err(|e| Error::InvalidPurchaseUrl(f!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(Error::InvalidPurchaseUrl(f!(
            "{url}: unsupported scheme {scheme:?}"
        ))),
    }
}

/// The link handed to the browser: the decoded string, not the parsed form
fn launch_target(url: &str) -> Result<&str, Error> {
    validate_purchase_url(url)?;
    Ok(url.trim())
}

/// Ask the host environment to open a purchase page in the default browser
pub fn open_purchase_page(url: &str) -> Result<(), Error> {
    let target = launch_target(url)?;

    log::info!("Opening purchase page {target}");
    ::open::that(target).map_err(|e| Error::BrowserLaunch(e.to_string()))
}
