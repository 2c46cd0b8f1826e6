use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Author placeholder used when the API sends `"authors": null`
pub const UNKNOWN_AUTHOR: &str = "*** unknown author ***";

/// Author placeholder used when the `authors` key is absent
pub const MISSING_AUTHOR_INFO: &str = "*** missing info of authors ***";

/// One decoded search result
///
/// Fields are private so a record can't change once it has been decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    title: String,
    author: String,
    price: f64,
    currency: String,
    language: String,
    purchase_url: String,
}

/// Ordered search results, in the order the API returned them
pub type ResultSet = Vec<BookRecord>;

impl BookRecord {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        price: f64,
        currency: impl Into<String>,
        language: impl Into<String>,
        purchase_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            price,
            currency: currency.into(),
            language: language.into(),
            purchase_url: purchase_url.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Author name, or one of [`UNKNOWN_AUTHOR`] / [`MISSING_AUTHOR_INFO`]
    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn purchase_url(&self) -> &str {
        &self.purchase_url
    }
}

/// Volume item from the API `items` array
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub volume_info: VolumeInfo,
    pub sale_info: SaleInfo,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_authors")]
    pub authors: Authors,
    pub language: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SaleInfo {
    pub retail_price: RetailPrice,
    pub buy_link: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RetailPrice {
    pub amount: f64,
    pub currency_code: String,
}

/// State of the `authors` field of a volume
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Authors {
    /// The key is not in the payload
    #[default]
    Missing,
    /// The key is present with a `null` value
    Null,
    /// First entry of a non-empty list
    Listed(String),
}

impl Authors {
    pub fn display_name(&self) -> &str {
        match self {
            Authors::Missing => MISSING_AUTHOR_INFO,
            Authors::Null => UNKNOWN_AUTHOR,
            Authors::Listed(name) => name.as_str(),
        }
    }
}

// Only called when the key exists, `#[serde(default)]` covers the absent case.
fn deserialize_authors<'de, D>(deserializer: D) -> Result<Authors, D::Error>
where
    D: Deserializer<'de>,
{
    // Only the first entry is read, later entries may hold anything.
    let list = match Option::<Vec<Value>>::deserialize(deserializer)? {
        None => return Ok(Authors::Null),
        Some(list) => list,
    };

    match list.into_iter().next() {
        Some(Value::String(name)) => Ok(Authors::Listed(name)),
        Some(other) => Err(de::Error::invalid_type(
            unexpected(&other),
            &"an author name string",
        )),
        None => Err(de::Error::invalid_length(0, &"at least one author")),
    }
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Null => de::Unexpected::Unit,
        Value::Bool(b) => de::Unexpected::Bool(*b),
        Value::Number(_) => de::Unexpected::Other("number"),
        Value::String(s) => de::Unexpected::Str(s),
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
    }
}

impl From<Volume> for BookRecord {
    fn from(volume: Volume) -> Self {
        let Volume {
            volume_info,
            sale_info,
        } = volume;

        BookRecord {
            author: volume_info.authors.display_name().to_string(),
            title: volume_info.title,
            language: volume_info.language,
            price: sale_info.retail_price.amount,
            currency: sale_info.retail_price.currency_code,
            purchase_url: sale_info.buy_link,
        }
    }
}

/// What to do when a single item of the `items` array is malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// The first malformed item fails the whole response
    Strict,
    /// Malformed items are dropped and reported in [`Extraction::skipped`]
    #[default]
    SkipInvalid,
}

/// An item that was dropped under [`BatchPolicy::SkipInvalid`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub index: usize,
    pub reason: String,
}

/// Books decoded from one response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub books: ResultSet,
    pub skipped: Vec<SkippedItem>,
}

/// Structural failure of a whole response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("response body is empty")]
    EmptyBody,

    #[error("invalid JSON document: {0}")]
    InvalidJson(String),

    #[error("response has no `items` array")]
    MissingItems,

    #[error("item {index} is malformed: {reason}")]
    InvalidItem { index: usize, reason: String },
}

/// Decode a volumes search response body into book records
///
/// Records keep the order of the `items` array. A document without `items`
/// is only accepted when it reports `totalItems: 0`, which is how the API
/// answers a search with no matches.
pub fn extract_books(body: &str, policy: BatchPolicy) -> Result<Extraction, ExtractError> {
    if body.trim().is_empty() {
        return Err(ExtractError::EmptyBody);
    }

    let document: Value =
        serde_json::from_str(body).map_err(|e| ExtractError::InvalidJson(e.to_string()))?;

    let mut root = match document {
        Value::Object(root) => root,
        other => {
            return Err(ExtractError::InvalidJson(format!(
                "expected an object at the top level, found {}",
                json_kind(&other)
            )))
        }
    };

    let items = match root.remove("items") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ExtractError::InvalidJson(format!(
                "expected `items` to be an array, found {}",
                json_kind(&other)
            )))
        }
        None if reports_no_matches(&root) => return Ok(Extraction::default()),
        None => return Err(ExtractError::MissingItems),
    };

    let mut extraction = Extraction {
        books: Vec::with_capacity(items.len()),
        skipped: Vec::new(),
    };

    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Volume>(item) {
            Ok(volume) => extraction.books.push(volume.into()),
            Err(e) => match policy {
                BatchPolicy::Strict => {
                    return Err(ExtractError::InvalidItem {
                        index,
                        reason: e.to_string(),
                    })
                }
                BatchPolicy::SkipInvalid => extraction.skipped.push(SkippedItem {
                    index,
                    reason: e.to_string(),
                }),
            },
        }
    }

    Ok(extraction)
}

fn reports_no_matches(root: &Map<String, Value>) -> bool {
    root.get("totalItems").and_then(Value::as_u64) == Some(0)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Format a price with two decimals, e.g. `9.5` as `"9.50"`
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}
