use std::time::Duration;

use booklist_core::books::BatchPolicy;
use booklist_core::query::{DEFAULT_API_BASE, DEFAULT_MAX_RESULTS};

/// Settings for the books API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub max_results: u32,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub policy: BatchPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            connect_timeout: Duration::from_secs(20),
            read_timeout: Duration::from_secs(10),
            policy: BatchPolicy::SkipInvalid,
        }
    }
}

impl From<&crate::Global> for ClientConfig {
    fn from(global: &crate::Global) -> Self {
        Self {
            api_base: global.api_base.clone(),
            max_results: global.max_results,
            connect_timeout: Duration::from_secs(global.connect_timeout),
            read_timeout: Duration::from_secs(global.read_timeout),
            policy: if global.strict {
                BatchPolicy::Strict
            } else {
                BatchPolicy::SkipInvalid
            },
        }
    }
}
