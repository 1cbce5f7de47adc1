use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// JSON array of sale records fetched by `/initialize-db`
    #[serde(default = "default_seed_url")]
    pub url: String,
    #[serde(default = "default_seed_timeout_secs")]
    pub timeout_secs: u64,
    /// Rows per INSERT statement
    #[serde(default = "default_seed_batch_size")]
    pub batch_size: usize,
}

fn default_seed_url() -> String {
    "https://s3.amazonaws.com/roxiler.com/product_transaction.json".to_string()
}

fn default_seed_timeout_secs() -> u64 {
    30
}

fn default_seed_batch_size() -> usize {
    200
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            url: default_seed_url(),
            timeout_secs: default_seed_timeout_secs(),
            batch_size: default_seed_batch_size(),
        }
    }
}
