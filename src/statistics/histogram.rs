use crate::database::PriceBucketRow;
use serde::{Deserialize, Serialize};

/// Lower bounds of the fixed price buckets; each pair forms `[lo, hi)`
pub const PRICE_BOUNDARIES: [i32; 11] = [0, 100, 200, 300, 400, 500, 600, 700, 800, 900, 1000];

pub const OVERFLOW_LABEL: &str = "1000+";

/// Store-side key for the overflow bucket; never a valid lower bound
pub const OVERFLOW_KEY: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BucketKey {
    LowerBound(i32),
    Overflow(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBucket {
    #[serde(rename = "_id")]
    pub key: BucketKey,
    pub range: String,
    pub count: u64,
}

/// Expand grouped store rows into the full, ordered histogram. Buckets the
/// store did not return are emitted with a zero count.
pub fn fill_buckets(rows: &[PriceBucketRow]) -> Vec<PriceBucket> {
    let count_for = |key: i32| -> u64 {
        rows.iter()
            .filter(|row| row.bucket == key)
            .map(|row| row.count.max(0) as u64)
            .sum()
    };

    let mut buckets: Vec<PriceBucket> = PRICE_BOUNDARIES
        .windows(2)
        .map(|range| PriceBucket {
            key: BucketKey::LowerBound(range[0]),
            range: format!("{}-{}", range[0], range[1]),
            count: count_for(range[0]),
        })
        .collect();

    buckets.push(PriceBucket {
        key: BucketKey::Overflow(OVERFLOW_LABEL.to_string()),
        range: OVERFLOW_LABEL.to_string(),
        count: count_for(OVERFLOW_KEY),
    });

    buckets
}

/// Bucket key a price falls into, mirroring the store-side CASE expression
#[cfg(test)]
fn bucket_for(price: Option<f64>) -> i32 {
    price
        .and_then(|price| {
            PRICE_BOUNDARIES
                .windows(2)
                .find(|range| price >= f64::from(range[0]) && price < f64::from(range[1]))
                .map(|range| range[0])
        })
        .unwrap_or(OVERFLOW_KEY)
}
