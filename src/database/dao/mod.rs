pub mod transactions;

pub use transactions::{CategoryCountRow, PriceBucketRow, SoldCounts, TransactionsDao};
