//! Month-scoped aggregations over the record store
//!
//! Every aggregation takes only an optional month; without one it covers the
//! whole store. The combined view runs all of them concurrently for the same
//! month.

pub mod histogram;
pub mod routes;

use crate::database::{DatabaseManager, DatabaseResult, entities::Transaction};
use crate::listing::ListingService;
use crate::query::{Month, TransactionFilter};
use histogram::{OVERFLOW_KEY, PRICE_BOUNDARIES, PriceBucket, fill_buckets};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use routes::create_statistics_routes;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales: f64,
    pub sold_items: u64,
    pub unsold_items: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(rename = "_id")]
    pub category: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    pub transactions: Vec<Transaction>,
    pub statistics: SalesSummary,
    pub price_range: Vec<PriceBucket>,
    pub categories: Vec<CategoryCount>,
}

pub struct StatisticsService {
    database: Arc<dyn DatabaseManager>,
    listing: Arc<ListingService>,
}

impl StatisticsService {
    pub fn new(database: Arc<dyn DatabaseManager>, listing: Arc<ListingService>) -> Self {
        Self { database, listing }
    }

    pub async fn sales_summary(&self, month: Option<Month>) -> DatabaseResult<SalesSummary> {
        let filter = TransactionFilter::for_month(month);
        let dao = self.database.transactions();

        let (total_sales, sold) = tokio::try_join!(dao.sum_price(&filter), dao.count_sold(&filter))?;

        Ok(SalesSummary {
            total_sales,
            sold_items: sold.sold,
            unsold_items: sold.unsold,
        })
    }

    pub async fn price_histogram(&self, month: Option<Month>) -> DatabaseResult<Vec<PriceBucket>> {
        let filter = TransactionFilter::for_month(month);
        let rows = self
            .database
            .transactions()
            .count_price_buckets(&filter, &PRICE_BOUNDARIES, OVERFLOW_KEY)
            .await?;

        Ok(fill_buckets(&rows))
    }

    pub async fn category_distribution(
        &self,
        month: Option<Month>,
    ) -> DatabaseResult<Vec<CategoryCount>> {
        let filter = TransactionFilter::for_month(month);
        let rows = self
            .database
            .transactions()
            .count_by_category(&filter)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryCount {
                category: row.category,
                count: row.count.max(0) as u64,
            })
            .collect())
    }

    pub async fn combined(&self, month: Option<Month>) -> DatabaseResult<CombinedData> {
        let filter = TransactionFilter::for_month(month);

        let (transactions, statistics, price_range, categories) = tokio::try_join!(
            self.listing.list_all(&filter),
            self.sales_summary(month),
            self.price_histogram(month),
            self.category_distribution(month),
        )?;

        Ok(CombinedData {
            transactions,
            statistics,
            price_range,
            categories,
        })
    }
}
