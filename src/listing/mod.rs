pub mod routes;

use crate::database::{DatabaseManager, DatabaseResult, entities::Transaction};
use crate::query::{Pagination, TransactionFilter};
use serde::Serialize;
use std::sync::Arc;

pub use routes::create_listing_routes;

/// One page of matching records plus the numbers a client needs to page on
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub current_page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub total_records: u64,
}

pub struct ListingService {
    database: Arc<dyn DatabaseManager>,
}

impl ListingService {
    pub fn new(database: Arc<dyn DatabaseManager>) -> Self {
        Self { database }
    }

    pub async fn list(
        &self,
        filter: &TransactionFilter,
        pagination: Pagination,
    ) -> DatabaseResult<TransactionPage> {
        let (transactions, total_records) = self
            .database
            .transactions()
            .find_page(filter, &pagination)
            .await?;

        Ok(TransactionPage {
            transactions,
            current_page: pagination.page,
            per_page: pagination.per_page,
            total_pages: pagination.total_pages(total_records),
            total_records,
        })
    }

    /// Every matching record in listing order, without paging
    pub async fn list_all(&self, filter: &TransactionFilter) -> DatabaseResult<Vec<Transaction>> {
        self.database.transactions().find_all(filter).await
    }
}
