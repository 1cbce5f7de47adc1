use crate::database::entities::{Transaction, Transactions, transactions};
use crate::database::{DatabaseError, DatabaseResult};
use crate::query::{Pagination, TransactionFilter};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait,
    sea_query::{Alias, CaseStatement, Expr, SimpleExpr},
};

/// Record count for one price bucket, keyed by the bucket's lower bound
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct PriceBucketRow {
    pub bucket: i32,
    pub count: i64,
}

/// Record count for one category value; `None` groups rows without a category
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CategoryCountRow {
    pub category: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoldCounts {
    pub sold: u64,
    pub unsold: u64,
}

/// Transactions DAO for database operations
pub struct TransactionsDao {
    db: DatabaseConnection,
}

impl TransactionsDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filtered(filter: &TransactionFilter) -> Select<Transactions> {
        Transactions::find().filter(filter.condition())
    }

    /// Listing order: external id first, store key as tie-breaker
    fn ordered(select: Select<Transactions>) -> Select<Transactions> {
        select
            .order_by_asc(transactions::Column::Id)
            .order_by_asc(transactions::Column::RowId)
    }

    /// Get one page of matching records together with the total match count
    pub async fn find_page(
        &self,
        filter: &TransactionFilter,
        pagination: &Pagination,
    ) -> DatabaseResult<(Vec<Transaction>, u64)> {
        let select = Self::filtered(filter);

        let total = select
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        let records = Self::ordered(select)
            .offset(pagination.offset())
            .limit(pagination.per_page)
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok((records, total))
    }

    /// Get every matching record in listing order
    pub async fn find_all(&self, filter: &TransactionFilter) -> DatabaseResult<Vec<Transaction>> {
        Self::ordered(Self::filtered(filter))
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    pub async fn count(&self, filter: &TransactionFilter) -> DatabaseResult<u64> {
        Self::filtered(filter)
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Sum of `price` over matching records; missing prices count as zero
    pub async fn sum_price(&self, filter: &TransactionFilter) -> DatabaseResult<f64> {
        let total: Option<Option<f64>> = Self::filtered(filter)
            .select_only()
            .column_as(transactions::Column::Price.sum(), "total")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(total.flatten().unwrap_or(0.0))
    }

    /// Count matching records by sold flag; rows with no flag are in neither count
    pub async fn count_sold(&self, filter: &TransactionFilter) -> DatabaseResult<SoldCounts> {
        let sold = Self::filtered(filter)
            .filter(transactions::Column::Sold.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        let unsold = Self::filtered(filter)
            .filter(transactions::Column::Sold.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(SoldCounts { sold, unsold })
    }

    /// Count matching records per price bucket.
    ///
    /// `boundaries` must be ascending; consecutive pairs form half-open ranges
    /// keyed by their lower bound. Anything outside them, including missing
    /// prices, is keyed by `overflow_key`. Empty buckets are not returned.
    pub async fn count_price_buckets(
        &self,
        filter: &TransactionFilter,
        boundaries: &[i32],
        overflow_key: i32,
    ) -> DatabaseResult<Vec<PriceBucketRow>> {
        let mut case = CaseStatement::new();
        for range in boundaries.windows(2) {
            let price = Expr::col(transactions::Column::Price);
            case = case.case(
                price
                    .clone()
                    .gte(range[0])
                    .and(price.lt(range[1])),
                Expr::val(range[0]),
            );
        }
        let bucket: SimpleExpr = case.finally(Expr::val(overflow_key)).into();
        let bucket_alias: SimpleExpr = Expr::col(Alias::new("bucket")).into();

        Self::filtered(filter)
            .select_only()
            .column_as(bucket, "bucket")
            .column_as(transactions::Column::RowId.count(), "count")
            .group_by(bucket_alias)
            .into_model::<PriceBucketRow>()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Count matching records per category, largest group first
    pub async fn count_by_category(
        &self,
        filter: &TransactionFilter,
    ) -> DatabaseResult<Vec<CategoryCountRow>> {
        Self::filtered(filter)
            .select_only()
            .column(transactions::Column::Category)
            .column_as(transactions::Column::RowId.count(), "count")
            .group_by(transactions::Column::Category)
            .order_by_desc(transactions::Column::RowId.count())
            .order_by_asc(transactions::Column::Category)
            .into_model::<CategoryCountRow>()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Insert a single record and return it with its assigned `_id`
    pub async fn insert(&self, record: transactions::ActiveModel) -> DatabaseResult<Transaction> {
        record
            .insert(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Bulk insert in batches of `batch_size`, all inside one transaction
    pub async fn insert_many(
        &self,
        records: Vec<transactions::ActiveModel>,
        batch_size: usize,
    ) -> DatabaseResult<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        let inserted = insert_batches(&txn, &records, batch_size).await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(inserted)
    }

    /// Delete every record and insert `records` in their place atomically
    pub async fn replace_all(
        &self,
        records: Vec<transactions::ActiveModel>,
        batch_size: usize,
    ) -> DatabaseResult<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        let removed = Transactions::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;
        tracing::debug!(removed = removed.rows_affected, "Cleared existing transactions");

        let inserted = insert_batches(&txn, &records, batch_size).await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(inserted)
    }
}

async fn insert_batches<C: ConnectionTrait>(
    conn: &C,
    records: &[transactions::ActiveModel],
    batch_size: usize,
) -> DatabaseResult<u64> {
    let mut inserted = 0;
    for chunk in records.chunks(batch_size.max(1)) {
        inserted += Transactions::insert_many(chunk.to_vec())
            .exec_without_returning(conn)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;
    }
    Ok(inserted)
}
