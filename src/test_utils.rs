use crate::{
    config::Config,
    database::entities::{Transaction, transactions},
    server::Server,
};
use sea_orm::{ActiveValue::NotSet, Set};

/// Test server builder backed by in-memory SQLite with migrations applied
pub struct TestServerBuilder {
    config: Config,
    use_memory_db: bool,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            use_memory_db: true,
        }
    }

    /// Keep the database URL from the supplied configuration
    pub fn with_real_database(mut self) -> Self {
        self.use_memory_db = false;
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Point `/initialize-db` at a different seed URL
    pub fn with_seed_url(mut self, url: impl Into<String>) -> Self {
        self.config.seed.url = url.into();
        self
    }

    pub async fn build(self) -> Server {
        let mut config = self.config;

        if self.use_memory_db {
            config.database.url = "sqlite::memory:".to_string();
        }
        config.logging.log_request = false;

        let server = Server::new(config).await.unwrap();
        server.database.migrate().await.unwrap();
        server
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A record with the fields the aggregations look at
pub fn sale(id: i64, price: f64, sold: bool, date_of_sale: &str) -> transactions::ActiveModel {
    transactions::ActiveModel {
        row_id: NotSet,
        id: Set(Some(id)),
        title: Set(Some(format!("Product {}", id))),
        description: Set(Some(format!("Description of product {}", id))),
        category: Set(Some("general".to_string())),
        price: Set(Some(price)),
        date_of_sale: Set(Some(date_of_sale.to_string())),
        sold: Set(Some(sold)),
        image: Set(Some(format!("https://example.com/images/{}.jpg", id))),
    }
}

/// A record with searchable text
pub fn titled_sale(
    id: i64,
    title: &str,
    description: &str,
    price: f64,
    date_of_sale: &str,
) -> transactions::ActiveModel {
    transactions::ActiveModel {
        title: Set(Some(title.to_string())),
        description: Set(Some(description.to_string())),
        ..sale(id, price, true, date_of_sale)
    }
}

pub fn categorized_sale(id: i64, category: &str, date_of_sale: &str) -> transactions::ActiveModel {
    transactions::ActiveModel {
        category: Set(Some(category.to_string())),
        ..sale(id, 10.0, true, date_of_sale)
    }
}

/// Insert records one by one so `_id` follows the given order
pub async fn insert_sales(
    server: &Server,
    records: Vec<transactions::ActiveModel>,
) -> Vec<Transaction> {
    let dao = server.database.transactions();
    let mut inserted = Vec::with_capacity(records.len());
    for record in records {
        inserted.push(dao.insert(record).await.unwrap());
    }
    inserted
}
