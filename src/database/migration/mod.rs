use sea_orm_migration::prelude::*;

pub use sea_orm_migration::MigratorTrait;

mod m20241015_000001_create_transactions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20241015_000001_create_transactions_table::Migration,
        )]
    }
}

/// Common table and column identifiers
#[derive(Iden)]
pub enum Transactions {
    Table,
    RowId,
    Id,
    Title,
    Description,
    Category,
    Price,
    DateOfSale,
    Sold,
    Image,
}
