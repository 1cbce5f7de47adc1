use super::Transactions;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::RowId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::Id).big_integer().null())
                    .col(ColumnDef::new(Transactions::Title).string().null())
                    .col(ColumnDef::new(Transactions::Description).text().null())
                    .col(ColumnDef::new(Transactions::Category).string().null())
                    .col(ColumnDef::new(Transactions::Price).double().null())
                    .col(ColumnDef::new(Transactions::DateOfSale).string().null())
                    .col(ColumnDef::new(Transactions::Sold).boolean().null())
                    .col(ColumnDef::new(Transactions::Image).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_date_of_sale")
                    .table(Transactions::Table)
                    .col(Transactions::DateOfSale)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_category")
                    .table(Transactions::Table)
                    .col(Transactions::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_id")
                    .table(Transactions::Table)
                    .col(Transactions::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}
