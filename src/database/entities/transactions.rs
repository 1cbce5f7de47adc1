use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One product sale as imported from the seed source.
///
/// Every imported field is optional: the seed data is not validated and the
/// dashboard has to cope with partial rows. `row_id` is the store's own key and
/// is exposed as `_id`; `id` is whatever identifier the source carried.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(rename = "_id")]
    pub row_id: i32,
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    /// Kept verbatim, e.g. `2021-11-27T20:29:54+05:30`
    pub date_of_sale: Option<String>,
    pub sold: Option<bool>,
    pub image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
