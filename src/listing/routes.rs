use super::TransactionPage;
use crate::{
    error::AppError,
    query::{Pagination, TransactionFilter},
    server::Server,
};
use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::Deserialize;

/// `/getAllData` and `/transactions` are the same listing
pub fn create_listing_routes() -> Router<Server> {
    Router::new()
        .route("/getAllData", get(list_transactions))
        .route("/transactions", get(list_transactions))
}

/// Raw listing parameters, validated by the query builder
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub search: Option<String>,
    pub month: Option<String>,
}

async fn list_transactions(
    State(server): State<Server>,
    Query(params): Query<ListingQuery>,
) -> Result<Json<TransactionPage>, AppError> {
    let filter = TransactionFilter::from_params(params.search.as_deref(), params.month.as_deref())?;
    let pagination = Pagination::from_params(params.page.as_deref(), params.per_page.as_deref())?;

    let page = server.listing_service.list(&filter, pagination).await?;
    Ok(Json(page))
}
