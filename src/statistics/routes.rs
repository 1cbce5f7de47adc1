use super::{CategoryCount, CombinedData, SalesSummary, histogram::PriceBucket};
use crate::{error::AppError, query::parse_month, server::Server};
use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::Deserialize;

pub fn create_statistics_routes() -> Router<Server> {
    Router::new()
        .route("/statistics", get(get_statistics))
        .route("/price-range", get(get_price_range))
        .route("/category-distribution", get(get_category_distribution))
        .route("/combined-data", get(get_combined_data))
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

async fn get_statistics(
    State(server): State<Server>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<SalesSummary>, AppError> {
    let month = parse_month(params.month.as_deref())?;
    let summary = server.statistics_service.sales_summary(month).await?;
    Ok(Json(summary))
}

async fn get_price_range(
    State(server): State<Server>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<Vec<PriceBucket>>, AppError> {
    let month = parse_month(params.month.as_deref())?;
    let buckets = server.statistics_service.price_histogram(month).await?;
    Ok(Json(buckets))
}

async fn get_category_distribution(
    State(server): State<Server>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, AppError> {
    let month = parse_month(params.month.as_deref())?;
    let categories = server
        .statistics_service
        .category_distribution(month)
        .await?;
    Ok(Json(categories))
}

async fn get_combined_data(
    State(server): State<Server>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<CombinedData>, AppError> {
    let month = parse_month(params.month.as_deref())?;
    let combined = server.statistics_service.combined(month).await?;
    Ok(Json(combined))
}
