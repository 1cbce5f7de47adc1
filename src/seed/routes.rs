use crate::{error::AppError, query::parse_flag, server::Server};
use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};

pub fn create_seed_routes() -> Router<Server> {
    Router::new().route("/initialize-db", get(initialize_db))
}

/// `force` stays raw so a bad value comes back as a JSON validation error
#[derive(Debug, Default, Deserialize)]
pub struct InitializeQuery {
    pub force: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InitializeResponse {
    pub message: String,
    pub inserted: u64,
}

async fn initialize_db(
    State(server): State<Server>,
    Query(params): Query<InitializeQuery>,
) -> Result<Json<InitializeResponse>, AppError> {
    let force = parse_flag(params.force.as_deref())?;
    let outcome = server
        .seed_service
        .import(server.seed_source.as_ref(), force)
        .await?;

    Ok(Json(InitializeResponse {
        message: outcome.message(),
        inserted: outcome.inserted,
    }))
}
