pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod health;
pub mod listing;
pub mod query;
pub mod routes;
pub mod seed;
pub mod server;
pub mod shutdown;
pub mod statistics;
pub mod test_utils;
pub mod utils;

pub use config::Config;
pub use server::Server;
