pub mod health;

pub use crate::listing::create_listing_routes;
pub use crate::seed::create_seed_routes;
pub use crate::statistics::create_statistics_routes;
pub use health::create_health_routes;
