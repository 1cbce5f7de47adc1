use crate::Config;
use crate::database::{DatabaseManager, DatabaseManagerImpl};
use crate::seed::{FileSeedSource, HttpSeedSource, SeedService, SeedSource};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Fetch records from this URL instead of `seed.url`
    #[arg(long, conflicts_with = "file")]
    pub url: Option<String>,
    /// Read records from a local JSON file
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Replace existing records
    #[arg(long)]
    pub force: bool,
}

impl SeedArgs {
    fn source(&self, config: &Config) -> Result<Box<dyn SeedSource>, Box<dyn std::error::Error>> {
        if let Some(path) = &self.file {
            return Ok(Box::new(FileSeedSource::new(path.clone())));
        }

        let url = self.url.clone().unwrap_or_else(|| config.seed.url.clone());
        Ok(Box::new(HttpSeedSource::new(
            url,
            Duration::from_secs(config.seed.timeout_secs),
        )?))
    }
}

pub async fn handle_seed_command(
    args: SeedArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let db_manager = DatabaseManagerImpl::new_from_config(&config.database).await?;
    db_manager.migrate().await?;

    let database: Arc<dyn DatabaseManager> = Arc::new(db_manager);
    let service = SeedService::new(database, config.seed.batch_size);
    let source = args.source(config)?;

    let outcome = service.import(source.as_ref(), args.force).await?;
    info!(
        inserted = outcome.inserted,
        skipped = outcome.skipped,
        "{}",
        outcome.message()
    );
    println!("{}", outcome.message());

    Ok(())
}
