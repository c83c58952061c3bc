#![warn(clippy::all)]

use trivia_api::config::{Backend, Config};
use trivia_api::store::{MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<(), handle_errors::Error> {
    let config = Config::new()?;
    trivia_api::setup_tracing(&config);

    match config.backend {
        Backend::Postgres => {
            let store = PgStore::new(&config.database_url(), config.max_connections).await?;
            store.migrate().await?;
            trivia_api::run(&config, store).await;
        }
        Backend::Memory => {
            let store = match &config.seed_file {
                Some(path) => MemoryStore::from_seed_file(path)?,
                None => MemoryStore::default(),
            };
            trivia_api::run(&config, store).await;
        }
    }

    Ok(())
}
