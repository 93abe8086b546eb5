use actix_web::web::Data;
use actix_web::{App, HttpServer};
use rowdy_matchplay::args::{self, DatabaseType};
use rowdy_matchplay::controller::score::configure;
use rowdy_matchplay::seed::{parse_seed, seed_storage};
use rowdy_matchplay::storage::{MemoryStorage, SqliteStorage, Storage};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = args::args_checks();

    let storage: Arc<dyn Storage> = match args.db_type {
        DatabaseType::Memory => Arc::new(MemoryStorage::new()),
        DatabaseType::Sqlite => {
            let path = args
                .db_name
                .clone()
                .ok_or("sqlite storage needs --db-name")?;
            tracing::info!(path = %path.display(), "opening sqlite storage");
            Arc::new(SqliteStorage::open(path).await?)
        }
    };

    if let Some(json) = &args.seed_json {
        let seed = parse_seed(json)?;
        seed_storage(storage.as_ref(), &seed).await?;
    }

    tracing::info!(bind = %args.bind, port = args.port, "starting http server");
    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(Arc::clone(&storage)))
            .configure(configure)
    })
    .bind((args.bind.as_str(), args.port))?
    .run()
    .await?;
    Ok(())
}
