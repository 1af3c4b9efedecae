#![cfg(test)]
use migration::MigratorTrait;
use models::db::connect_with;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use crate::catalog::CreateService;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// DB tests are skipped when no store is reachable.
pub fn db_available() -> bool {
    std::env::var("SKIP_DB_TESTS").is_err() && std::env::var("DATABASE_URL").is_ok()
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_init(|| async {
            let cfg = configs::AppConfig::load_or_env().expect("test config");
            let db = connect_with(&cfg.database).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
            drop(db);
        })
        .await;

    // Return a fresh connection for the current test's runtime
    let mut cfg = configs::AppConfig::load_or_env()?;
    cfg.database.max_connections = cfg.database.max_connections.max(10);
    cfg.database.min_connections = cfg.database.min_connections.min(1);
    let db = connect_with(&cfg.database).await?;
    Ok(db)
}

/// Valid creation payload with a caller-chosen name.
pub fn sample_create(name: &str) -> CreateService {
    CreateService {
        id: None,
        name: name.to_string(),
        owner_team: "FinOps".to_string(),
        tier: "gold".to_string(),
        lifecycle: "production".to_string(),
        endpoints: vec!["https://example.com/api".to_string()],
        tags: vec!["critical".to_string()],
    }
}
