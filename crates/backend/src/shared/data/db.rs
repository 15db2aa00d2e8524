use std::path::Path;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

const CREATE_STORE_RECORD: &str = r#"
    CREATE TABLE IF NOT EXISTS store_record (
        id TEXT PRIMARY KEY NOT NULL,
        table_name TEXT NOT NULL,
        data TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
"#;

const CREATE_STORE_RECORD_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_store_record_table
        ON store_record (table_name, created_at);
"#;

/// Opens the SQLite file at `db_path` (created when missing) and bootstraps
/// the schema
pub async fn initialize_database(db_path: &Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_path)
    };
    // Windows paths need a leading slash in the URL
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    let conn = connect(&db_url).await?;
    tracing::info!("Database ready at {}", absolute_path.display());
    Ok(conn)
}

/// Connects to `db_url` and creates the record table when missing
pub async fn connect(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(db_url.to_string());
    options.sqlx_logging(false);
    // An in-memory database lives in a single connection
    if db_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options).await?;
    bootstrap_schema(&conn).await?;
    Ok(conn)
}

async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for sql in [CREATE_STORE_RECORD, CREATE_STORE_RECORD_INDEX] {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    Ok(())
}
