use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::env;
use std::fs;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    // Load .env if it exists
    dotenvy::dotenv().ok();

    println!("Starting database migration...");

    let db_path = env::var("DATABASE_PATH")
        .unwrap_or_else(|_| clothing_drive::db::DEFAULT_DATABASE_PATH.to_string());
    println!("Database file: {}", db_path);

    let manager = SqliteConnectionManager::file(&db_path);
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| anyhow::anyhow!("Failed to create DB pool: {}", e))?;

    let conn = pool.get()?;

    let migration_path =
        env::var("MIGRATION_FILE").unwrap_or_else(|_| "migrations/init.sql".to_string());

    if !Path::new(&migration_path).exists() {
        println!("Migration file not found at: {}", migration_path);
        return Ok(());
    }

    let sql_content = fs::read_to_string(&migration_path)?;

    // Split by semicolon to handle multiple statements. Every statement uses
    // IF NOT EXISTS, so reruns are harmless.
    let statements: Vec<&str> = sql_content
        .split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    for sql in statements {
        println!("Executing: {:.50}...", sql);
        conn.execute(sql, [])?;
        println!("Success.");
    }

    println!("Migration complete.");
    Ok(())
}
