use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Row};
use std::env;

pub mod models;

use models::{Donation, Donor, NewDonation};

pub type DbPool = Pool<SqliteConnectionManager>;

/// Fallback location of the database file next to the executable.
pub const DEFAULT_DATABASE_PATH: &str = "clothing_drive.sqlite";

/// Open the pool at `DATABASE_PATH` (or the default path) and make sure the
/// schema exists. The application is single threaded, so one connection is
/// all the pool ever hands out.
pub fn init_pool() -> anyhow::Result<DbPool> {
    let path = env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());
    init_pool_at(&path)
}

pub fn init_pool_at(path: &str) -> anyhow::Result<DbPool> {
    let manager = SqliteConnectionManager::file(path)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| anyhow::anyhow!("Failed to create DB pool: {}", e))?;

    sync_schema(&pool)?;
    Ok(pool)
}

/// Create the two tables if they are not there yet. Safe to run on every
/// startup.
pub fn sync_schema(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS donor (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL,
            phone TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS donation (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            date        TEXT NOT NULL,
            size        TEXT NOT NULL,
            condition   TEXT NOT NULL,
            status      TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            donor_id    INTEGER REFERENCES donor(id)
        );
        "#,
    )?;
    Ok(())
}

fn donor_from_row(row: &Row<'_>) -> rusqlite::Result<Donor> {
    Ok(Donor {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
    })
}

fn donation_from_row(row: &Row<'_>) -> rusqlite::Result<Donation> {
    Ok(Donation {
        id: row.get(0)?,
        date: row.get(1)?,
        size: row.get(2)?,
        condition: row.get(3)?,
        status: row.get(4)?,
        description: row.get(5)?,
        donor_id: row.get(6)?,
    })
}

pub fn insert_donor(pool: &DbPool, name: &str, phone: &str) -> anyhow::Result<i64> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO donor (name, phone) VALUES (?1, ?2)",
        params![name, phone],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All donors whose stored phone matches exactly. Phone is the practical
/// natural key, so this is how "the same donor" is recognized.
pub fn find_donors_by_phone(pool: &DbPool, phone: &str) -> anyhow::Result<Vec<Donor>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare("SELECT id, name, phone FROM donor WHERE phone = ?1")?;
    let donors = stmt
        .query_map(params![phone], donor_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(donors)
}

pub fn get_donor(pool: &DbPool, id: i64) -> anyhow::Result<Option<Donor>> {
    let conn = pool.get()?;
    let donor = conn
        .query_row(
            "SELECT id, name, phone FROM donor WHERE id = ?1",
            params![id],
            donor_from_row,
        )
        .optional()?;
    Ok(donor)
}

pub fn list_donors(pool: &DbPool) -> anyhow::Result<Vec<Donor>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare("SELECT id, name, phone FROM donor ORDER BY name")?;
    let donors = stmt
        .query_map([], donor_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(donors)
}

pub fn insert_donation(pool: &DbPool, donation: &NewDonation) -> anyhow::Result<i64> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO donation (date, size, condition, status, description, donor_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            donation.date,
            donation.size,
            donation.condition,
            donation.status,
            donation.description,
            donation.donor_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_donation(pool: &DbPool, id: i64) -> anyhow::Result<Option<Donation>> {
    let conn = pool.get()?;
    let donation = conn
        .query_row(
            "SELECT id, date, size, condition, status, description, donor_id
               FROM donation WHERE id = ?1",
            params![id],
            donation_from_row,
        )
        .optional()?;
    Ok(donation)
}

/// Overwrite every mutable column of an existing donation. Last write wins;
/// there is no concurrency check. Returns false when the row is gone.
pub fn update_donation(pool: &DbPool, donation: &Donation) -> anyhow::Result<bool> {
    let conn = pool.get()?;
    let changed = conn.execute(
        "UPDATE donation
            SET date = ?2, size = ?3, condition = ?4, status = ?5,
                description = ?6, donor_id = ?7
          WHERE id = ?1",
        params![
            donation.id,
            donation.date,
            donation.size,
            donation.condition,
            donation.status,
            donation.description,
            donation.donor_id,
        ],
    )?;
    Ok(changed > 0)
}

pub fn delete_donation(pool: &DbPool, id: i64) -> anyhow::Result<bool> {
    let conn = pool.get()?;
    let changed = conn.execute("DELETE FROM donation WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

pub fn list_donations(pool: &DbPool) -> anyhow::Result<Vec<Donation>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, date, size, condition, status, description, donor_id
           FROM donation ORDER BY id",
    )?;
    let donations = stmt
        .query_map([], donation_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(donations)
}

pub fn count_donations_by_donor(pool: &DbPool, donor_id: i64) -> anyhow::Result<i64> {
    let conn = pool.get()?;
    let count = conn.query_row(
        "SELECT COUNT(*) FROM donation WHERE donor_id = ?1",
        params![donor_id],
        |row| row.get(0),
    )?;
    Ok(count)
}
