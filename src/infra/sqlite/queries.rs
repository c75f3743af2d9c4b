use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use crate::infra::sqlite::schema::open_connection;

pub fn put_values(db_path: &Path, entries: &[(&str, &str)]) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start handoff transaction")?;

    {
        let mut upsert = tx
            .prepare(
                "INSERT INTO handoff(key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            )
            .context("failed to prepare handoff upsert")?;
        for (key, value) in entries {
            upsert
                .execute(params![key, value])
                .with_context(|| format!("failed to store handoff key: {key}"))?;
        }
    }

    tx.commit().context("failed to commit handoff transaction")?;
    Ok(())
}

pub fn get_value(db_path: &Path, key: &str) -> Result<Option<String>> {
    let conn = open_connection(db_path)?;
    conn.query_row(
        "SELECT value FROM handoff WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .with_context(|| format!("failed to read handoff key: {key}"))
}

pub fn delete_values(db_path: &Path, keys: &[&str]) -> Result<()> {
    let conn = open_connection(db_path)?;
    for key in keys {
        conn.execute("DELETE FROM handoff WHERE key = ?1", params![key])
            .with_context(|| format!("failed to delete handoff key: {key}"))?;
    }
    Ok(())
}
