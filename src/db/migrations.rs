use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::Context;
use rusqlite::Connection;

/// Applies the `.sql` files under `migrations/` in filename order, recording
/// each applied file so reruns are no-ops.
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .context("failed to create migrations table")?;

    let applied = applied_migrations(conn)?;

    let migrations_dir = Path::new("migrations");
    if !migrations_dir.exists() {
        tracing::warn!("migrations directory not found, skipping");
        return Ok(());
    }

    let mut files: Vec<_> = fs::read_dir(migrations_dir)
        .context("failed to read migrations directory")?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext == "sql").unwrap_or(false))
        .collect();
    files.sort();

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if applied.contains(&name) {
            continue;
        }

        let sql = fs::read_to_string(&path)
            .with_context(|| format!("failed to read migration file: {name}"))?;

        conn.execute_batch(&sql)
            .with_context(|| format!("failed to apply migration: {name}"))?;

        conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [&name])
            .with_context(|| format!("failed to record migration: {name}"))?;

        tracing::info!("applied migration: {name}");
    }

    Ok(())
}

fn applied_migrations(conn: &Connection) -> anyhow::Result<HashSet<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM _migrations")
        .context("failed to query applied migrations")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut applied = HashSet::new();
    for row in rows {
        applied.insert(row?);
    }
    Ok(applied)
}
