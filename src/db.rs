//! Creates the application's database schema.

use rusqlite::Connection;

/// Initialize the database by creating the tables for the domain models.
///
/// All three tables are keyed by the owning user's ID. Budget categories are
/// deliberately *not* a foreign key into another table: the link between a
/// budget and its transactions is plain string equality, and orphan
/// categories are allowed on both sides.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                amount INTEGER NOT NULL,
                recurring INTEGER NOT NULL,
                avatar TEXT NOT NULL
                )",
        (),
    )?;

    // Covers the per-user snapshot reads that feed the query and
    // aggregation engines.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                maximum INTEGER NOT NULL,
                theme TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS pot (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                target INTEGER NOT NULL,
                total INTEGER NOT NULL DEFAULT 0,
                theme TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}
