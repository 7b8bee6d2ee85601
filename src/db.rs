//! Sets up the application's SQLite database.

use rusqlite::Connection;

use crate::transaction::create_transaction_table;

/// Create all the tables used by the application.
///
/// Creating the tables is idempotent, calling this function on an already
/// initialized database leaves it unchanged.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = connection.unchecked_transaction()?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
