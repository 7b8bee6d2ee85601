use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, params, types::Type};
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    Error, OwnerId,
    database_id::TransactionId,
    db::initialize,
    transaction::{NewTransaction, Transaction, TransactionStore, TransactionUpdate},
};

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store and make sure the transaction table exists.
    ///
    /// # Errors
    /// Returns an error if the database schema could not be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

const TRANSACTION_COLUMNS: &str =
    "id, owner, kind, category, amount, description, occurred_on, created_at, updated_at";

impl TransactionStore for SQLiteTransactionStore {
    fn find_by_owner(&self, owner: &OwnerId) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        connection
            .prepare_cached(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
                WHERE owner = ?1 \
                ORDER BY occurred_on DESC, id ASC"
            ))?
            .query_map([owner.as_str()], map_transaction_row)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn insert(&self, owner: &OwnerId, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        insert_transaction(owner, &transaction, OffsetDateTime::now_utc(), &connection)
    }

    fn insert_many(
        &self,
        owner: &OwnerId,
        transactions: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;
        let sql_transaction = connection.unchecked_transaction()?;
        let now = OffsetDateTime::now_utc();

        let inserted = transactions
            .iter()
            .map(|transaction| insert_transaction(owner, transaction, now, &sql_transaction))
            .collect::<Result<Vec<_>, _>>()?;

        sql_transaction.commit()?;

        Ok(inserted)
    }

    fn update_by_owner_and_id(
        &self,
        owner: &OwnerId,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        connection
            .prepare_cached(&format!(
                "UPDATE \"transaction\" SET \
                    kind = COALESCE(?1, kind), \
                    category = COALESCE(?2, category), \
                    amount = COALESCE(?3, amount), \
                    description = COALESCE(?4, description), \
                    occurred_on = COALESCE(?5, occurred_on), \
                    updated_at = ?6 \
                WHERE id = ?7 AND owner = ?8 \
                RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                params![
                    update.kind,
                    update.category,
                    update.amount.map(|amount| amount.to_string()),
                    update.description,
                    update.occurred_on,
                    OffsetDateTime::now_utc(),
                    id,
                    owner.as_str(),
                ],
                map_transaction_row,
            )
            .map_err(Error::from)
    }

    fn delete_by_owner_and_id(&self, owner: &OwnerId, id: TransactionId) -> Result<(), Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND owner = ?2",
            params![id, owner.as_str()],
        )?;

        match rows_affected {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }
}

fn insert_transaction(
    owner: &OwnerId,
    transaction: &NewTransaction,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare_cached(&format!(
            "INSERT INTO \"transaction\" \
            (owner, kind, category, amount, description, occurred_on, created_at, updated_at) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) \
            RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                owner.as_str(),
                transaction.kind,
                transaction.category,
                transaction.amount.to_string(),
                transaction.description,
                transaction.occurred_on,
                now,
            ],
            map_transaction_row,
        )
        .map_err(Error::from)
}

/// Create the transaction table and its indexes.
///
/// # Errors
/// Returns an error if the table could not be created.
pub(crate) fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
            category TEXT NOT NULL,
            amount TEXT NOT NULL,
            description TEXT NOT NULL,
            occurred_on TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_owner_date \
        ON \"transaction\"(owner, occurred_on)",
        (),
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let amount_text: String = row.get(4)?;
    let amount = amount_text.parse::<Decimal>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error))
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        owner: OwnerId::new(row.get::<_, String>(1)?),
        kind: row.get(2)?,
        category: row.get(3)?,
        amount,
        description: row.get(5)?,
        occurred_on: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error, OwnerId,
        transaction::{
            NewTransaction, SQLiteTransactionStore, TransactionKind, TransactionStore,
            TransactionUpdate,
        },
    };

    fn get_store() -> SQLiteTransactionStore {
        let connection = Connection::open_in_memory().unwrap();
        SQLiteTransactionStore::new(connection).unwrap()
    }

    fn new_expense(amount: i64, date: time::Date, description: &str) -> NewTransaction {
        NewTransaction {
            kind: TransactionKind::Expense,
            category: "Food".to_owned(),
            amount: Decimal::new(amount, 0),
            description: description.to_owned(),
            occurred_on: date,
        }
    }

    #[test]
    fn insert_assigns_id_owner_and_timestamps() {
        let store = get_store();
        let owner = OwnerId::new("owner-1");

        let transaction = store
            .insert(&owner, new_expense(5, date!(2025 - 01 - 10), "Coffee"))
            .unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.owner, owner);
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.amount, Decimal::new(5, 0));
        assert_eq!(transaction.occurred_on, date!(2025 - 01 - 10));
        assert_eq!(transaction.created_at, transaction.updated_at);
    }

    #[test]
    fn amounts_keep_their_precision() {
        let store = get_store();
        let owner = OwnerId::new("owner-1");
        let mut new_transaction = new_expense(0, date!(2025 - 01 - 10), "Coffee");
        new_transaction.amount = Decimal::new(1234567, 4);

        store.insert(&owner, new_transaction).unwrap();

        let stored = store.find_by_owner(&owner).unwrap();
        assert_eq!(stored[0].amount, Decimal::new(1234567, 4));
    }

    #[test]
    fn find_by_owner_returns_only_own_transactions_newest_first() {
        let store = get_store();
        let owner = OwnerId::new("owner-1");
        let other_owner = OwnerId::new("owner-2");
        let older = store
            .insert(&owner, new_expense(1, date!(2025 - 01 - 01), "older"))
            .unwrap();
        let newer = store
            .insert(&owner, new_expense(2, date!(2025 - 02 - 01), "newer"))
            .unwrap();
        let same_day = store
            .insert(&owner, new_expense(3, date!(2025 - 02 - 01), "same day"))
            .unwrap();
        store
            .insert(&other_owner, new_expense(4, date!(2025 - 03 - 01), "other"))
            .unwrap();

        let got = store.find_by_owner(&owner).unwrap();

        assert_eq!(got, vec![newer, same_day, older]);
    }

    #[test]
    fn find_by_owner_with_no_transactions_is_empty() {
        let store = get_store();

        let got = store.find_by_owner(&OwnerId::new("nobody")).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn insert_many_stores_all_transactions() {
        let store = get_store();
        let owner = OwnerId::new("owner-1");

        let inserted = store
            .insert_many(
                &owner,
                vec![
                    new_expense(1, date!(2025 - 01 - 01), "first"),
                    new_expense(2, date!(2025 - 01 - 02), "second"),
                ],
            )
            .unwrap();

        assert_eq!(inserted.len(), 2);
        assert_eq!(store.find_by_owner(&owner).unwrap().len(), 2);
    }

    #[test]
    fn insert_many_with_empty_list_stores_nothing() {
        let store = get_store();
        let owner = OwnerId::new("owner-1");

        let inserted = store.insert_many(&owner, Vec::new()).unwrap();

        assert!(inserted.is_empty());
        assert!(store.find_by_owner(&owner).unwrap().is_empty());
    }

    #[test]
    fn update_changes_only_given_fields() {
        let store = get_store();
        let owner = OwnerId::new("owner-1");
        let transaction = store
            .insert(&owner, new_expense(5, date!(2025 - 01 - 10), "Coffee"))
            .unwrap();

        let updated = store
            .update_by_owner_and_id(
                &owner,
                transaction.id,
                TransactionUpdate {
                    amount: Some(Decimal::new(7, 0)),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, transaction.id);
        assert_eq!(updated.amount, Decimal::new(7, 0));
        assert_eq!(updated.description, "Coffee");
        assert_eq!(updated.category, "Food");
        assert_eq!(updated.kind, TransactionKind::Expense);
        assert_eq!(updated.occurred_on, transaction.occurred_on);
        assert_eq!(updated.created_at, transaction.created_at);
    }

    #[test]
    fn update_of_other_owners_transaction_is_not_found() {
        let store = get_store();
        let owner = OwnerId::new("owner-1");
        let transaction = store
            .insert(&owner, new_expense(5, date!(2025 - 01 - 10), "Coffee"))
            .unwrap();

        let result = store.update_by_owner_and_id(
            &OwnerId::new("owner-2"),
            transaction.id,
            TransactionUpdate {
                amount: Some(Decimal::new(99, 0)),
                ..Default::default()
            },
        );

        assert!(matches!(result, Err(Error::NotFound)));
        assert_eq!(store.find_by_owner(&owner).unwrap(), vec![transaction]);
    }

    #[test]
    fn update_of_missing_transaction_is_not_found() {
        let store = get_store();

        let result = store.update_by_owner_and_id(
            &OwnerId::new("owner-1"),
            1337,
            TransactionUpdate::default(),
        );

        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[test]
    fn delete_removes_transaction() {
        let store = get_store();
        let owner = OwnerId::new("owner-1");
        let transaction = store
            .insert(&owner, new_expense(5, date!(2025 - 01 - 10), "Coffee"))
            .unwrap();

        store.delete_by_owner_and_id(&owner, transaction.id).unwrap();

        assert!(store.find_by_owner(&owner).unwrap().is_empty());
    }

    #[test]
    fn delete_of_other_owners_transaction_is_not_found() {
        let store = get_store();
        let owner = OwnerId::new("owner-1");
        let transaction = store
            .insert(&owner, new_expense(5, date!(2025 - 01 - 10), "Coffee"))
            .unwrap();

        let result = store.delete_by_owner_and_id(&OwnerId::new("owner-2"), transaction.id);

        assert!(matches!(result, Err(Error::NotFound)));
        assert_eq!(store.find_by_owner(&owner).unwrap(), vec![transaction]);
    }
}
