//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, UserId, money};

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The sign of `amount` encodes the direction: negative amounts are
/// expenses, positive amounts are income. A zero amount is rejected by
/// validation before a transaction is ever persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: i64,
    /// The user that owns this transaction.
    pub user_id: UserId,
    /// The name of the counterparty, e.g. "Aqua Flow Utilities".
    pub name: String,
    /// The category the transaction belongs to, matched against budget
    /// categories by plain string equality.
    pub category: String,
    /// When the transaction happened.
    pub date: OffsetDateTime,
    /// The amount of money in signed minor units (cents).
    pub amount: i64,
    /// Whether this transaction is a recurring bill.
    pub recurring: bool,
    /// A reference to the counterparty's avatar image.
    pub avatar: String,
}

impl Transaction {
    /// The serialized view of this transaction: the owner is omitted and the
    /// amount is re-expanded to a decimal.
    pub fn to_view(&self) -> TransactionView {
        TransactionView {
            id: self.id,
            name: self.name.clone(),
            category: self.category.clone(),
            date: self.date,
            amount: money::to_decimal(self.amount),
            recurring: self.recurring,
            avatar: self.avatar.clone(),
        }
    }
}

/// The shape a transaction takes in API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    /// The ID of the transaction.
    pub id: i64,
    /// The name of the counterparty.
    pub name: String,
    /// The category the transaction belongs to.
    pub category: String,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// The amount as a decimal, e.g. `-95.50`.
    pub amount: f64,
    /// Whether this transaction is a recurring bill.
    pub recurring: bool,
    /// A reference to the counterparty's avatar image.
    pub avatar: String,
}

/// The fields needed to create a new [Transaction].
///
/// `amount` is already in minor units: callers normalize user-entered
/// decimals exactly once, before building this record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The user that will own the transaction.
    pub user_id: UserId,
    /// The name of the counterparty.
    pub name: String,
    /// The category the transaction belongs to.
    pub category: String,
    /// When the transaction happened.
    pub date: OffsetDateTime,
    /// The amount in signed minor units.
    pub amount: i64,
    /// Whether this transaction is a recurring bill.
    pub recurring: bool,
    /// A reference to the counterparty's avatar image.
    pub avatar: String,
}

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, name, category, date, amount, recurring, avatar)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, name, category, date, amount, recurring, avatar",
        )?
        .query_row(
            (
                new_transaction.user_id.as_i64(),
                new_transaction.name,
                new_transaction.category,
                new_transaction.date,
                new_transaction.amount,
                new_transaction.recurring,
                new_transaction.avatar,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction owned by `user_id` from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by the user,
/// - or [Error::Sql] if there is some other SQL error.
pub fn get_transaction(
    id: i64,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, category, date, amount, recurring, avatar
             FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound {
                entity: "transaction",
                id,
            },
            error => error.into(),
        })
}

/// Delete a transaction owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by the user,
/// - or [Error::Sql] if there is some other SQL error.
pub fn delete_transaction(id: i64, user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
        &[(":id", &id), (":user_id", &user_id.as_i64())],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "transaction",
            id,
        });
    }

    Ok(())
}

/// Retrieve the snapshot of all transactions owned by `user_id`, in id
/// order.
///
/// The query and aggregation engines are read-only views over this
/// snapshot; they never write back.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn get_transactions_by_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, category, date, amount, recurring, avatar
             FROM \"transaction\" WHERE user_id = :user_id ORDER BY id",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserId::new(row.get(1)?),
        name: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        amount: row.get(5)?,
        recurring: row.get(6)?,
        avatar: row.get(7)?,
    })
}
