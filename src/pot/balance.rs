//! The balance engine: moving money in and out of a pot.
//!
//! Deposits and withdrawals are read-modify-write. The write is a
//! conditional update guarded on the total that was read, so a total that
//! changed in between never gets silently overwritten.

use rusqlite::Connection;

use crate::{
    Error, UserId,
    pot::core::{Pot, get_pot, map_pot_row},
    validation::validate_pot,
};

/// Add `amount` minor units to the pot's total.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `pot_id` does not refer to a pot owned by the user,
/// - [Error::Validation] if the new total would exceed the target,
/// - [Error::BalanceConflict] if the stored total changed since it was read,
/// - or [Error::Sql] if there is some other SQL error.
pub fn deposit(
    pot_id: i64,
    user_id: UserId,
    amount: i64,
    connection: &Connection,
) -> Result<Pot, Error> {
    adjust_total(pot_id, user_id, amount, connection)
}

/// Subtract `amount` minor units from the pot's total.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `pot_id` does not refer to a pot owned by the user,
/// - [Error::Validation] if the new total would be negative,
/// - [Error::BalanceConflict] if the stored total changed since it was read,
/// - or [Error::Sql] if there is some other SQL error.
pub fn withdraw(
    pot_id: i64,
    user_id: UserId,
    amount: i64,
    connection: &Connection,
) -> Result<Pot, Error> {
    adjust_total(pot_id, user_id, -amount, connection)
}

fn adjust_total(
    pot_id: i64,
    user_id: UserId,
    delta: i64,
    connection: &Connection,
) -> Result<Pot, Error> {
    let pot = get_pot(pot_id, user_id, connection)?;
    let new_total = pot.total + delta;

    validate_pot(pot.target, new_total)?;

    commit_total(pot_id, user_id, pot.total, new_total, connection)
}

/// Write `new_total`, but only if the stored total still equals
/// `expected_total` (check-and-set on the balance).
fn commit_total(
    pot_id: i64,
    user_id: UserId,
    expected_total: i64,
    new_total: i64,
    connection: &Connection,
) -> Result<Pot, Error> {
    connection
        .prepare(
            "UPDATE pot SET total = ?1
             WHERE id = ?2 AND user_id = ?3 AND total = ?4
             RETURNING id, user_id, name, target, total, theme",
        )?
        .query_row(
            (new_total, pot_id, user_id.as_i64(), expected_total),
            map_pot_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::BalanceConflict,
            error => error.into(),
        })
}
