//! Defines the core data model and database queries for savings pots.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, UserId, money};

/// A savings goal: money set aside towards a target amount.
///
/// `0 <= total <= target` holds after every successful mutation; the
/// invariants are checked before any write is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Pot {
    /// The ID of the pot.
    pub id: i64,
    /// The user that owns this pot.
    pub user_id: UserId,
    /// The name of the savings goal, e.g. "Holiday".
    pub name: String,
    /// The target amount in minor units (cents). Never negative.
    pub target: i64,
    /// The amount saved so far, in minor units.
    pub total: i64,
    /// The display theme, e.g. a hex color like "#277C78".
    pub theme: String,
}

impl Pot {
    /// The serialized view of this pot: the owner is omitted and the
    /// amounts are re-expanded to decimals.
    pub fn to_view(&self) -> PotView {
        PotView {
            id: self.id,
            name: self.name.clone(),
            target: money::to_decimal(self.target),
            total: money::to_decimal(self.total),
            theme: self.theme.clone(),
        }
    }
}

/// The shape a pot takes in API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotView {
    /// The ID of the pot.
    pub id: i64,
    /// The name of the savings goal.
    pub name: String,
    /// The target as a decimal, e.g. `2000.00`.
    pub target: f64,
    /// The amount saved so far, as a decimal.
    pub total: f64,
    /// The display theme.
    pub theme: String,
}

/// The fields needed to create a new [Pot]. Amounts are already in minor
/// units.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPot {
    /// The user that will own the pot.
    pub user_id: UserId,
    /// The name of the savings goal.
    pub name: String,
    /// The target amount in minor units.
    pub target: i64,
    /// The starting total in minor units.
    pub total: i64,
    /// The display theme.
    pub theme: String,
}

/// Create a new pot in the database.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn create_pot(new_pot: NewPot, connection: &Connection) -> Result<Pot, Error> {
    let pot = connection
        .prepare(
            "INSERT INTO pot (user_id, name, target, total, theme)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, name, target, total, theme",
        )?
        .query_row(
            (
                new_pot.user_id.as_i64(),
                new_pot.name,
                new_pot.target,
                new_pot.total,
                new_pot.theme,
            ),
            map_pot_row,
        )?;

    Ok(pot)
}

/// Retrieve a pot owned by `user_id` from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a pot owned by the user,
/// - or [Error::Sql] if there is some other SQL error.
pub fn get_pot(id: i64, user_id: UserId, connection: &Connection) -> Result<Pot, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, target, total, theme
             FROM pot WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(&[(":id", &id), (":user_id", &user_id.as_i64())], map_pot_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound { entity: "pot", id },
            error => error.into(),
        })
}

/// Retrieve all pots owned by `user_id`, in id order.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn get_pots_by_user(user_id: UserId, connection: &Connection) -> Result<Vec<Pot>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, target, total, theme
             FROM pot WHERE user_id = :user_id ORDER BY id",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_pot_row)?
        .map(|maybe_pot| maybe_pot.map_err(Error::from))
        .collect()
}

/// Overwrite the name, target and theme of a pot owned by `user_id`. The
/// stored total is preserved; callers re-validate the invariants against the
/// new target before calling this.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a pot owned by the user,
/// - or [Error::Sql] if there is some other SQL error.
pub fn update_pot(
    id: i64,
    user_id: UserId,
    name: &str,
    target: i64,
    theme: &str,
    connection: &Connection,
) -> Result<Pot, Error> {
    connection
        .prepare(
            "UPDATE pot SET name = ?1, target = ?2, theme = ?3
             WHERE id = ?4 AND user_id = ?5
             RETURNING id, user_id, name, target, total, theme",
        )?
        .query_row((name, target, theme, id, user_id.as_i64()), map_pot_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound { entity: "pot", id },
            error => error.into(),
        })
}

/// Delete a pot owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a pot owned by the user,
/// - or [Error::Sql] if there is some other SQL error.
pub fn delete_pot(id: i64, user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM pot WHERE id = :id AND user_id = :user_id",
        &[(":id", &id), (":user_id", &user_id.as_i64())],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound { entity: "pot", id });
    }

    Ok(())
}

pub(super) fn map_pot_row(row: &Row) -> Result<Pot, rusqlite::Error> {
    Ok(Pot {
        id: row.get(0)?,
        user_id: UserId::new(row.get(1)?),
        name: row.get(2)?,
        target: row.get(3)?,
        total: row.get(4)?,
        theme: row.get(5)?,
    })
}
