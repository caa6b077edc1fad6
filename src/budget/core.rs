//! Defines the core data model and database queries for budgets.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, UserId, money};

/// A spending cap for one transaction category.
///
/// The category is matched against transaction categories by plain string
/// equality. One budget per (user, category) is the convention but is not
/// enforced by the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    /// The ID of the budget.
    pub id: i64,
    /// The user that owns this budget.
    pub user_id: UserId,
    /// The category the cap applies to.
    pub category: String,
    /// The cap in minor units (cents). Never negative.
    pub maximum: i64,
    /// The display theme, e.g. a hex color like "#277C78".
    pub theme: String,
}

impl Budget {
    /// The serialized view of this budget: the owner is omitted and the
    /// maximum is re-expanded to a decimal.
    pub fn to_view(&self) -> BudgetView {
        BudgetView {
            id: self.id,
            category: self.category.clone(),
            maximum: money::to_decimal(self.maximum),
            theme: self.theme.clone(),
        }
    }
}

/// The shape a budget takes in API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetView {
    /// The ID of the budget.
    pub id: i64,
    /// The category the cap applies to.
    pub category: String,
    /// The cap as a decimal, e.g. `50.00`.
    pub maximum: f64,
    /// The display theme.
    pub theme: String,
}

/// The fields needed to create a new [Budget]. `maximum` is already in
/// minor units.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    /// The user that will own the budget.
    pub user_id: UserId,
    /// The category the cap applies to.
    pub category: String,
    /// The cap in minor units.
    pub maximum: i64,
    /// The display theme.
    pub theme: String,
}

/// Create a new budget in the database.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn create_budget(new_budget: NewBudget, connection: &Connection) -> Result<Budget, Error> {
    let budget = connection
        .prepare(
            "INSERT INTO budget (user_id, category, maximum, theme)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, user_id, category, maximum, theme",
        )?
        .query_row(
            (
                new_budget.user_id.as_i64(),
                new_budget.category,
                new_budget.maximum,
                new_budget.theme,
            ),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Retrieve a budget owned by `user_id` from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a budget owned by the user,
/// - or [Error::Sql] if there is some other SQL error.
pub fn get_budget(id: i64, user_id: UserId, connection: &Connection) -> Result<Budget, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, maximum, theme
             FROM budget WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_budget_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound {
                entity: "budget",
                id,
            },
            error => error.into(),
        })
}

/// Retrieve all budgets owned by `user_id`, in id order.
///
/// # Errors
/// This function will return an [Error::Sql] if there is an SQL error.
pub fn get_budgets_by_user(user_id: UserId, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, maximum, theme
             FROM budget WHERE user_id = :user_id ORDER BY id",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Overwrite the category, maximum and theme of a budget owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a budget owned by the user,
/// - or [Error::Sql] if there is some other SQL error.
pub fn update_budget(
    id: i64,
    user_id: UserId,
    category: &str,
    maximum: i64,
    theme: &str,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "UPDATE budget SET category = ?1, maximum = ?2, theme = ?3
             WHERE id = ?4 AND user_id = ?5
             RETURNING id, user_id, category, maximum, theme",
        )?
        .query_row(
            (category, maximum, theme, id, user_id.as_i64()),
            map_budget_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound {
                entity: "budget",
                id,
            },
            error => error.into(),
        })
}

/// Delete a budget owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a budget owned by the user,
/// - or [Error::Sql] if there is some other SQL error.
pub fn delete_budget(id: i64, user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE id = :id AND user_id = :user_id",
        &[(":id", &id), (":user_id", &user_id.as_i64())],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "budget",
            id,
        });
    }

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserId::new(row.get(1)?),
        category: row.get(2)?,
        maximum: row.get(3)?,
        theme: row.get(4)?,
    })
}
