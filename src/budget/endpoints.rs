//! Route handlers for budgets and the per-category spending views.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState, Error,
    auth::Claims,
    budget::{
        Budget, BudgetView, NewBudget,
        core::{create_budget, delete_budget, get_budget, get_budgets_by_user, update_budget},
    },
    money,
    transaction::{
        Transaction, TransactionView,
        aggregation::{budget_spending, category_spending},
        get_transactions_by_user,
    },
    validation::validate_budget,
};

/// How many transactions the legacy per-category spending view returns.
const SPENDING_TRANSACTION_COUNT: usize = 3;

/// The budget listing, paired with the current spending per budgeted
/// category.
#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetList {
    /// The user's budgets.
    pub budgets: Vec<BudgetView>,
    /// Summed spending per budgeted category, as decimals.
    pub budget_spending: HashMap<String, f64>,
}

/// A route handler for listing the user's budgets alongside their spending.
pub async fn get_budgets(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<BudgetList>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let budgets = get_budgets_by_user(claims.user_id(), &connection)?;
    let transactions = get_transactions_by_user(claims.user_id(), &connection)?;

    let spending = budget_spending(&transactions, &budgets)
        .into_iter()
        .map(|(category, amount)| (category, money::to_decimal(amount)))
        .collect();

    Ok(Json(BudgetList {
        budgets: budgets.iter().map(Budget::to_view).collect(),
        budget_spending: spending,
    }))
}

/// The payload for creating or updating a budget. The maximum arrives as a
/// decimal and is normalized to minor units at this boundary.
#[derive(Debug, Deserialize)]
pub struct UpsertBudget {
    /// The category the cap applies to.
    pub category: String,
    /// The cap as a decimal, e.g. `50.00`.
    pub maximum: f64,
    /// The display theme.
    pub theme: String,
}

/// A route handler for creating a new budget.
pub async fn create_budget_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<UpsertBudget>,
) -> Result<(StatusCode, Json<BudgetView>), Error> {
    let maximum = money::to_minor_units(payload.maximum);
    validate_budget(&payload.category, maximum, &payload.theme)?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let budget = create_budget(
        NewBudget {
            user_id: claims.user_id(),
            category: payload.category,
            maximum,
            theme: payload.theme,
        },
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(budget.to_view())))
}

/// A route handler for reading a single budget.
pub async fn get_budget_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<i64>,
) -> Result<Json<BudgetView>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let budget = get_budget(budget_id, claims.user_id(), &connection)?;

    Ok(Json(budget.to_view()))
}

/// A route handler for overwriting a budget's editable fields.
pub async fn update_budget_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<i64>,
    Json(payload): Json<UpsertBudget>,
) -> Result<Json<BudgetView>, Error> {
    let maximum = money::to_minor_units(payload.maximum);
    validate_budget(&payload.category, maximum, &payload.theme)?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let budget = update_budget(
        budget_id,
        claims.user_id(),
        &payload.category,
        maximum,
        &payload.theme,
        &connection,
    )?;

    Ok(Json(budget.to_view()))
}

/// A route handler for deleting a budget.
pub async fn delete_budget_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<i64>,
) -> Result<Json<serde_json::Value>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    delete_budget(budget_id, claims.user_id(), &connection)?;

    Ok(Json(json!({ "message": "Budget deleted!" })))
}

/// A route handler for the legacy per-category spending view: up to the 3
/// most recent transactions in `category`, newest first.
pub async fn get_budget_spending(
    State(state): State<AppState>,
    claims: Claims,
    Path(category): Path<String>,
) -> Result<Json<Vec<TransactionView>>, Error> {
    let transactions = {
        let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
        get_transactions_by_user(claims.user_id(), &connection)?
    };

    let mut matching: Vec<Transaction> = transactions
        .into_iter()
        .filter(|transaction| transaction.category == category)
        .collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
    matching.truncate(SPENDING_TRANSACTION_COUNT);

    Ok(Json(matching.iter().map(Transaction::to_view).collect()))
}

/// A route handler for the uncapped spending sum of one category, keyed by
/// the category name.
pub async fn get_budget_spending_total(
    State(state): State<AppState>,
    claims: Claims,
    Path(category): Path<String>,
) -> Result<Json<serde_json::Value>, Error> {
    let transactions = {
        let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
        get_transactions_by_user(claims.user_id(), &connection)?
    };

    let total = category_spending(&transactions, &category);

    Ok(Json(json!({ category: money::to_decimal(total) })))
}

#[cfg(test)]
mod endpoint_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;
    use time::{Duration, macros::datetime};

    use crate::{
        AppState, UserId,
        auth::encode_token,
        build_router,
        endpoints::{self, format_endpoint},
        transaction::{NewTransaction, TransactionView, create_transaction},
    };

    use super::BudgetList;

    const TEST_SECRET: &str = "kyxbdwsjrqhgvfum";

    fn get_test_server() -> (TestServer, AppState) {
        let state = AppState::new(Connection::open_in_memory().unwrap(), TEST_SECRET).unwrap();
        let server =
            TestServer::new(build_router(state.clone())).expect("Could not create test server.");

        (server, state)
    }

    fn bearer(user_id: i64) -> String {
        encode_token(UserId::new(user_id), TEST_SECRET)
    }

    fn insert_transaction(state: &AppState, user_id: i64, category: &str, amount: i64, days: i64) {
        let connection = state.db_connection.lock().unwrap();
        create_transaction(
            NewTransaction {
                user_id: UserId::new(user_id),
                name: format!("{category} counterparty"),
                category: category.to_owned(),
                date: datetime!(2024-08-01 00:00 UTC) + Duration::days(days),
                amount,
                recurring: false,
                avatar: "avatars/default.jpg".to_owned(),
            },
            &connection,
        )
        .expect("Could not insert test transaction");
    }

    async fn create_budget(server: &TestServer, user_id: i64, category: &str, maximum: f64) -> i64 {
        let response = server
            .post(endpoints::BUDGETS)
            .authorization_bearer(bearer(user_id))
            .json(&json!({
                "category": category,
                "maximum": maximum,
                "theme": "#277C78",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let view: crate::budget::BudgetView = response.json();
        view.id
    }

    #[tokio::test]
    async fn listing_requires_authentication() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::BUDGETS).await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn listing_pairs_budgets_with_decimal_spending() {
        let (server, state) = get_test_server();
        create_budget(&server, 1, "Bills", 1000.0).await;
        insert_transaction(&state, 1, "Bills", -9550, 1);
        insert_transaction(&state, 1, "Bills", -3500, 2);
        insert_transaction(&state, 1, "Transport", -2500, 3);

        let response = server
            .get(endpoints::BUDGETS)
            .authorization_bearer(bearer(1))
            .await;

        response.assert_status_ok();
        let list: BudgetList = response.json();
        assert_eq!(list.budgets.len(), 1);
        assert_eq!(list.budget_spending["Bills"], -130.50);
        assert!(!list.budget_spending.contains_key("Transport"));
    }

    #[tokio::test]
    async fn create_normalizes_decimal_maximum() {
        let (server, state) = get_test_server();

        let id = create_budget(&server, 1, "Entertainment", 50.0).await;

        let connection = state.db_connection.lock().unwrap();
        let stored_maximum: i64 = connection
            .query_row("SELECT maximum FROM budget WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(stored_maximum, 5000);
    }

    #[tokio::test]
    async fn create_rejects_negative_maximum() {
        let (server, _) = get_test_server();

        let response = server
            .post(endpoints::BUDGETS)
            .authorization_bearer(bearer(1))
            .json(&json!({
                "category": "Bills",
                "maximum": -10.0,
                "theme": "#277C78",
            }))
            .await;

        response.assert_status_bad_request();
        let errors: serde_json::Value = response.json();
        assert_eq!(errors["maximum"][0], "Maximum can't be negative");
    }

    #[tokio::test]
    async fn update_round_trips_through_the_view() {
        let (server, _) = get_test_server();
        let id = create_budget(&server, 1, "Bills", 50.0).await;

        let response = server
            .put(&format_endpoint(endpoints::BUDGET, id))
            .authorization_bearer(bearer(1))
            .json(&json!({
                "category": "Dining Out",
                "maximum": 75.0,
                "theme": "#626070",
            }))
            .await;

        response.assert_status_ok();
        let view: crate::budget::BudgetView = response.json();
        assert_eq!(view.category, "Dining Out");
        assert_eq!(view.maximum, 75.0);
    }

    #[tokio::test]
    async fn delete_is_scoped_to_the_owner() {
        let (server, _) = get_test_server();
        let id = create_budget(&server, 1, "Bills", 50.0).await;

        let response = server
            .delete(&format_endpoint(endpoints::BUDGET, id))
            .authorization_bearer(bearer(2))
            .await;
        response.assert_status_not_found();

        let response = server
            .delete(&format_endpoint(endpoints::BUDGET, id))
            .authorization_bearer(bearer(1))
            .await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn spending_view_caps_at_three_most_recent() {
        let (server, state) = get_test_server();
        for day in 1..=5 {
            insert_transaction(&state, 1, "Bills", -1000 * day, day);
        }

        let response = server
            .get("/api/budgets/spending/Bills")
            .authorization_bearer(bearer(1))
            .await;

        response.assert_status_ok();
        let views: Vec<TransactionView> = response.json();
        assert_eq!(views.len(), 3);
        assert!(views[0].date > views[1].date && views[1].date > views[2].date);
    }

    #[tokio::test]
    async fn spending_total_is_uncapped_and_keyed_by_category() {
        let (server, state) = get_test_server();
        for day in 1..=5 {
            insert_transaction(&state, 1, "Bills", -1000, day);
        }

        let response = server
            .get("/api/budgets/spending/Bills/total")
            .authorization_bearer(bearer(1))
            .await;

        response.assert_status_ok();
        let total: serde_json::Value = response.json();
        assert_eq!(total["Bills"], -50.0);
    }

    #[tokio::test]
    async fn spending_total_needs_no_matching_budget() {
        let (server, state) = get_test_server();
        insert_transaction(&state, 1, "Groceries", -4500, 1);

        let response = server
            .get("/api/budgets/spending/Groceries/total")
            .authorization_bearer(bearer(1))
            .await;

        response.assert_status_ok();
        let total: serde_json::Value = response.json();
        assert_eq!(total["Groceries"], -45.0);
    }
}
