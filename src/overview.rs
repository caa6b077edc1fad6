//! The overview endpoint: a single response assembling the user's pots,
//! budgets and the aggregate transaction views.

use std::collections::HashMap;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::Claims,
    budget::{Budget, BudgetView, get_budgets_by_user},
    money,
    pot::{Pot, PotView, get_pots_by_user},
    transaction::{
        Transaction, TransactionView,
        aggregation::{budget_spending, expenses, income, recent_transactions, recurring_bills},
        get_transactions_by_user,
    },
};

/// Everything the overview page needs in one response.
#[derive(Debug, Serialize, Deserialize)]
pub struct Overview {
    /// The user's savings pots.
    pub pots: Vec<PotView>,
    /// The user's budgets.
    pub budgets: Vec<BudgetView>,
    /// The transactions where money was earned.
    pub income: Vec<TransactionView>,
    /// The transactions where money was spent.
    pub expenses: Vec<TransactionView>,
    /// The 5 latest transactions, newest first.
    pub recent_transactions: Vec<TransactionView>,
    /// The transactions flagged as recurring bills.
    pub recurring_bills: Vec<TransactionView>,
    /// Summed spending per budgeted category, as decimals.
    pub budget_spending: HashMap<String, f64>,
}

/// A route handler for the overview of the user's finances.
pub async fn get_overview(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Overview>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let pots = get_pots_by_user(claims.user_id(), &connection)?;
    let budgets = get_budgets_by_user(claims.user_id(), &connection)?;
    let transactions = get_transactions_by_user(claims.user_id(), &connection)?;

    let spending = budget_spending(&transactions, &budgets)
        .into_iter()
        .map(|(category, amount)| (category, money::to_decimal(amount)))
        .collect();

    Ok(Json(Overview {
        pots: pots.iter().map(Pot::to_view).collect(),
        budgets: budgets.iter().map(Budget::to_view).collect(),
        income: to_views(&income(&transactions)),
        expenses: to_views(&expenses(&transactions)),
        recent_transactions: to_views(&recent_transactions(&transactions)),
        recurring_bills: to_views(&recurring_bills(&transactions)),
        budget_spending: spending,
    }))
}

fn to_views(transactions: &[Transaction]) -> Vec<TransactionView> {
    transactions.iter().map(Transaction::to_view).collect()
}

#[cfg(test)]
mod endpoint_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::{Duration, macros::datetime};

    use crate::{
        AppState, UserId,
        auth::encode_token,
        budget::{NewBudget, create_budget},
        build_router,
        endpoints,
        pot::{NewPot, create_pot},
        transaction::{NewTransaction, create_transaction},
    };

    use super::Overview;

    const TEST_SECRET: &str = "gvmtwxqudbslcjor";

    fn get_test_server() -> (TestServer, AppState) {
        let state = AppState::new(Connection::open_in_memory().unwrap(), TEST_SECRET).unwrap();
        let server =
            TestServer::new(build_router(state.clone())).expect("Could not create test server.");

        (server, state)
    }

    fn seed(state: &AppState, user_id: i64) {
        let connection = state.db_connection.lock().unwrap();
        let user_id = UserId::new(user_id);

        create_pot(
            NewPot {
                user_id,
                name: "Holiday".to_owned(),
                target: 200000,
                total: 15000,
                theme: "#277C78".to_owned(),
            },
            &connection,
        )
        .unwrap();
        create_budget(
            NewBudget {
                user_id,
                category: "Bills".to_owned(),
                maximum: 50000,
                theme: "#626070".to_owned(),
            },
            &connection,
        )
        .unwrap();

        let fixtures = [
            ("Salary", "General", 350000, false),
            ("Aqua Flow Utilities", "Bills", -9550, true),
            ("Coffee", "Dining Out", -450, false),
        ];
        for (days, (name, category, amount, recurring)) in fixtures.into_iter().enumerate() {
            create_transaction(
                NewTransaction {
                    user_id,
                    name: name.to_owned(),
                    category: category.to_owned(),
                    date: datetime!(2024-08-01 00:00 UTC) + Duration::days(days as i64),
                    amount,
                    recurring,
                    avatar: "avatars/default.jpg".to_owned(),
                },
                &connection,
            )
            .unwrap();
        }
    }

    #[tokio::test]
    async fn overview_requires_authentication() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::OVERVIEW).await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn overview_assembles_every_section() {
        let (server, state) = get_test_server();
        seed(&state, 1);

        let response = server
            .get(endpoints::OVERVIEW)
            .authorization_bearer(encode_token(UserId::new(1), TEST_SECRET))
            .await;

        response.assert_status_ok();
        let overview: Overview = response.json();
        assert_eq!(overview.pots.len(), 1);
        assert_eq!(overview.budgets.len(), 1);
        assert_eq!(overview.income.len(), 1);
        assert_eq!(overview.expenses.len(), 2);
        assert_eq!(overview.recent_transactions.len(), 3);
        assert_eq!(overview.recurring_bills.len(), 1);
        assert_eq!(overview.budget_spending["Bills"], -95.50);
        assert!(!overview.budget_spending.contains_key("Dining Out"));
    }

    #[tokio::test]
    async fn overview_is_scoped_to_the_authenticated_user() {
        let (server, state) = get_test_server();
        seed(&state, 1);

        let response = server
            .get(endpoints::OVERVIEW)
            .authorization_bearer(encode_token(UserId::new(2), TEST_SECRET))
            .await;

        response.assert_status_ok();
        let overview: Overview = response.json();
        assert!(overview.pots.is_empty());
        assert!(overview.budgets.is_empty());
        assert!(overview.recent_transactions.is_empty());
        assert!(overview.budget_spending.is_empty());
    }

    #[tokio::test]
    async fn recent_transactions_are_newest_first() {
        let (server, state) = get_test_server();
        seed(&state, 1);

        let response = server
            .get(endpoints::OVERVIEW)
            .authorization_bearer(encode_token(UserId::new(1), TEST_SECRET))
            .await;

        let overview: Overview = response.json();
        assert_eq!(overview.recent_transactions[0].name, "Coffee");
        assert_eq!(overview.recent_transactions[2].name, "Salary");
    }
}
