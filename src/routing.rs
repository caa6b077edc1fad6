//! Assembles the application's routes into a router.

use axum::{
    Router,
    routing::{get, put},
};

use crate::{AppState, budget, endpoints, overview, pot, transaction};

/// Build the router for the JSON API.
///
/// Every route requires a valid bearer token; the token check lives in the
/// claims extractor, not here.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::OVERVIEW, get(overview::get_overview))
        .route(
            endpoints::TRANSACTIONS,
            get(transaction::get_transactions).post(transaction::create_transaction_endpoint),
        )
        .route(
            endpoints::RECURRING_TRANSACTIONS,
            get(transaction::get_recurring_transactions),
        )
        .route(
            endpoints::TRANSACTION,
            get(transaction::get_transaction_endpoint)
                .delete(transaction::delete_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            get(budget::get_budgets).post(budget::create_budget_endpoint),
        )
        .route(
            endpoints::BUDGET,
            get(budget::get_budget_endpoint)
                .put(budget::update_budget_endpoint)
                .delete(budget::delete_budget_endpoint),
        )
        .route(endpoints::BUDGET_SPENDING, get(budget::get_budget_spending))
        .route(
            endpoints::BUDGET_SPENDING_TOTAL,
            get(budget::get_budget_spending_total),
        )
        .route(
            endpoints::POTS,
            get(pot::get_pots).post(pot::create_pot_endpoint),
        )
        .route(
            endpoints::POT,
            get(pot::get_pot_endpoint)
                .put(pot::update_pot_endpoint)
                .delete(pot::delete_pot_endpoint),
        )
        .route(endpoints::POT_DEPOSIT, put(pot::deposit_endpoint))
        .route(endpoints::POT_WITHDRAW, put(pot::withdraw_endpoint))
        .with_state(state)
}
