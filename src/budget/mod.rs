//! Budgets: a per-category spending cap with a display theme, plus the
//! spending views derived from the matching transactions.

mod core;
mod endpoints;

pub use core::{
    Budget, BudgetView, NewBudget, create_budget, delete_budget, get_budget, get_budgets_by_user,
    update_budget,
};
pub use endpoints::{
    create_budget_endpoint, delete_budget_endpoint, get_budget_endpoint, get_budget_spending,
    get_budget_spending_total, get_budgets, update_budget_endpoint,
};
