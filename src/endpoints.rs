//! The API endpoint URIs.
//!
//! For endpoints that take an ID parameter, e.g. '/api/pots/{pot_id}', use
//! [format_endpoint].

/// The overview of the user's pots, budgets and transaction aggregates.
pub const OVERVIEW: &str = "/api/overview";
/// The route for listing (filtered, paginated) and creating transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the user's recurring bills.
pub const RECURRING_TRANSACTIONS: &str = "/api/transactions/recurring";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for listing and creating budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route to access a single budget.
pub const BUDGET: &str = "/api/budgets/{budget_id}";
/// The legacy spending view: up to the 3 most recent transactions in a category.
pub const BUDGET_SPENDING: &str = "/api/budgets/spending/{category}";
/// The uncapped spending sum for a category.
pub const BUDGET_SPENDING_TOTAL: &str = "/api/budgets/spending/{category}/total";
/// The route for listing and creating pots.
pub const POTS: &str = "/api/pots";
/// The route to access a single pot.
pub const POT: &str = "/api/pots/{pot_id}";
/// The route for adding money to a pot.
pub const POT_DEPOSIT: &str = "/api/pots/{pot_id}/deposit";
/// The route for taking money out of a pot.
pub const POT_WITHDRAW: &str = "/api/pots/{pot_id}/withdraw";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/pots/{pot_id}', '{pot_id}' is the
/// parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
