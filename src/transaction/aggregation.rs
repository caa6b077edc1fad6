//! Aggregate views derived from a snapshot of a user's transactions:
//! per-category budget spending, income/expense partitions and recurring
//! bills.
//!
//! Every function here is a read-only pass over the snapshot it is given;
//! re-running any of them on unchanged data yields identical output.

use std::collections::HashMap;

use crate::{budget::Budget, transaction::Transaction};

/// How many transactions the recent-transactions view holds.
const RECENT_TRANSACTION_COUNT: usize = 5;

/// Sum the amounts of `transactions` per budget category, in minor units.
///
/// Only categories present in `budgets` become keys; transactions in a
/// category without a budget are ignored. The sum is plain addition over
/// signed minor units, so income in a category nets against its expenses. A
/// budget whose category has no transactions maps to 0.
pub fn budget_spending(transactions: &[Transaction], budgets: &[Budget]) -> HashMap<String, i64> {
    let mut spending: HashMap<String, i64> = budgets
        .iter()
        .map(|budget| (budget.category.clone(), 0))
        .collect();

    for transaction in transactions {
        if let Some(total) = spending.get_mut(&transaction.category) {
            *total += transaction.amount;
        }
    }

    spending
}

/// Sum the amounts of `transactions` in one explicit `category`, in minor
/// units. Unlike [budget_spending], no matching budget needs to exist.
pub fn category_spending(transactions: &[Transaction], category: &str) -> i64 {
    transactions
        .iter()
        .filter(|transaction| transaction.category == category)
        .map(|transaction| transaction.amount)
        .sum()
}

/// The 5 transactions with the latest dates, newest first.
///
/// Transactions on the same date order by id ascending, matching the
/// listing engine's tie-break.
pub fn recent_transactions(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
    sorted.truncate(RECENT_TRANSACTION_COUNT);

    sorted
}

/// The transactions where money was earned (`amount > 0`).
pub fn income(transactions: &[Transaction]) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.amount > 0)
        .cloned()
        .collect()
}

/// The transactions where money was spent (`amount < 0`).
pub fn expenses(transactions: &[Transaction]) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.amount < 0)
        .cloned()
        .collect()
}

/// The transactions flagged as recurring bills.
pub fn recurring_bills(transactions: &[Transaction]) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.recurring)
        .cloned()
        .collect()
}
