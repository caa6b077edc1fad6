//! Transactions: the model, database functions, the listing/filtering/
//! search/pagination engine and the aggregate views derived from a user's
//! transaction set.

pub mod aggregation;
mod core;
mod endpoints;
pub mod query;

pub use core::{
    NewTransaction, Transaction, TransactionView, create_transaction, delete_transaction,
    get_transaction, get_transactions_by_user,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, get_recurring_transactions,
    get_transaction_endpoint, get_transactions,
};
