//! Route handlers for listing, creating, reading and deleting transactions.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::Claims,
    money,
    transaction::{
        NewTransaction, Transaction, TransactionView,
        aggregation::recurring_bills,
        core::{
            create_transaction, delete_transaction, get_transaction, get_transactions_by_user,
        },
        query::{ALL_CATEGORIES, QueryOutcome, query_transactions},
    },
    validation::validate_transaction,
};

/// The query parameters accepted by the transaction listing endpoint.
#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    /// The category to restrict the listing to, or "All".
    #[serde(default = "default_category")]
    pub category: String,
    /// A free-text search term matched case-insensitively against names.
    pub search: Option<String>,
    /// The requested ordering, e.g. "Latest" or "A-Z".
    #[serde(default = "default_sort")]
    pub sort: String,
    /// The 1-based page number.
    #[serde(default = "default_page")]
    pub page: u64,
}

fn default_category() -> String {
    ALL_CATEGORIES.to_owned()
}

fn default_sort() -> String {
    "Latest".to_owned()
}

fn default_page() -> u64 {
    1
}

/// One page of a transaction listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionPage {
    /// The transactions on the requested page.
    pub page_list: Vec<TransactionView>,
    /// How many pages the filtered set spans.
    pub num_pages: u64,
}

/// A route handler for the filtered, sorted and paginated transaction
/// listing.
///
/// An out-of-range page and an unrecognized sort key both produce the same
/// no-content reply (an empty page list plus the page count); the
/// distinction is only logged.
pub async fn get_transactions(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<TransactionListQuery>,
) -> Result<Response, Error> {
    let transactions = {
        let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
        get_transactions_by_user(claims.user_id(), &connection)?
    };

    let outcome = query_transactions(
        transactions,
        &params.category,
        params.search.as_deref(),
        &params.sort,
        params.page,
    );

    let response = match outcome {
        QueryOutcome::Page {
            transactions,
            num_pages,
        } => {
            let page_list = transactions.iter().map(Transaction::to_view).collect();
            (
                StatusCode::OK,
                Json(TransactionPage {
                    page_list,
                    num_pages,
                }),
            )
                .into_response()
        }
        QueryOutcome::EmptyPage { num_pages } => {
            tracing::debug!("page {} is out of range ({num_pages} pages)", params.page);
            empty_page_response(num_pages)
        }
        QueryOutcome::UnknownSortKey => {
            tracing::debug!("unrecognized sort key {:?}", params.sort);
            empty_page_response(0)
        }
    };

    Ok(response)
}

fn empty_page_response(num_pages: u64) -> Response {
    (
        StatusCode::NO_CONTENT,
        Json(TransactionPage {
            page_list: Vec::new(),
            num_pages,
        }),
    )
        .into_response()
}

/// A route handler for the user's recurring bills.
pub async fn get_recurring_transactions(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<TransactionView>>, Error> {
    let transactions = {
        let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
        get_transactions_by_user(claims.user_id(), &connection)?
    };

    let views = recurring_bills(&transactions)
        .iter()
        .map(Transaction::to_view)
        .collect();

    Ok(Json(views))
}

/// The payload for creating a transaction.
///
/// The amount arrives as a decimal, e.g. `-95.50`, and is normalized to
/// minor units exactly once, here at the input boundary.
#[derive(Debug, Deserialize)]
pub struct CreateTransaction {
    /// The name of the counterparty.
    pub name: String,
    /// The category the transaction belongs to.
    pub category: String,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// The signed decimal amount; negative for expenses.
    pub amount: f64,
    /// Whether this transaction is a recurring bill.
    pub recurring: bool,
    /// A reference to the counterparty's avatar image.
    pub avatar: String,
}

/// A route handler for creating a new transaction.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<CreateTransaction>,
) -> Result<(StatusCode, Json<TransactionView>), Error> {
    let amount = money::to_minor_units(payload.amount);
    validate_transaction(&payload.name, &payload.avatar, &payload.category, amount)?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let transaction = create_transaction(
        NewTransaction {
            user_id: claims.user_id(),
            name: payload.name,
            category: payload.category,
            date: payload.date,
            amount,
            recurring: payload.recurring,
            avatar: payload.avatar,
        },
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(transaction.to_view())))
}

/// A route handler for reading a single transaction.
pub async fn get_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<i64>,
) -> Result<Json<TransactionView>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let transaction = get_transaction(transaction_id, claims.user_id(), &connection)?;

    Ok(Json(transaction.to_view()))
}

/// A route handler for deleting a transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<i64>,
) -> Result<Json<serde_json::Value>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    delete_transaction(transaction_id, claims.user_id(), &connection)?;

    Ok(Json(json!({ "message": "Transaction deleted!" })))
}
