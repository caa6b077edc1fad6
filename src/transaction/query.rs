//! The transaction listing engine: category filter, free-text search, sort
//! order and page windowing over a snapshot of a user's transactions.
//!
//! The engine is a pure function; it never touches the database and never
//! mutates the snapshot it is given.

use crate::transaction::Transaction;

/// The number of transactions per page.
pub const PAGE_SIZE: usize = 10;

/// The category filter value that keeps every transaction.
pub const ALL_CATEGORIES: &str = "All";

/// The orderings a client may request for a transaction listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Date descending.
    Latest,
    /// Date ascending.
    Oldest,
    /// Name ascending.
    NameAscending,
    /// Name descending.
    NameDescending,
    /// Amount descending.
    Highest,
    /// Amount ascending.
    Lowest,
}

impl SortKey {
    /// Parse the sort key from its wire representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Latest" => Some(Self::Latest),
            "Oldest" => Some(Self::Oldest),
            "A-Z" => Some(Self::NameAscending),
            "Z-A" => Some(Self::NameDescending),
            "Highest" => Some(Self::Highest),
            "Lowest" => Some(Self::Lowest),
            _ => None,
        }
    }
}

/// The result of running a listing query.
///
/// An out-of-range page and an unrecognized sort key both collapse to the
/// same no-content reply on the wire, but they stay distinct here so the
/// caller can log which one happened.
#[derive(Debug, PartialEq)]
pub enum QueryOutcome {
    /// A non-empty page of transactions.
    Page {
        /// The transactions on the requested page, in the requested order.
        transactions: Vec<Transaction>,
        /// How many pages the filtered set spans.
        num_pages: u64,
    },
    /// The requested page is outside `[1, num_pages]`; this includes page 1
    /// of an empty filtered set (where `num_pages` is 0).
    EmptyPage {
        /// How many pages the filtered set spans.
        num_pages: u64,
    },
    /// The sort key did not match any known ordering.
    UnknownSortKey,
}

/// Filter, sort and paginate a snapshot of a user's transactions.
///
/// The category filter (exact match unless `category` is `"All"`) and the
/// case-insensitive substring search on the transaction name compose
/// conjunctively. Pages are 1-based and hold [PAGE_SIZE] transactions.
///
/// Ordering is deterministic: transactions that compare equal under the
/// requested sort key fall back to id ascending.
pub fn query_transactions(
    transactions: Vec<Transaction>,
    category: &str,
    search_term: Option<&str>,
    sort_key: &str,
    page: u64,
) -> QueryOutcome {
    let sort_key = match SortKey::parse(sort_key) {
        Some(sort_key) => sort_key,
        None => return QueryOutcome::UnknownSortKey,
    };

    let mut filtered: Vec<Transaction> = transactions
        .into_iter()
        .filter(|transaction| category == ALL_CATEGORIES || transaction.category == category)
        .collect();

    if let Some(term) = search_term {
        if !term.is_empty() {
            let term = term.to_lowercase();
            filtered.retain(|transaction| transaction.name.to_lowercase().contains(&term));
        }
    }

    filtered.sort_by(|a, b| {
        let ordering = match sort_key {
            SortKey::Latest => b.date.cmp(&a.date),
            SortKey::Oldest => a.date.cmp(&b.date),
            SortKey::NameAscending => a.name.cmp(&b.name),
            SortKey::NameDescending => b.name.cmp(&a.name),
            SortKey::Highest => b.amount.cmp(&a.amount),
            SortKey::Lowest => a.amount.cmp(&b.amount),
        };

        ordering.then(a.id.cmp(&b.id))
    });

    let num_pages = (filtered.len() as u64).div_ceil(PAGE_SIZE as u64);

    if page == 0 || page > num_pages {
        return QueryOutcome::EmptyPage { num_pages };
    }

    let start = (page as usize - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(filtered.len());

    QueryOutcome::Page {
        transactions: filtered[start..end].to_vec(),
        num_pages,
    }
}
