//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use jsonwebtoken::DecodingKey;
use rusqlite::Connection;

use crate::db::initialize;

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The key for validating bearer tokens issued by the identity service.
    pub decoding_key: DecodingKey,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models. `token_secret` must match the secret the external
    /// identity service signs its tokens with.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, token_secret: &str) -> Result<Self, rusqlite::Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            decoding_key: DecodingKey::from_secret(token_secret.as_ref()),
        })
    }
}
