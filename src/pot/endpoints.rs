//! Route handlers for savings pots.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    auth::Claims,
    money,
    pot::{
        NewPot, Pot, PotView, balance,
        core::{create_pot, delete_pot, get_pot, get_pots_by_user, update_pot},
    },
    validation::validate_pot,
};

/// A route handler for listing the user's pots.
pub async fn get_pots(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<PotView>>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let pots = get_pots_by_user(claims.user_id(), &connection)?;

    Ok(Json(pots.iter().map(Pot::to_view).collect()))
}

/// The payload for creating a pot. Amounts arrive as decimals and are
/// normalized to minor units at this boundary.
#[derive(Debug, Deserialize)]
pub struct CreatePot {
    /// The name of the savings goal.
    pub name: String,
    /// The target as a decimal, e.g. `2000.00`.
    pub target: f64,
    /// The starting total as a decimal. Defaults to 0.
    #[serde(default)]
    pub total: f64,
    /// The display theme.
    pub theme: String,
}

/// A route handler for creating a new pot.
pub async fn create_pot_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<CreatePot>,
) -> Result<(StatusCode, Json<PotView>), Error> {
    let target = money::to_minor_units(payload.target);
    let total = money::to_minor_units(payload.total);
    validate_pot(target, total)?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let pot = create_pot(
        NewPot {
            user_id: claims.user_id(),
            name: payload.name,
            target,
            total,
            theme: payload.theme,
        },
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(pot.to_view())))
}

/// A route handler for reading a single pot.
pub async fn get_pot_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(pot_id): Path<i64>,
) -> Result<Json<PotView>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let pot = get_pot(pot_id, claims.user_id(), &connection)?;

    Ok(Json(pot.to_view()))
}

/// The payload for updating a pot's editable fields. The stored total is
/// not editable here; it only moves through deposits and withdrawals.
#[derive(Debug, Deserialize)]
pub struct UpdatePot {
    /// The name of the savings goal.
    pub name: String,
    /// The target as a decimal.
    pub target: f64,
    /// The display theme.
    pub theme: String,
}

/// A route handler for overwriting a pot's name, target and theme.
///
/// The invariants are re-checked against the stored total, so the target
/// cannot be lowered beneath the money already saved.
pub async fn update_pot_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(pot_id): Path<i64>,
    Json(payload): Json<UpdatePot>,
) -> Result<Json<PotView>, Error> {
    let target = money::to_minor_units(payload.target);

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let pot = get_pot(pot_id, claims.user_id(), &connection)?;
    validate_pot(target, pot.total)?;

    let updated = update_pot(
        pot_id,
        claims.user_id(),
        &payload.name,
        target,
        &payload.theme,
        &connection,
    )?;

    Ok(Json(updated.to_view()))
}

/// A route handler for deleting a pot.
pub async fn delete_pot_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(pot_id): Path<i64>,
) -> Result<Json<serde_json::Value>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    delete_pot(pot_id, claims.user_id(), &connection)?;

    Ok(Json(json!({ "message": "Pot deleted!" })))
}

/// The payload for moving money in or out of a pot.
#[derive(Debug, Deserialize)]
pub struct BalanceChange {
    /// How much money to move, as a decimal, e.g. `50.00`.
    pub amount: f64,
}

/// A route handler for adding money to a pot.
pub async fn deposit_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(pot_id): Path<i64>,
    Json(payload): Json<BalanceChange>,
) -> Result<Json<PotView>, Error> {
    let amount = money::to_minor_units(payload.amount);

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let pot = balance::deposit(pot_id, claims.user_id(), amount, &connection)?;

    Ok(Json(pot.to_view()))
}

/// A route handler for taking money out of a pot.
pub async fn withdraw_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(pot_id): Path<i64>,
    Json(payload): Json<BalanceChange>,
) -> Result<Json<PotView>, Error> {
    let amount = money::to_minor_units(payload.amount);

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let pot = balance::withdraw(pot_id, claims.user_id(), amount, &connection)?;

    Ok(Json(pot.to_view()))
}

#[cfg(test)]
mod endpoint_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        AppState, UserId,
        auth::encode_token,
        build_router,
        endpoints::{self, format_endpoint},
        pot::PotView,
    };

    const TEST_SECRET: &str = "pfjznqowyrhcbktd";

    fn get_test_server() -> (TestServer, AppState) {
        let state = AppState::new(Connection::open_in_memory().unwrap(), TEST_SECRET).unwrap();
        let server =
            TestServer::new(build_router(state.clone())).expect("Could not create test server.");

        (server, state)
    }

    fn bearer(user_id: i64) -> String {
        encode_token(UserId::new(user_id), TEST_SECRET)
    }

    async fn create_pot(server: &TestServer, user_id: i64, target: f64, total: f64) -> PotView {
        let response = server
            .post(endpoints::POTS)
            .authorization_bearer(bearer(user_id))
            .json(&json!({
                "name": "Holiday",
                "target": target,
                "total": total,
                "theme": "#277C78",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    #[tokio::test]
    async fn listing_requires_authentication() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::POTS).await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn create_and_list_round_trip() {
        let (server, _) = get_test_server();
        let created = create_pot(&server, 1, 2000.0, 150.0).await;

        let response = server
            .get(endpoints::POTS)
            .authorization_bearer(bearer(1))
            .await;

        response.assert_status_ok();
        let pots: Vec<PotView> = response.json();
        assert_eq!(pots, vec![created]);
    }

    #[tokio::test]
    async fn create_rejects_total_above_target() {
        let (server, _) = get_test_server();

        let response = server
            .post(endpoints::POTS)
            .authorization_bearer(bearer(1))
            .json(&json!({
                "name": "Holiday",
                "target": 100.0,
                "total": 150.0,
                "theme": "#277C78",
            }))
            .await;

        response.assert_status_bad_request();
        let errors: serde_json::Value = response.json();
        assert_eq!(errors["value"][0], "Total can't be higher than target");
    }

    #[tokio::test]
    async fn update_preserves_total_and_revalidates() {
        let (server, _) = get_test_server();
        let created = create_pot(&server, 1, 2000.0, 150.0).await;

        // Lowering the target beneath the saved total must fail.
        let response = server
            .put(&format_endpoint(endpoints::POT, created.id))
            .authorization_bearer(bearer(1))
            .json(&json!({
                "name": "Holiday",
                "target": 100.0,
                "theme": "#277C78",
            }))
            .await;
        response.assert_status_bad_request();

        let response = server
            .put(&format_endpoint(endpoints::POT, created.id))
            .authorization_bearer(bearer(1))
            .json(&json!({
                "name": "New Car",
                "target": 3000.0,
                "theme": "#626070",
            }))
            .await;
        response.assert_status_ok();
        let view: PotView = response.json();
        assert_eq!(view.name, "New Car");
        assert_eq!(view.target, 3000.0);
        assert_eq!(view.total, 150.0);
    }

    #[tokio::test]
    async fn deposit_and_withdraw_move_the_balance() {
        let (server, _) = get_test_server();
        let created = create_pot(&server, 1, 2000.0, 150.0).await;

        let response = server
            .put(&format_endpoint(endpoints::POT_DEPOSIT, created.id))
            .authorization_bearer(bearer(1))
            .json(&json!({ "amount": 50.0 }))
            .await;
        response.assert_status_ok();
        let view: PotView = response.json();
        assert_eq!(view.total, 200.0);

        let response = server
            .put(&format_endpoint(endpoints::POT_WITHDRAW, created.id))
            .authorization_bearer(bearer(1))
            .json(&json!({ "amount": 75.5 }))
            .await;
        response.assert_status_ok();
        let view: PotView = response.json();
        assert_eq!(view.total, 124.5);
    }

    #[tokio::test]
    async fn overdraw_reports_a_total_field_error() {
        let (server, _) = get_test_server();
        let created = create_pot(&server, 1, 2000.0, 150.0).await;

        let response = server
            .put(&format_endpoint(endpoints::POT_WITHDRAW, created.id))
            .authorization_bearer(bearer(1))
            .json(&json!({ "amount": 200.0 }))
            .await;

        response.assert_status_bad_request();
        let errors: serde_json::Value = response.json();
        assert_eq!(errors["total"][0], "Total can't be negative");
    }

    #[tokio::test]
    async fn deposit_to_another_users_pot_is_not_found() {
        let (server, _) = get_test_server();
        let created = create_pot(&server, 1, 2000.0, 150.0).await;

        let response = server
            .put(&format_endpoint(endpoints::POT_DEPOSIT, created.id))
            .authorization_bearer(bearer(2))
            .json(&json!({ "amount": 50.0 }))
            .await;

        response.assert_status_not_found();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Object with pot id does not exist");
    }

    #[tokio::test]
    async fn delete_round_trip() {
        let (server, _) = get_test_server();
        let created = create_pot(&server, 1, 2000.0, 150.0).await;

        let response = server
            .delete(&format_endpoint(endpoints::POT, created.id))
            .authorization_bearer(bearer(1))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Pot deleted!");

        let response = server
            .get(&format_endpoint(endpoints::POT, created.id))
            .authorization_bearer(bearer(1))
            .await;
        response.assert_status_not_found();
    }
}
