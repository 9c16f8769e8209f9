//! HTTP surface of the ledger.
//!
//! Every handler takes the body as raw [`Bytes`], runs it through the
//! [`AuthGuard`] and only then parses the very same buffer.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use rust_decimal::Decimal;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::{
    auth::{AuthError, AuthGuard},
    request::{DepositRequest, ParseError, WalletRequest},
    service::LedgerService,
    stats::MonthlyStats,
    store::{
        HistoryLedger, WalletStore,
        in_memory::{InMemoryHistoryLedger, InMemoryWalletStore},
    },
    wallet::LedgerError,
};

pub const USER_ID_HEADER: &str = "X-UserId";
pub const DIGEST_HEADER: &str = "X-Digest";

/// Shared handler state, generic over the same storage backends as [`LedgerService`].
pub struct AppState<W = InMemoryWalletStore, H = InMemoryHistoryLedger> {
    pub ledger: Arc<LedgerService<W, H>>,
    pub guard: Arc<AuthGuard>,
}

impl<W, H> AppState<W, H> {
    pub fn new(ledger: LedgerService<W, H>, guard: AuthGuard) -> Self {
        Self {
            ledger: Arc::new(ledger),
            guard: Arc::new(guard),
        }
    }
}

impl<W, H> Clone for AppState<W, H> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            guard: Arc::clone(&self.guard),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Parse(_) => StatusCode::BAD_REQUEST,
            ApiError::Ledger(LedgerError::WalletNotFound) => StatusCode::NOT_FOUND,
            ApiError::Ledger(LedgerError::InvalidAmount | LedgerError::LimitExceeded) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

pub fn create_router<W, H>(state: AppState<W, H>) -> Router
where
    W: WalletStore + 'static,
    H: HistoryLedger + 'static,
{
    Router::new()
        .route("/check_account", post(check_account::<W, H>))
        .route("/deposit", post(deposit::<W, H>))
        .route("/get_monthly_stats", post(get_monthly_stats::<W, H>))
        .route("/get_balance", post(get_balance::<W, H>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn authenticate(guard: &AuthGuard, headers: &HeaderMap, body: Bytes) -> Result<Bytes, ApiError> {
    let user_id = header(headers, USER_ID_HEADER);
    guard
        .verify(body, user_id, header(headers, DIGEST_HEADER))
        .map_err(|err| {
            warn!(user_id, %err, "request rejected");
            err.into()
        })
}

async fn check_account<W: WalletStore, H: HistoryLedger>(
    State(state): State<AppState<W, H>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<String, ApiError> {
    let body = authenticate(&state.guard, &headers, body)?;
    let req = WalletRequest::parse(&body)?;
    state.ledger.check_account(&req.wallet_id)?;
    Ok(format!("Wallet {} exists", req.wallet_id))
}

async fn deposit<W: WalletStore, H: HistoryLedger>(
    State(state): State<AppState<W, H>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<String, ApiError> {
    let body = authenticate(&state.guard, &headers, body)?;
    let req = DepositRequest::parse(&body)?;
    state.ledger.deposit(&req.wallet_id, req.amount)?;
    Ok(deposited(&req.wallet_id, req.amount))
}

// `{:.6}` alone truncates a `Decimal`, round first like a `%f` would
fn deposited(wallet_id: &str, amount: Decimal) -> String {
    format!("Wallet {wallet_id} deposited with {:.6}", amount.round_dp(6))
}

async fn get_monthly_stats<W: WalletStore, H: HistoryLedger>(
    State(state): State<AppState<W, H>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MonthlyStats>, ApiError> {
    let body = authenticate(&state.guard, &headers, body)?;
    let req = WalletRequest::parse(&body)?;
    Ok(Json(state.ledger.get_monthly_stats(&req.wallet_id)))
}

async fn get_balance<W: WalletStore, H: HistoryLedger>(
    State(state): State<AppState<W, H>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<String, ApiError> {
    let body = authenticate(&state.guard, &headers, body)?;
    let req = WalletRequest::parse(&body)?;
    Ok(state.ledger.get_balance(&req.wallet_id).normalize().to_string())
}
