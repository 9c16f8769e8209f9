/// Wallet state and the balance cap rules.
/// A deposit is first handled into an event, which is then applied to the wallet.
pub mod wallet;

/// HMAC-SHA1 digest check that gates every request.
pub mod auth;

/// Typed parsing of request payloads.
pub mod request;

/// Storage interfaces, plus "in memory" implementations.
///
/// NOTE: the ledger only talks to the traits, so a durable backend can
/// replace the in-memory one without touching the ledger logic.
pub mod store;

/// Monthly aggregates derived from the transaction history.
pub mod stats;

/// Coordinates wallets, history and stats for the four ledger operations.
pub mod service;

/// Server bootstrap. It is kept in the library so the integration tests
/// can use it.
pub mod bin_utils;
