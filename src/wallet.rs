use rust_decimal::{Decimal, prelude::Zero};
use rust_decimal_macros::dec;
use thiserror::Error;

pub type WalletId = String;

/// Maximum balance of a wallet that passed identification.
pub const IDENTIFIED_CAP: Decimal = dec!(100000);

/// Maximum balance of an anonymous wallet.
pub const UNIDENTIFIED_CAP: Decimal = dec!(10000);

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Wallet does not exist")]
    WalletNotFound,
    #[error("Deposit amount must be positive")]
    InvalidAmount,
    #[error("Exceeds maximum balance")]
    LimitExceeded,
}

/// Balance change produced by a successful [`Wallet::handle_deposit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositEvent {
    amount: Decimal,
}

impl DepositEvent {
    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    id: WalletId,
    identified: bool,
    balance: Decimal,
}

impl Wallet {
    /// Builds a wallet that already satisfies the balance invariant.
    pub fn new(
        id: impl Into<WalletId>,
        identified: bool,
        balance: Decimal,
    ) -> Result<Self, LedgerError> {
        let wallet = Self {
            id: id.into(),
            identified,
            balance,
        };
        if balance < Decimal::zero() {
            return Err(LedgerError::InvalidAmount);
        }
        if balance > wallet.cap() {
            return Err(LedgerError::LimitExceeded);
        }
        Ok(wallet)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn identified(&self) -> bool {
        self.identified
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn cap(&self) -> Decimal {
        if self.identified {
            IDENTIFIED_CAP
        } else {
            UNIDENTIFIED_CAP
        }
    }

    pub fn apply(&mut self, event: &DepositEvent) {
        self.balance += event.amount;
    }

    pub fn handle_deposit(&self, amount: Decimal) -> Result<DepositEvent, LedgerError> {
        if amount <= Decimal::zero() {
            return Err(LedgerError::InvalidAmount);
        }
        // checked_add guards against overflowing the decimal range itself
        match self.balance.checked_add(amount) {
            Some(total) if total <= self.cap() => Ok(DepositEvent { amount }),
            _ => Err(LedgerError::LimitExceeded),
        }
    }
}
