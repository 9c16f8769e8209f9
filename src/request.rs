use std::str::FromStr;

use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::wallet::WalletId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid JSON data")]
    MalformedJson,
    #[error("Missing field `{field}`")]
    MissingField { field: &'static str },
    #[error("Field `{field}` must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Payload of every endpoint that only addresses a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletRequest {
    pub wallet_id: WalletId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositRequest {
    pub wallet_id: WalletId,
    pub amount: Decimal,
}

impl WalletRequest {
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        let object = parse_object(body)?;
        Ok(Self {
            wallet_id: string_field(&object, "wallet_id")?,
        })
    }
}

impl DepositRequest {
    /// Only the shape is validated here, the amount sign is checked by the wallet.
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        let object = parse_object(body)?;
        Ok(Self {
            wallet_id: string_field(&object, "wallet_id")?,
            amount: decimal_field(&object, "amount")?,
        })
    }
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, ParseError> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(object)) => Ok(object),
        _ => Err(ParseError::MalformedJson),
    }
}

fn field<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, ParseError> {
    object.get(field).ok_or(ParseError::MissingField { field })
}

fn string_field(object: &Map<String, Value>, name: &'static str) -> Result<String, ParseError> {
    match field(object, name)? {
        Value::String(value) => Ok(value.clone()),
        _ => Err(ParseError::WrongType {
            field: name,
            expected: "string",
        }),
    }
}

fn decimal_field(object: &Map<String, Value>, name: &'static str) -> Result<Decimal, ParseError> {
    let wrong_type = ParseError::WrongType {
        field: name,
        expected: "number",
    };
    match field(object, name)? {
        Value::Number(number) => number_to_decimal(number).ok_or(wrong_type),
        _ => Err(wrong_type),
    }
}

// Goes through the textual form so `0.1` stays exactly `0.1`, exponent
// notation falls back to the float value. Numbers beyond the decimal range
// saturate, so the wallet rejects them as over the cap or non-positive.
fn number_to_decimal(number: &Number) -> Option<Decimal> {
    if let Ok(value) = Decimal::from_str(&number.to_string()) {
        return Some(value);
    }
    let value = number.as_f64()?;
    Decimal::from_f64(value).or(Some(if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }))
}
