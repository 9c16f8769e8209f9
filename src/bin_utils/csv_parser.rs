use std::io::Read;

use anyhow::Context;
use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::wallet::Wallet;

#[derive(Debug, Deserialize)]
pub struct WalletRecord {
    pub wallet_id: String,
    pub identified: bool,
    pub balance: Decimal,
}

/// Parses the list of pre-existing wallets in CSV format
pub struct CsvWalletParser<R> {
    iter: DeserializeRecordsIntoIter<R, WalletRecord>,
}

impl<R> CsvWalletParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvWalletParser<R>
where
    R: Read,
{
    type Item = (u64, csv::Result<WalletRecord>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}

/// Reads every wallet, failing on the first malformed or invalid row.
pub fn load_wallets<R>(source: R) -> anyhow::Result<Vec<Wallet>>
where
    R: Read,
{
    CsvWalletParser::new(source)
        .map(|(line, row)| {
            let record = row.with_context(|| format!("Malformed wallet at line {line}"))?;
            Wallet::new(record.wallet_id, record.identified, record.balance)
                .with_context(|| format!("Invalid wallet at line {line}"))
        })
        .collect()
}
