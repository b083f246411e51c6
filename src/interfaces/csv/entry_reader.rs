use crate::domain::payment::{PayeeCategory, PaymentEntryEntity};
use crate::error::{PaymentError, Result};
use crate::infrastructure::clock::parse_with_formats;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct EntryRecord {
    payment_id: i64,
    sequence_no: i32,
    client_id: String,
    payee_category: PayeeCategory,
    payee_id: i64,
    payee_type_id: i64,
    transaction_amt: String,
    transaction_date: Option<String>,
}

/// Reads previously committed payment entries from a CSV source.
///
/// Expected header:
/// `payment_id, sequence_no, client_id, payee_category, payee_id, payee_type_id, transaction_amt, transaction_date`.
/// Each row becomes a `PaymentEntryEntity`. Amounts are read as exact
/// decimals; dates are parsed with the given layouts.
pub struct PaymentEntryReader<R: Read> {
    reader: csv::Reader<R>,
    date_formats: Vec<String>,
}

impl<R: Read> PaymentEntryReader<R> {
    pub fn new(source: R, date_formats: Vec<String>) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self {
            reader,
            date_formats,
        }
    }

    /// Lazily reads and converts entries; a bad row yields an `Err` and does
    /// not stop the iterator.
    pub fn entries(self) -> impl Iterator<Item = Result<PaymentEntryEntity>> {
        let formats = self.date_formats;
        self.reader
            .into_deserialize::<EntryRecord>()
            .map(move |result| -> Result<PaymentEntryEntity> {
                let record = result.map_err(PaymentError::from)?;
                let transaction_amt = record.transaction_amt.parse::<Decimal>().map_err(|e| {
                    PaymentError::InvalidArgument(format!(
                        "invalid amount '{}': {e}",
                        record.transaction_amt
                    ))
                })?;
                let transaction_date = match record.transaction_date.as_deref() {
                    Some(date) if !date.is_empty() => Some(parse_with_formats(date, &formats)?),
                    _ => None,
                };
                Ok(PaymentEntryEntity {
                    payment_id: record.payment_id,
                    sequence_no: record.sequence_no,
                    client_id: record.client_id,
                    payee_category: Some(record.payee_category),
                    payee_id: record.payee_id,
                    payee_type_id: record.payee_type_id,
                    transaction_amt,
                    transaction_date,
                    ..Default::default()
                })
            })
    }
}
