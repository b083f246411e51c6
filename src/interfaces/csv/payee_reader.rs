use crate::domain::request::PayeeDetail;
use crate::error::{PaymentError, Result};
use std::io::Read;

/// Reads payee directory rows (`payee_id, payee_name, payee_account_no, payee_bank_name`).
pub struct PayeeReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PayeeReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn payees(self) -> impl Iterator<Item = Result<PayeeDetail>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PaymentError::from))
    }
}
