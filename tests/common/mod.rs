#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use payment_lifecycle::domain::payment::{DuplicateCriteria, PaymentEntryEntity};
use payment_lifecycle::domain::ports::{DateService, PayeeIntegrationService, PaymentEntryStore};
use payment_lifecycle::domain::request::{PayeeDetail, PaymentInitiationEntryData};
use payment_lifecycle::error::{PaymentError, Result};
use payment_lifecycle::infrastructure::in_memory::InMemoryPaymentEntryStore;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const HISTORY_HEADER: [&str; 8] = [
    "payment_id",
    "sequence_no",
    "client_id",
    "payee_category",
    "payee_id",
    "payee_type_id",
    "transaction_amt",
    "transaction_date",
];

pub fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Writes a history CSV with one personal-payee entry per row:
/// `(payment_id, payee_id, amount, date)`.
pub fn write_history(path: &Path, rows: &[(i64, i64, &str, &str)]) -> std::result::Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(HISTORY_HEADER)?;

    for (payment_id, payee_id, amount, date) in rows {
        wtr.write_record([
            payment_id.to_string().as_str(),
            "1",
            "CLIENT1",
            "P",
            payee_id.to_string().as_str(),
            "1",
            *amount,
            *date,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes a single-entry payment request for a personal payee.
pub fn write_request(path: &Path, payee_id: i64, amount: &str, date: &str) -> std::result::Result<(), Error> {
    let mut file = File::create(path)?;
    write!(
        file,
        r#"{{
  "hold": false,
  "entries": [{{
    "payee_category": "P",
    "payee_id": {payee_id},
    "payee_type_id": 1,
    "transaction_amt": "{amount}",
    "transaction_date": "{date}",
    "debit_account_data": {{"account_no": "111", "currency": "USD"}},
    "credit_account_data": {{"account_no": "222", "currency": "USD"}}
  }}]
}}"#
    )?;
    Ok(())
}

/// Date service whose parser always fails, standing in for a broken
/// collaborator.
pub struct BrokenDateService {
    pub now: NaiveDateTime,
}

impl DateService for BrokenDateService {
    fn application_timestamp(&self) -> NaiveDateTime {
        self.now
    }

    fn parse_timestamp(&self, value: &str) -> Result<NaiveDateTime> {
        Err(PaymentError::ParseError(format!("cannot parse {value}")))
    }
}

/// Payee service that fails for some payee ids and records every lookup.
#[derive(Clone, Default)]
pub struct FlakyPayeeService {
    pub failing: HashSet<i64>,
    pub calls: Arc<Mutex<Vec<i64>>>,
}

impl FlakyPayeeService {
    pub fn failing_for(ids: &[i64]) -> Self {
        Self {
            failing: ids.iter().copied().collect(),
            calls: Arc::default(),
        }
    }
}

#[async_trait]
impl PayeeIntegrationService for FlakyPayeeService {
    async fn resolve_payee(&self, entry: &PaymentInitiationEntryData) -> Result<Option<PayeeDetail>> {
        self.calls.lock().unwrap().push(entry.payee_id);
        if self.failing.contains(&entry.payee_id) {
            return Err(PaymentError::PayeeResolution(format!(
                "payee {} unavailable",
                entry.payee_id
            )));
        }
        Ok(Some(PayeeDetail {
            payee_id: entry.payee_id,
            payee_name: format!("Payee {}", entry.payee_id),
            payee_account_no: format!("ACC{}", entry.payee_id),
            payee_bank_name: None,
        }))
    }
}

/// Entry store whose duplicate search always fails.
pub struct UnavailableEntryStore;

#[async_trait]
impl PaymentEntryStore for UnavailableEntryStore {
    async fn store(&self, _entry: PaymentEntryEntity) -> Result<()> {
        Err(PaymentError::storage("entry store unavailable"))
    }

    async fn get_by_payment(&self, _payment_id: i64) -> Result<Vec<PaymentEntryEntity>> {
        Err(PaymentError::storage("entry store unavailable"))
    }

    async fn find_duplicates(&self, _criteria: &DuplicateCriteria) -> Result<Vec<PaymentEntryEntity>> {
        Err(PaymentError::storage("entry store unavailable"))
    }

    async fn remove(&self, _payment_id: i64, _sequence_no: i32) -> Result<()> {
        Err(PaymentError::storage("entry store unavailable"))
    }
}

/// In-memory entry store whose writes start failing after `accepted` of
/// them went through. Reads and removals keep working.
#[derive(Clone, Default)]
pub struct FailingWritesEntryStore {
    pub inner: InMemoryPaymentEntryStore,
    pub accepted: usize,
    pub writes: Arc<AtomicUsize>,
}

impl FailingWritesEntryStore {
    pub fn after(accepted: usize) -> Self {
        Self {
            accepted,
            ..Default::default()
        }
    }
}

#[async_trait]
impl PaymentEntryStore for FailingWritesEntryStore {
    async fn store(&self, entry: PaymentEntryEntity) -> Result<()> {
        if self.writes.fetch_add(1, Ordering::SeqCst) >= self.accepted {
            return Err(PaymentError::storage("entry store rejected write"));
        }
        self.inner.store(entry).await
    }

    async fn get_by_payment(&self, payment_id: i64) -> Result<Vec<PaymentEntryEntity>> {
        self.inner.get_by_payment(payment_id).await
    }

    async fn find_duplicates(&self, criteria: &DuplicateCriteria) -> Result<Vec<PaymentEntryEntity>> {
        self.inner.find_duplicates(criteria).await
    }

    async fn remove(&self, payment_id: i64, sequence_no: i32) -> Result<()> {
        self.inner.remove(payment_id, sequence_no).await
    }
}
