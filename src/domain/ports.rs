use super::payment::{DuplicateCriteria, PaymentEntity, PaymentEntryEntity};
use super::request::{PayeeDetail, PaymentInitiationEntryData};
use super::transaction::TransactionEntity;
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Source of application time and parser of caller-supplied dates.
pub trait DateService: Send + Sync {
    fn application_timestamp(&self) -> NaiveDateTime;
    fn parse_timestamp(&self, value: &str) -> Result<NaiveDateTime>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Reserves a payment id. An id is never handed out twice.
    async fn next_id(&self) -> Result<i64>;
    /// Keeps ids reserved from now on above `last_id`, which is known to be
    /// taken elsewhere.
    async fn advance_ids(&self, last_id: i64) -> Result<()>;
    /// Persists a payment under its own `id`.
    async fn store(&self, payment: PaymentEntity) -> Result<()>;
    async fn get(&self, payment_id: i64) -> Result<Option<PaymentEntity>>;
    async fn remove(&self, payment_id: i64) -> Result<()>;
}

#[async_trait]
pub trait PaymentEntryStore: Send + Sync {
    /// Persists a new entry. Fails with `Conflict` when its
    /// `(payment_id, sequence_no)` is already taken.
    async fn store(&self, entry: PaymentEntryEntity) -> Result<()>;
    /// Entries of one payment, in sequence order.
    async fn get_by_payment(&self, payment_id: i64) -> Result<Vec<PaymentEntryEntity>>;
    /// Entries matching `criteria`, ordered by `(payment_id, sequence_no)`.
    async fn find_duplicates(&self, criteria: &DuplicateCriteria) -> Result<Vec<PaymentEntryEntity>>;
    async fn remove(&self, payment_id: i64, sequence_no: i32) -> Result<()>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persists a new transaction, assigning and returning its id.
    async fn insert(&self, tx: TransactionEntity) -> Result<i64>;
    async fn get(&self, tx_id: i64) -> Result<Option<TransactionEntity>>;
}

#[async_trait]
pub trait PayeeIntegrationService: Send + Sync {
    async fn resolve_payee(&self, entry: &PaymentInitiationEntryData) -> Result<Option<PayeeDetail>>;
}

pub type DateServiceBox = Box<dyn DateService>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type PaymentEntryStoreBox = Box<dyn PaymentEntryStore>;
pub type TransactionStoreBox = Box<dyn TransactionStore>;
pub type PayeeServiceBox = Box<dyn PayeeIntegrationService>;
