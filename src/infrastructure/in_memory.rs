use crate::domain::payment::{DuplicateCriteria, PaymentEntity, PaymentEntryEntity};
use crate::domain::ports::{PaymentEntryStore, PaymentStore, TransactionStore};
use crate::domain::transaction::TransactionEntity;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory store for payments.
///
/// Ids handed out by `next_id` start at 1. Clones share the same state, so a
/// test can keep a handle to a store it gave away as a trait object.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<i64, PaymentEntity>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn next_id(&self) -> Result<i64> {
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn advance_ids(&self, last_id: i64) -> Result<()> {
        self.next_id.fetch_max(last_id, Ordering::SeqCst);
        Ok(())
    }

    async fn store(&self, payment: PaymentEntity) -> Result<()> {
        self.payments.write().await.insert(payment.id, payment);
        Ok(())
    }

    async fn get(&self, payment_id: i64) -> Result<Option<PaymentEntity>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&payment_id).cloned())
    }

    async fn remove(&self, payment_id: i64) -> Result<()> {
        self.payments.write().await.remove(&payment_id);
        Ok(())
    }
}

/// A thread-safe in-memory store for payment entries.
///
/// Entries are kept ordered by `(payment_id, sequence_no)`, which is also the
/// order duplicate searches return them in.
#[derive(Default, Clone)]
pub struct InMemoryPaymentEntryStore {
    entries: Arc<RwLock<BTreeMap<(i64, i32), PaymentEntryEntity>>>,
}

impl InMemoryPaymentEntryStore {
    /// Creates a new, empty in-memory entry store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentEntryStore for InMemoryPaymentEntryStore {
    async fn store(&self, entry: PaymentEntryEntity) -> Result<()> {
        let mut entries = self.entries.write().await;
        match entries.entry((entry.payment_id, entry.sequence_no)) {
            Entry::Occupied(_) => Err(PaymentError::Conflict(format!(
                "entry ({}, {}) already exists",
                entry.payment_id, entry.sequence_no
            ))),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }

    async fn get_by_payment(&self, payment_id: i64) -> Result<Vec<PaymentEntryEntity>> {
        let entries = self.entries.read().await;
        Ok(entries
            .range((payment_id, i32::MIN)..=(payment_id, i32::MAX))
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn find_duplicates(&self, criteria: &DuplicateCriteria) -> Result<Vec<PaymentEntryEntity>> {
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .filter(|entry| criteria.matches(entry))
            .cloned()
            .collect())
    }

    async fn remove(&self, payment_id: i64, sequence_no: i32) -> Result<()> {
        self.entries.write().await.remove(&(payment_id, sequence_no));
        Ok(())
    }
}

/// A thread-safe in-memory store for transactions.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<HashMap<i64, TransactionEntity>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryTransactionStore {
    /// Creates a new, empty in-memory transaction store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, mut tx: TransactionEntity) -> Result<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        tx.id = id;
        self.transactions.write().await.insert(id, tx);
        Ok(id)
    }

    async fn get(&self, tx_id: i64) -> Result<Option<TransactionEntity>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(&tx_id).cloned())
    }
}
