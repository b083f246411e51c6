use crate::domain::payment::{DuplicateCriteria, PaymentEntity, PaymentEntryEntity};
use crate::domain::ports::{PaymentEntryStore, PaymentStore, TransactionStore};
use crate::domain::transaction::TransactionEntity;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for payment records.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for payment entries, keyed by `(payment_id, sequence_no)`.
pub const CF_ENTRIES: &str = "entries";
/// Column Family for transaction records.
pub const CF_TRANSACTIONS: &str = "transactions";
/// Column Family holding id sequences.
pub const CF_META: &str = "meta";

const PAYMENT_SEQ_KEY: &[u8] = b"payment_seq";
const TRANSACTION_SEQ_KEY: &[u8] = b"transaction_seq";

/// A persistent store implementation using RocksDB.
///
/// Payments, entries and transactions live in separate Column Families.
/// Entry keys sort like `(payment_id, sequence_no)`, so entries of one
/// payment are contiguous and duplicate searches return them in key order.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, creating any
    /// missing column families.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_PAYMENTS, CF_ENTRIES, CF_TRANSACTIONS, CF_META]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| PaymentError::storage(format!("{name} column family not found")))
    }

    fn put<T: Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)
            .map_err(|e| PaymentError::storage(format!("Serialization error: {e}")))?;
        self.db.put_cf(cf, key, bytes)?;
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Walks the entries column family from `mode` until `keep_going` rejects a
    /// key, collecting the entries `accept` admits.
    fn scan_entries(
        &self,
        mode: IteratorMode<'_>,
        keep_going: impl Fn(&[u8]) -> bool,
        mut accept: impl FnMut(&PaymentEntryEntity) -> bool,
    ) -> Result<Vec<PaymentEntryEntity>> {
        let cf = self.cf(CF_ENTRIES)?;
        let mut entries = Vec::new();

        for item in self.db.iterator_cf(cf, mode) {
            let (key, value) = item.map_err(|e| {
                PaymentError::storage(format!("RocksDB iteration error: {e}"))
            })?;
            if !keep_going(&key[..]) {
                break;
            }
            let entry: PaymentEntryEntity = decode(&value)?;
            if accept(&entry) {
                entries.push(entry);
            }
        }

        Ok(entries)
    }

    async fn reserve_id(&self, key: &[u8]) -> Result<i64> {
        let _guard = self.write_lock.lock().await;
        let current: i64 = self.fetch(CF_META, key)?.unwrap_or(0);
        let next = current + 1;
        self.put(CF_META, key, &next)?;
        Ok(next)
    }

    async fn bump_id(&self, key: &[u8], seen: i64) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let current: i64 = self.fetch(CF_META, key)?.unwrap_or(0);
        if seen > current {
            self.put(CF_META, key, &seen)?;
        }
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| PaymentError::storage(format!("Deserialization error: {e}")))
}

/// Big-endian with the sign bit flipped, so byte order matches numeric order.
fn ordered_id(id: i64) -> [u8; 8] {
    ((id as u64) ^ (1 << 63)).to_be_bytes()
}

fn entry_key(payment_id: i64, sequence_no: i32) -> Vec<u8> {
    let mut key = ordered_id(payment_id).to_vec();
    key.extend_from_slice(&((sequence_no as u32) ^ (1 << 31)).to_be_bytes());
    key
}

#[async_trait]
impl PaymentStore for RocksDBStore {
    async fn next_id(&self) -> Result<i64> {
        self.reserve_id(PAYMENT_SEQ_KEY).await
    }

    async fn advance_ids(&self, last_id: i64) -> Result<()> {
        self.bump_id(PAYMENT_SEQ_KEY, last_id).await
    }

    async fn store(&self, payment: PaymentEntity) -> Result<()> {
        self.put(CF_PAYMENTS, &payment.id.to_be_bytes(), &payment)
    }

    async fn get(&self, payment_id: i64) -> Result<Option<PaymentEntity>> {
        self.fetch(CF_PAYMENTS, &payment_id.to_be_bytes())
    }

    async fn remove(&self, payment_id: i64) -> Result<()> {
        let cf = self.cf(CF_PAYMENTS)?;
        self.db.delete_cf(cf, payment_id.to_be_bytes())?;
        Ok(())
    }
}

#[async_trait]
impl PaymentEntryStore for RocksDBStore {
    async fn store(&self, entry: PaymentEntryEntity) -> Result<()> {
        let key = entry_key(entry.payment_id, entry.sequence_no);
        let _guard = self.write_lock.lock().await;
        let cf = self.cf(CF_ENTRIES)?;
        if self.db.get_cf(cf, &key)?.is_some() {
            return Err(PaymentError::Conflict(format!(
                "entry ({}, {}) already exists",
                entry.payment_id, entry.sequence_no
            )));
        }
        self.put(CF_ENTRIES, &key, &entry)
    }

    async fn get_by_payment(&self, payment_id: i64) -> Result<Vec<PaymentEntryEntity>> {
        let prefix = ordered_id(payment_id);
        self.scan_entries(
            IteratorMode::From(&prefix, Direction::Forward),
            |key| key.starts_with(&prefix),
            |_| true,
        )
    }

    async fn find_duplicates(&self, criteria: &DuplicateCriteria) -> Result<Vec<PaymentEntryEntity>> {
        self.scan_entries(IteratorMode::Start, |_| true, |entry| criteria.matches(entry))
    }

    async fn remove(&self, payment_id: i64, sequence_no: i32) -> Result<()> {
        let cf = self.cf(CF_ENTRIES)?;
        self.db.delete_cf(cf, entry_key(payment_id, sequence_no))?;
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for RocksDBStore {
    async fn insert(&self, mut tx: TransactionEntity) -> Result<i64> {
        tx.id = self.reserve_id(TRANSACTION_SEQ_KEY).await?;
        self.put(CF_TRANSACTIONS, &tx.id.to_be_bytes(), &tx)?;
        Ok(tx.id)
    }

    async fn get(&self, tx_id: i64) -> Result<Option<TransactionEntity>> {
        self.fetch(CF_TRANSACTIONS, &tx_id.to_be_bytes())
    }
}
