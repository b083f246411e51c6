use crate::application::status::derive_payment_status;
use crate::config::ManagerConfig;
use crate::domain::account::AccountData;
use crate::domain::context::PaymentContext;
use crate::domain::payment::{
    DuplicateCheckResponse, DuplicateCriteria, PaymentEntity, PaymentEntryEntity, PaymentStatus,
};
use crate::domain::ports::{
    DateServiceBox, PayeeServiceBox, PaymentEntryStoreBox, PaymentStoreBox, TransactionStoreBox,
};
use crate::domain::request::{
    PaymentCancellationData, PaymentInitiationData, PaymentInitiationEntryData, RecurringData,
    RequestData,
};
use crate::domain::transaction::{TransactionEntity, TransactionStatus};
use crate::error::{PaymentError, Result};
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Result of submitting a payment request.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// A prior entry matches; nothing was written.
    Duplicate(DuplicateCheckResponse),
    Created {
        payment: PaymentEntity,
        entries: Vec<PaymentEntryEntity>,
        transaction: TransactionEntity,
    },
}

/// Decision logic between request data and persisted payment records.
///
/// `PaymentLifecycleManager` populates new payment, entry and transaction
/// records, fetches existing ones scoped to the owning client, and looks for
/// duplicate submissions. It keeps no state between calls; every collaborator
/// is reached through a port.
pub struct PaymentLifecycleManager {
    payment_store: PaymentStoreBox,
    entry_store: PaymentEntryStoreBox,
    transaction_store: TransactionStoreBox,
    payee_service: PayeeServiceBox,
    date_service: DateServiceBox,
    config: ManagerConfig,
}

impl PaymentLifecycleManager {
    /// Creates a manager with the default [`ManagerConfig`].
    pub fn new(
        payment_store: PaymentStoreBox,
        entry_store: PaymentEntryStoreBox,
        transaction_store: TransactionStoreBox,
        payee_service: PayeeServiceBox,
        date_service: DateServiceBox,
    ) -> Self {
        Self {
            payment_store,
            entry_store,
            transaction_store,
            payee_service,
            date_service,
            config: ManagerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Fills ownership, audit and status fields of a new payment.
    ///
    /// Status comes from the priority-ordered rules in
    /// [`crate::application::status`]: hold, then recurring, then complete.
    pub fn populate_payment_entity(
        &self,
        context: &PaymentContext,
        payment: &mut PaymentEntity,
        request: &RequestData<PaymentInitiationData>,
    ) -> Result<()> {
        let data = request.request.as_ref().ok_or_else(|| {
            PaymentError::InvalidArgument("Payment request carries no initiation data".to_string())
        })?;

        let entry_count = u32::try_from(data.entries.len()).map_err(|_| {
            PaymentError::InvalidArgument(format!(
                "Payment request has too many entries ({})",
                data.entries.len()
            ))
        })?;
        let now = self.date_service.application_timestamp();

        payment.client_id = context.client_id().to_string();
        payment.user_id = context.user_id().to_string();
        payment.created_by = context.user_id().to_string();
        payment.created_timestamp = Some(now);
        payment.updated_timestamp = Some(now);
        payment.entry_count = entry_count;
        payment.status = Some(derive_payment_status(data));

        debug!(
            client_id = context.client_id(),
            status = ?payment.status,
            entries = payment.entry_count,
            "payment entity populated"
        );
        Ok(())
    }

    /// Fills a payment entry from one request leg.
    ///
    /// When the debit leg carries no converted amount, the entry amount is
    /// taken to be in the debit account's currency and copied into it.
    pub fn populate_payment_entry_entity(
        &self,
        context: &PaymentContext,
        entity: &mut PaymentEntryEntity,
        entry: &mut PaymentInitiationEntryData,
    ) {
        entry.debit_account_data.default_ccy_amt(entry.transaction_amt);

        entity.client_id = context.client_id().to_string();
        entity.created_by = context.user_id().to_string();
        entity.payee_category = Some(entry.payee_category);
        entity.payee_id = entry.payee_id;
        entity.payee_type_id = entry.payee_type_id;
        entity.debit_account_no = entry.debit_account_data.account_no.clone();
        entity.debit_currency = entry.debit_account_data.currency.clone();
        entity.debit_ccy_amt = entry.debit_account_data.ccy_amt;
        entity.credit_account_no = entry.credit_account_data.account_no.clone();
        entity.credit_currency = entry.credit_account_data.currency.clone();
        entity.transaction_amt = entry.transaction_amt;
        let now = self.date_service.application_timestamp();
        entity.transaction_date = match entry.transaction_date.as_deref() {
            Some(date) => self.criteria_date(date, 0),
            None => Some(now),
        };
        entity.created_timestamp = Some(now);
    }

    /// Fills a new transaction. Transactions always start in progress.
    pub fn populate_transaction_entity(
        &self,
        context: &PaymentContext,
        entity: &mut TransactionEntity,
        request: &RequestData<PaymentInitiationData>,
    ) {
        entity.status = Some(TransactionStatus::InProgress);
        entity.client_id = context.client_id().to_string();
        entity.user_id = context.user_id().to_string();
        entity.created_timestamp = Some(self.date_service.application_timestamp());
        entity.total_amt = request
            .request
            .as_ref()
            .map(PaymentInitiationData::total_amt)
            .unwrap_or_default();
    }

    /// Adds resolved payee details for every entry of `initiation_data` to the
    /// cancellation record.
    ///
    /// A failed or empty lookup only skips that entry.
    pub async fn populate_additional_details(
        &self,
        cancellation: &mut PaymentCancellationData,
        initiation_data: &PaymentInitiationData,
    ) {
        for (index, entry) in initiation_data.entries.iter().enumerate() {
            match self.payee_service.resolve_payee(entry).await {
                Ok(Some(detail)) => cancellation.additional_details.push(detail),
                Ok(None) => {
                    debug!(
                        payment_id = cancellation.payment_id,
                        entry = index,
                        payee_id = entry.payee_id,
                        "no payee details for entry"
                    );
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        payment_id = cancellation.payment_id,
                        entry = index,
                        payee_id = entry.payee_id,
                        "payee resolution failed, skipping entry"
                    );
                }
            }
        }
    }

    /// Loads a payment owned by `client_id`.
    ///
    /// A payment belonging to another client is reported exactly like a
    /// missing one.
    pub async fn fetch_payment(
        &self,
        payment_id: i64,
        client_id: &str,
        context: Option<&PaymentContext>,
    ) -> Result<PaymentEntity> {
        let payment = self.payment_store.get(payment_id).await?;

        match payment {
            Some(payment) if payment.client_id == client_id => Ok(payment),
            Some(_) => {
                warn!(
                    payment_id,
                    client_id,
                    user_id = context.map(PaymentContext::user_id),
                    "payment requested by non-owning client"
                );
                Err(PaymentError::payment_not_found(format!("Payment {payment_id} not found")))
            }
            None => Err(PaymentError::payment_not_found(format!("Payment {payment_id} not found"))),
        }
    }

    /// Loads a transaction, scoped like [`Self::fetch_payment`].
    ///
    /// `client_id` and a non-zero `payment_id` narrow the lookup when given.
    pub async fn fetch_transaction(
        &self,
        transaction_id: i64,
        payment_id: i64,
        client_id: Option<&str>,
        context: Option<&PaymentContext>,
    ) -> Result<TransactionEntity> {
        let not_found =
            || PaymentError::payment_not_found(format!("Transaction {transaction_id} not found"));

        let tx = self
            .transaction_store
            .get(transaction_id)
            .await?
            .ok_or_else(not_found)?;

        let client_mismatch = client_id.is_some_and(|client_id| tx.client_id != client_id);
        let payment_mismatch = payment_id != 0 && tx.payment_id != payment_id;
        if client_mismatch || payment_mismatch {
            warn!(
                transaction_id,
                payment_id,
                client_id,
                user_id = context.map(PaymentContext::user_id),
                "transaction requested outside its scope"
            );
            return Err(not_found());
        }

        Ok(tx)
    }

    /// Looks for a prior entry repeating one of the request's entries.
    ///
    /// Entries are checked in request order and the first stored match wins.
    /// Finding nothing is a normal outcome; only store failures are errors.
    pub async fn check_duplicate(
        &self,
        client_id: &str,
        user_id: &str,
        initiation_data: &PaymentInitiationData,
    ) -> Result<Option<DuplicateCheckResponse>> {
        let window = self.config.duplicate_window_days;

        for entry in &initiation_data.entries {
            let reference_date = entry.transaction_date.clone().unwrap_or_else(|| {
                self.date_service
                    .application_timestamp()
                    .format("%Y-%m-%d")
                    .to_string()
            });

            let criteria = DuplicateCriteria {
                client_id: client_id.to_string(),
                payee_category: entry.payee_category,
                transaction_amt: entry.transaction_amt,
                payee_id: entry.payee_id,
                payee_type_id: entry.payee_type_id,
                from: self.criteria_date(&reference_date, -window),
                to: self.criteria_date(&reference_date, window),
            };

            let matches = self.entry_store.find_duplicates(&criteria).await?;
            if let Some(existing) = matches.first() {
                info!(
                    client_id,
                    user_id,
                    payment_id = existing.payment_id,
                    sequence_no = existing.sequence_no,
                    "duplicate payment entry found"
                );
                return Ok(Some(DuplicateCheckResponse::from(existing)));
            }
        }

        Ok(None)
    }

    /// Parses `date` and shifts it by `offset_days`.
    ///
    /// Returns `None` instead of failing; callers treat a missing bound as
    /// open.
    pub fn criteria_date(&self, date: &str, offset_days: i64) -> Option<NaiveDateTime> {
        let parsed = match self.date_service.parse_timestamp(date) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(error = %e, date, "criteria date not usable");
                return None;
            }
        };

        TimeDelta::try_days(offset_days).and_then(|delta| parsed.checked_add_signed(delta))
    }

    /// Runs the duplicate check and, when clear, creates the payment with its
    /// entries and an in-progress transaction.
    pub async fn submit_payment(
        &self,
        context: &PaymentContext,
        mut request: RequestData<PaymentInitiationData>,
    ) -> Result<SubmissionOutcome> {
        let data = request.request.as_ref().ok_or_else(|| {
            PaymentError::InvalidArgument("Payment request carries no initiation data".to_string())
        })?;
        if data.entries.is_empty() {
            return Err(PaymentError::InvalidArgument(
                "Payment request has no entries".to_string(),
            ));
        }

        if let Some(duplicate) = self
            .check_duplicate(context.client_id(), context.user_id(), data)
            .await?
        {
            return Ok(SubmissionOutcome::Duplicate(duplicate));
        }

        let payment_id = self.payment_store.next_id().await?;
        let mut payment = PaymentEntity {
            id: payment_id,
            ..Default::default()
        };
        self.populate_payment_entity(context, &mut payment, &request)?;

        let mut entries = Vec::new();
        if let Some(data) = request.request.as_mut() {
            for (index, entry) in data.entries.iter_mut().enumerate() {
                let sequence_no = i32::try_from(index + 1).map_err(|_| {
                    PaymentError::InvalidArgument(format!(
                        "Payment request has too many entries ({})",
                        index + 1
                    ))
                })?;
                let mut entity = PaymentEntryEntity {
                    payment_id,
                    sequence_no,
                    ..Default::default()
                };
                self.populate_payment_entry_entity(context, &mut entity, entry);
                entries.push(entity);
            }
        }

        let mut transaction = TransactionEntity {
            payment_id,
            ..Default::default()
        };
        self.populate_transaction_entity(context, &mut transaction, &request);

        transaction.id = self.write_payment(&payment, &entries, &transaction).await?;

        info!(
            client_id = context.client_id(),
            payment_id,
            transaction_id = transaction.id,
            status = ?payment.status,
            approval = context.approval_flag(),
            "payment created"
        );

        Ok(SubmissionOutcome::Created {
            payment,
            entries,
            transaction,
        })
    }

    /// Rebuilds the initiation data a stored payment was created from, using
    /// its persisted entries.
    pub async fn fetch_initiation_data(&self, payment: &PaymentEntity) -> Result<PaymentInitiationData> {
        let stored = self.entry_store.get_by_payment(payment.id).await?;

        let entries = stored
            .iter()
            .filter_map(|entity| {
                let payee_category = entity.payee_category?;
                let mut entry = PaymentInitiationEntryData::new(
                    payee_category,
                    entity.payee_id,
                    entity.payee_type_id,
                    entity.transaction_amt,
                );
                entry.transaction_date = entity
                    .transaction_date
                    .map(|date| date.format("%Y-%m-%d %H:%M:%S").to_string());
                entry.debit_account_data = AccountData {
                    account_no: entity.debit_account_no.clone(),
                    currency: entity.debit_currency.clone(),
                    ccy_amt: entity.debit_ccy_amt,
                };
                entry.credit_account_data =
                    AccountData::new(entity.credit_account_no.clone(), entity.credit_currency.clone());
                Some(entry)
            })
            .collect();

        Ok(PaymentInitiationData {
            hold: payment.status == Some(PaymentStatus::Hold),
            recurring_data: Some(RecurringData {
                recurring: payment.status == Some(PaymentStatus::RecurringPending),
                ..Default::default()
            }),
            entries,
        })
    }

    /// Writes entries, then the payment, then its transaction. On failure
    /// whatever was already written for the payment is removed again.
    async fn write_payment(
        &self,
        payment: &PaymentEntity,
        entries: &[PaymentEntryEntity],
        transaction: &TransactionEntity,
    ) -> Result<i64> {
        let mut written = 0;
        let result = self
            .write_records(payment, entries, transaction, &mut written)
            .await;

        if let Err(e) = &result {
            warn!(error = %e, payment_id = payment.id, "payment write failed, rolling back");
            self.discard_payment(payment.id, &entries[..written]).await;
        }
        result
    }

    async fn write_records(
        &self,
        payment: &PaymentEntity,
        entries: &[PaymentEntryEntity],
        transaction: &TransactionEntity,
        written: &mut usize,
    ) -> Result<i64> {
        for entry in entries {
            self.entry_store.store(entry.clone()).await?;
            *written += 1;
        }
        self.payment_store.store(payment.clone()).await?;
        self.transaction_store.insert(transaction.clone()).await
    }

    async fn discard_payment(&self, payment_id: i64, entries: &[PaymentEntryEntity]) {
        for entry in entries {
            if let Err(e) = self.entry_store.remove(entry.payment_id, entry.sequence_no).await {
                warn!(
                    error = %e,
                    payment_id,
                    sequence_no = entry.sequence_no,
                    "could not remove payment entry"
                );
            }
        }
        if let Err(e) = self.payment_store.remove(payment_id).await {
            warn!(error = %e, payment_id, "could not remove payment");
        }
    }
}
