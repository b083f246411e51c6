use super::account::AccountData;
use super::payment::PayeeCategory;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Envelope around an inbound request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestData<T> {
    #[serde(default)]
    pub request_id: Option<String>,
    pub request: Option<T>,
}

impl<T> Default for RequestData<T> {
    fn default() -> Self {
        Self {
            request_id: None,
            request: None,
        }
    }
}

impl<T> RequestData<T> {
    pub fn new(request: T) -> Self {
        Self {
            request_id: None,
            request: Some(request),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurringData {
    pub recurring: bool,
    pub frequency: Option<String>,
    pub end_date: Option<String>,
}

/// One debit/credit leg of a payment request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInitiationEntryData {
    pub payee_category: PayeeCategory,
    pub payee_id: i64,
    pub payee_type_id: i64,
    pub transaction_amt: Decimal,
    #[serde(default)]
    pub transaction_date: Option<String>,
    #[serde(default)]
    pub debit_account_data: AccountData,
    #[serde(default)]
    pub credit_account_data: AccountData,
}

impl PaymentInitiationEntryData {
    pub fn new(payee_category: PayeeCategory, payee_id: i64, payee_type_id: i64, amount: Decimal) -> Self {
        Self {
            payee_category,
            payee_id,
            payee_type_id,
            transaction_amt: amount,
            transaction_date: None,
            debit_account_data: AccountData::default(),
            credit_account_data: AccountData::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentInitiationData {
    pub hold: bool,
    pub recurring_data: Option<RecurringData>,
    pub entries: Vec<PaymentInitiationEntryData>,
}

impl PaymentInitiationData {
    pub fn is_recurring(&self) -> bool {
        self.recurring_data.as_ref().is_some_and(|r| r.recurring)
    }

    pub fn total_amt(&self) -> Decimal {
        self.entries.iter().map(|e| e.transaction_amt).sum()
    }
}

/// Payee metadata resolved through the payee integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayeeDetail {
    pub payee_id: i64,
    pub payee_name: String,
    pub payee_account_no: String,
    pub payee_bank_name: Option<String>,
}

/// A request to cancel a payment, enriched with payee details of the
/// payment's entries before it is handed downstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentCancellationData {
    pub payment_id: i64,
    pub reason: Option<String>,
    #[serde(default)]
    pub additional_details: Vec<PayeeDetail>,
}
