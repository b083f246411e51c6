use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a payment record.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum PaymentStatus {
    #[serde(rename = "COMP")]
    Complete,
    #[serde(rename = "INPR")]
    InProgress,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "RCPN")]
    RecurringPending,
    #[serde(rename = "CANC")]
    Cancelled,
    #[serde(rename = "FAIL")]
    Failed,
}

impl PaymentStatus {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentStatus::Complete => "COMP",
            PaymentStatus::InProgress => "INPR",
            PaymentStatus::Hold => "HOLD",
            PaymentStatus::RecurringPending => "RCPN",
            PaymentStatus::Cancelled => "CANC",
            PaymentStatus::Failed => "FAIL",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Payee classification used as part of the duplicate-match key.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PayeeCategory {
    /// Personal payee.
    #[serde(rename = "P")]
    Personal,
    /// Business payee.
    #[serde(rename = "B")]
    Business,
}

/// A top-level payment record.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct PaymentEntity {
    pub id: i64,
    pub client_id: String,
    pub user_id: String,
    pub status: Option<PaymentStatus>,
    pub created_by: String,
    pub created_timestamp: Option<NaiveDateTime>,
    pub updated_timestamp: Option<NaiveDateTime>,
    pub entry_count: u32,
}

/// One line item of a payment.
///
/// `payment_id` is a back-reference; `(payment_id, sequence_no)` is unique.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct PaymentEntryEntity {
    pub payment_id: i64,
    pub sequence_no: i32,
    pub client_id: String,
    pub created_by: String,
    pub payee_category: Option<PayeeCategory>,
    pub payee_id: i64,
    pub payee_type_id: i64,
    pub debit_account_no: String,
    pub debit_currency: String,
    pub debit_ccy_amt: Decimal,
    pub credit_account_no: String,
    pub credit_currency: String,
    pub transaction_amt: Decimal,
    pub transaction_date: Option<NaiveDateTime>,
    pub created_timestamp: Option<NaiveDateTime>,
}

/// Prior entry that a new submission appears to repeat.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct DuplicateCheckResponse {
    pub payment_id: String,
    pub sequence_no: String,
}

impl From<&PaymentEntryEntity> for DuplicateCheckResponse {
    fn from(entry: &PaymentEntryEntity) -> Self {
        Self {
            payment_id: entry.payment_id.to_string(),
            sequence_no: entry.sequence_no.to_string(),
        }
    }
}

/// Search key for prior entries resembling a new one.
///
/// `from`/`to` bound the stored entry's transaction date inclusively; `None`
/// leaves that side open.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateCriteria {
    pub client_id: String,
    pub payee_category: PayeeCategory,
    pub transaction_amt: Decimal,
    pub payee_id: i64,
    pub payee_type_id: i64,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl DuplicateCriteria {
    pub fn matches(&self, entry: &PaymentEntryEntity) -> bool {
        entry.client_id == self.client_id
            && entry.payee_category == Some(self.payee_category)
            && entry.transaction_amt == self.transaction_amt
            && entry.payee_id == self.payee_id
            && entry.payee_type_id == self.payee_type_id
            && self.within_window(entry.transaction_date)
    }

    fn within_window(&self, date: Option<NaiveDateTime>) -> bool {
        match (date, self.from, self.to) {
            (_, None, None) => true,
            (None, _, _) => false,
            (Some(date), from, to) => {
                from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
            }
        }
    }
}
