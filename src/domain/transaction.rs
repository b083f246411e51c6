use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum TransactionStatus {
    #[serde(rename = "INPR")]
    InProgress,
    #[serde(rename = "COMP")]
    Complete,
    #[serde(rename = "FAIL")]
    Failed,
    #[serde(rename = "CANC")]
    Cancelled,
}

impl TransactionStatus {
    pub fn code(&self) -> &'static str {
        match self {
            TransactionStatus::InProgress => "INPR",
            TransactionStatus::Complete => "COMP",
            TransactionStatus::Failed => "FAIL",
            TransactionStatus::Cancelled => "CANC",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Processing record tracking execution of a payment request.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct TransactionEntity {
    pub id: i64,
    pub payment_id: i64,
    pub client_id: String,
    pub user_id: String,
    pub status: Option<TransactionStatus>,
    pub total_amt: Decimal,
    pub created_timestamp: Option<NaiveDateTime>,
}
