use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One leg (debit or credit) of a payment entry as submitted by the caller.
///
/// `ccy_amt` is the amount expressed in the account's own currency. Zero
/// means the caller did not supply a converted amount.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountData {
    pub account_no: String,
    pub currency: String,
    pub ccy_amt: Decimal,
}

impl AccountData {
    pub fn new(account_no: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            account_no: account_no.into(),
            currency: currency.into(),
            ccy_amt: Decimal::ZERO,
        }
    }

    pub fn has_ccy_amt(&self) -> bool {
        !self.ccy_amt.is_zero()
    }

    /// Fills in `ccy_amt` when it was left unset. A supplied amount is kept.
    pub fn default_ccy_amt(&mut self, amount: Decimal) {
        if !self.has_ccy_amt() {
            self.ccy_amt = amount;
        }
    }
}
