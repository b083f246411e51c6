use crate::domain::ports::PayeeIntegrationService;
use crate::domain::request::{PayeeDetail, PaymentInitiationEntryData};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Payee lookup over a fixed directory keyed by payee id.
#[derive(Default, Clone)]
pub struct StaticPayeeDirectory {
    payees: Arc<RwLock<HashMap<i64, PayeeDetail>>>,
}

impl StaticPayeeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, detail: PayeeDetail) {
        self.payees.write().await.insert(detail.payee_id, detail);
    }
}

#[async_trait]
impl PayeeIntegrationService for StaticPayeeDirectory {
    async fn resolve_payee(&self, entry: &PaymentInitiationEntryData) -> Result<Option<PayeeDetail>> {
        let payees = self.payees.read().await;
        Ok(payees.get(&entry.payee_id).cloned())
    }
}
