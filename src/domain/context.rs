use serde::{Deserialize, Serialize};

/// Identity of the caller for a single request, supplied by the
/// authentication layer.
///
/// Every record created by the lifecycle manager takes its ownership fields
/// from here, never from request payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentContext {
    client_id: String,
    user_id: String,
    approval_flag: bool,
}

impl PaymentContext {
    pub fn new(client_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            user_id: user_id.into(),
            approval_flag: false,
        }
    }

    pub fn with_approval(mut self, approval_flag: bool) -> Self {
        self.approval_flag = approval_flag;
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn approval_flag(&self) -> bool {
        self.approval_flag
    }
}
