use crate::domain::payment::PaymentStatus;
use crate::domain::request::PaymentInitiationData;

/// A status rule: when `applies` holds for the request, the payment gets
/// `status`.
pub struct StatusRule {
    pub name: &'static str,
    pub applies: fn(&PaymentInitiationData) -> bool,
    pub status: PaymentStatus,
}

/// Rules in priority order. The first matching rule decides.
pub const PAYMENT_STATUS_RULES: &[StatusRule] = &[
    StatusRule {
        name: "hold",
        applies: |data| data.hold,
        status: PaymentStatus::Hold,
    },
    StatusRule {
        name: "recurring",
        applies: PaymentInitiationData::is_recurring,
        status: PaymentStatus::RecurringPending,
    },
];

/// Status used when no rule applies.
pub const DEFAULT_PAYMENT_STATUS: PaymentStatus = PaymentStatus::Complete;

pub fn derive_payment_status(data: &PaymentInitiationData) -> PaymentStatus {
    PAYMENT_STATUS_RULES
        .iter()
        .find(|rule| (rule.applies)(data))
        .map(|rule| {
            tracing::debug!(rule = rule.name, status = %rule.status, "payment status rule applied");
            rule.status
        })
        .unwrap_or(DEFAULT_PAYMENT_STATUS)
}
