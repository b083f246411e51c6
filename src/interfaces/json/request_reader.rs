use crate::domain::request::{PaymentInitiationData, RequestData};
use crate::error::Result;
use std::io::Read;

/// Reads a payment initiation body and wraps it in a request envelope.
pub fn read_initiation_request<R: Read>(source: R) -> Result<RequestData<PaymentInitiationData>> {
    let data: PaymentInitiationData = serde_json::from_reader(source)?;
    Ok(RequestData::new(data))
}
