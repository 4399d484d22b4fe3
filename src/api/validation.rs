use super::ApiError;

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            resource, id
        )));
    }
    Ok(id)
}

pub fn validate_rfq_id(id: i32) -> Result<i32, ApiError> {
    validate_id("RFQ", id)
}

pub fn validate_bid_id(id: i32) -> Result<i32, ApiError> {
    validate_id("bid", id)
}
