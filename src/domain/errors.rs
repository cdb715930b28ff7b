use thiserror::Error;

/// Rejection reasons for submitted order data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Quantity must be greater than 0")]
    InvalidQuantity,
    #[error("Price must be greater than 0")]
    InvalidPrice,
    #[error("Order total is too large")]
    TotalOutOfRange,
    #[error("Unknown status: {0}")]
    UnknownStatus(String),
    #[error("Unknown priority: {0}")]
    UnknownPriority(String),
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order not found")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_every_field() {
        let err = ValidationError::MissingFields(vec!["customer", "price"]);
        assert_eq!(err.to_string(), "Missing required fields: customer, price");
    }

    #[test]
    fn validation_error_converts_into_domain_error() {
        let err: DomainError = ValidationError::InvalidPrice.into();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationError::InvalidPrice)
        ));
        assert_eq!(err.to_string(), "Price must be greater than 0");
    }
}
