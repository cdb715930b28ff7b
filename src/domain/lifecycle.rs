use chrono::Utc;

use super::errors::ValidationError;
use super::order::{Order, OrderInput, OrderStatus, StatusHistoryEntry};

pub const SYSTEM_USER: &str = "system";

/// Next free order number: one past the highest in use, or 1 when empty.
pub fn next_order_number(existing: &[Order]) -> u64 {
    existing
        .iter()
        .map(|o| o.order_number)
        .max()
        .unwrap_or(0)
        + 1
}

pub fn status_history_entry(status: OrderStatus, updated_by: &str) -> StatusHistoryEntry {
    StatusHistoryEntry {
        status,
        timestamp: Utc::now(),
        updated_by: updated_by.to_string(),
    }
}

/// Returns a copy of `order` moved to `new_status`, with `updatedAt`
/// refreshed and exactly one history entry appended. `order` is untouched.
pub fn update_order_status(order: &Order, new_status: OrderStatus, updated_by: &str) -> Order {
    let entry = status_history_entry(new_status.clone(), updated_by);
    let mut updated = order.clone();
    updated.status = new_status;
    updated.updated_at = Some(entry.timestamp);
    updated.status_history.push(entry);
    updated
}

/// Checks the preconditions an order must meet before it is recorded.
///
/// Missing fields are reported together, before any range check. Empty or
/// whitespace-only text counts as missing.
pub fn validate_order(input: &OrderInput) -> Result<(), ValidationError> {
    let blank = |s: &Option<String>| s.as_deref().map_or(true, |s| s.trim().is_empty());

    let mut missing = Vec::new();
    if blank(&input.customer) {
        missing.push("customer");
    }
    if blank(&input.product) {
        missing.push("product");
    }
    if input.quantity.is_none() {
        missing.push("quantity");
    }
    if input.price.is_none() {
        missing.push("price");
    }
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    if input.quantity.is_some_and(|q| q <= 0) {
        return Err(ValidationError::InvalidQuantity);
    }
    // NaN fails this comparison too.
    if !input.price.is_some_and(|p| p > 0.0) {
        return Err(ValidationError::InvalidPrice);
    }
    // JSON has no representation for an infinite total.
    if let (Some(q), Some(p)) = (input.quantity, input.price) {
        if !(q as f64 * p).is_finite() {
            return Err(ValidationError::TotalOutOfRange);
        }
    }
    Ok(())
}
