use chrono::{NaiveDate, Utc};

use crate::domain::analytics::{self, Dashboard};
use crate::domain::errors::{DomainError, ValidationError};
use crate::domain::filter::{
    apply_filters, scoped_to_user, sort_orders, OrderFilters, SortDirection, SortField,
};
use crate::domain::lifecycle::{
    next_order_number, status_history_entry, update_order_status, validate_order, SYSTEM_USER,
};
use crate::domain::order::{Order, OrderInput, OrderStatus, Priority, TRACKING};
use crate::domain::ports::OrderRepository;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Orders visible to `username` (all orders when `None`), filtered then
    /// sorted.
    pub fn list_orders(
        &self,
        username: Option<&str>,
        filters: &OrderFilters,
        sort_by: SortField,
        direction: SortDirection,
    ) -> Result<Vec<Order>, DomainError> {
        let orders = self.orders_for(username)?;
        let mut matched = apply_filters(&orders, filters);
        sort_orders(&mut matched, sort_by, direction);
        Ok(matched)
    }

    pub fn get_order(&self, order_number: u64) -> Result<Option<Order>, DomainError> {
        Ok(self
            .repo
            .load_orders()?
            .into_iter()
            .find(|o| o.order_number == order_number))
    }

    /// Validates `input` and records it as a new order.
    pub fn create_order(&self, input: OrderInput) -> Result<Order, DomainError> {
        if let Err(e) = validate_order(&input) {
            log::warn!("Rejected order: {}", e);
            return Err(e.into());
        }
        let status = match input.status.as_deref().filter(|s| !s.is_empty()) {
            Some(label) => recognized_status(label)?,
            None => TRACKING.default_status.clone(),
        };
        let priority = match input.priority.as_deref().filter(|s| !s.is_empty()) {
            Some(label) => Some(
                Priority::from_label(label)
                    .ok_or_else(|| ValidationError::UnknownPriority(label.to_string()))?,
            ),
            None => None,
        };

        // Fields are present once validation has passed.
        let (Some(customer), Some(product), Some(quantity), Some(price)) =
            (input.customer, input.product, input.quantity, input.price)
        else {
            return Err(DomainError::Internal("validated order is incomplete".to_string()));
        };

        let mut orders = self.repo.load_orders()?;
        let now = Utc::now();
        let history = vec![status_history_entry(
            status.clone(),
            input.username.as_deref().unwrap_or(SYSTEM_USER),
        )];
        let order = Order {
            order_number: next_order_number(&orders),
            customer: customer.trim().to_string(),
            product: product.trim().to_string(),
            quantity,
            price,
            total: quantity as f64 * price,
            status,
            priority,
            status_history: history,
            date: Some(now.to_rfc3339()),
            created_at: Some(now),
            updated_at: Some(now),
            username: input.username,
        };

        orders.push(order.clone());
        self.repo.save_orders(&orders)?;
        log::info!(
            "Created order #{} for {} ({} x {})",
            order.order_number,
            order.customer,
            order.quantity,
            order.product
        );
        Ok(order)
    }

    /// Moves an order to `status`, recording who did it.
    pub fn update_status(
        &self,
        order_number: u64,
        status: &str,
        updated_by: Option<&str>,
    ) -> Result<Order, DomainError> {
        let status = recognized_status(status)?;
        let mut orders = self.repo.load_orders()?;
        let slot = orders
            .iter_mut()
            .find(|o| o.order_number == order_number)
            .ok_or(DomainError::NotFound)?;

        let updated = update_order_status(slot, status, updated_by.unwrap_or(SYSTEM_USER));
        *slot = updated.clone();
        self.repo.save_orders(&orders)?;
        log::info!("Order #{} is now {}", order_number, updated.status);
        Ok(updated)
    }

    /// Removes an order. Returns whether anything was removed.
    pub fn delete_order(&self, order_number: u64) -> Result<bool, DomainError> {
        let mut orders = self.repo.load_orders()?;
        let before = orders.len();
        orders.retain(|o| o.order_number != order_number);
        if orders.len() == before {
            return Ok(false);
        }
        self.repo.save_orders(&orders)?;
        log::info!("Deleted order #{}", order_number);
        Ok(true)
    }

    pub fn dashboard(&self, username: Option<&str>) -> Result<Dashboard, DomainError> {
        Ok(analytics::dashboard(&self.orders_for(username)?))
    }

    pub fn daily_report(
        &self,
        day: NaiveDate,
        username: Option<&str>,
    ) -> Result<String, DomainError> {
        Ok(analytics::daily_report(&self.orders_for(username)?, day))
    }

    fn orders_for(&self, username: Option<&str>) -> Result<Vec<Order>, DomainError> {
        let orders = self.repo.load_orders()?;
        Ok(match username.filter(|u| !u.is_empty()) {
            Some(user) => scoped_to_user(orders, user),
            None => orders,
        })
    }
}

fn recognized_status(label: &str) -> Result<OrderStatus, DomainError> {
    let status = OrderStatus::from(label);
    if status.is_recognized() {
        Ok(status)
    } else {
        Err(ValidationError::UnknownStatus(label.to_string()).into())
    }
}
