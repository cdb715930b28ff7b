use super::errors::DomainError;
use super::order::Order;
use super::user::User;

/// Whole-collection storage for orders. Callers load, transform and save.
pub trait OrderRepository: Send + Sync + 'static {
    fn load_orders(&self) -> Result<Vec<Order>, DomainError>;
    fn save_orders(&self, orders: &[Order]) -> Result<(), DomainError>;
}

pub trait UserRepository: Send + Sync + 'static {
    fn load_users(&self) -> Result<Vec<User>, DomainError>;
    fn save_users(&self, users: &[User]) -> Result<(), DomainError>;
}
