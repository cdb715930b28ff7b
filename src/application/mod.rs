pub mod order_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use crate::domain::errors::DomainError;
    use crate::domain::order::Order;
    use crate::domain::ports::{OrderRepository, UserRepository};
    use crate::domain::user::User;

    /// Keeps both collections in memory.
    #[derive(Default)]
    pub struct MemoryStore {
        pub orders: Mutex<Vec<Order>>,
        pub users: Mutex<Vec<User>>,
        order_writes_fail: AtomicBool,
    }

    impl MemoryStore {
        /// Makes every later `save_orders` call fail.
        pub fn fail_order_writes(&self) {
            self.order_writes_fail.store(true, Ordering::SeqCst);
        }
    }

    impl OrderRepository for MemoryStore {
        fn load_orders(&self) -> Result<Vec<Order>, DomainError> {
            Ok(self.orders.lock().unwrap().clone())
        }

        fn save_orders(&self, orders: &[Order]) -> Result<(), DomainError> {
            if self.order_writes_fail.load(Ordering::SeqCst) {
                return Err(DomainError::Internal("disk full".to_string()));
            }
            *self.orders.lock().unwrap() = orders.to_vec();
            Ok(())
        }
    }

    impl UserRepository for MemoryStore {
        fn load_users(&self) -> Result<Vec<User>, DomainError> {
            Ok(self.users.lock().unwrap().clone())
        }

        fn save_users(&self, users: &[User]) -> Result<(), DomainError> {
            *self.users.lock().unwrap() = users.to_vec();
            Ok(())
        }
    }
}
