use std::collections::BTreeMap;

use crate::domain::errors::DomainError;
use crate::domain::ports::{OrderRepository, UserRepository};
use crate::domain::user::{User, UserView};

pub struct UserService<R> {
    repo: R,
    max_users: usize,
    hash_cost: u32,
}

impl<R: UserRepository + OrderRepository> UserService<R> {
    pub fn new(repo: R, max_users: usize) -> Self {
        Self {
            repo,
            max_users,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn register(
        &self,
        username: Option<&str>,
        password: Option<&str>,
        role: Option<&str>,
    ) -> Result<UserView, DomainError> {
        fn filled(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.is_empty())
        }
        let (Some(username), Some(password), Some(role)) =
            (filled(username), filled(password), filled(role))
        else {
            return Err(DomainError::InvalidInput("Missing fields".to_string()));
        };

        let mut users = self.load_users()?;
        if users.len() >= self.max_users {
            log::warn!("Registration of '{}' refused: user limit reached", username);
            return Err(DomainError::InvalidInput("User limit reached".to_string()));
        }
        if users.iter().any(|u| u.username == username) {
            return Err(DomainError::InvalidInput("Username exists".to_string()));
        }

        let password_hash = bcrypt::hash(password, self.hash_cost)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;
        let user = User {
            username: username.to_string(),
            password_hash,
            role: role.to_string(),
        };
        let view = UserView::from(&user);
        users.push(user);
        self.repo.save_users(&users)?;
        log::info!("Registered user '{}' as {}", view.username, view.role);
        Ok(view)
    }

    pub fn list_users(&self) -> Result<Vec<UserView>, DomainError> {
        Ok(self.load_users()?.iter().map(UserView::from).collect())
    }

    /// Number of orders owned by each of `usernames`.
    pub fn order_counts(
        &self,
        usernames: &[String],
    ) -> Result<BTreeMap<String, usize>, DomainError> {
        let orders = self.repo.load_orders()?;
        Ok(usernames
            .iter()
            .map(|name| {
                let n = orders
                    .iter()
                    .filter(|o| o.username.as_deref() == Some(name.as_str()))
                    .count();
                (name.clone(), n)
            })
            .collect())
    }

    /// Removes the user together with every order they own.
    ///
    /// Orders go first: if that write fails the user is kept and the call
    /// can be retried. The two files are not updated atomically.
    pub fn delete_user(&self, username: &str) -> Result<(), DomainError> {
        let mut orders = self.repo.load_orders()?;
        let before = orders.len();
        orders.retain(|o| o.username.as_deref() != Some(username));
        self.repo.save_orders(&orders)?;

        let mut users = self.load_users()?;
        users.retain(|u| u.username != username);
        self.repo.save_users(&users)?;
        log::info!(
            "Deleted user '{}' and {} of their orders",
            username,
            before - orders.len()
        );
        Ok(())
    }

    /// Loads users, hashing any plaintext passwords left by older data files
    /// and writing the upgraded records back.
    fn load_users(&self) -> Result<Vec<User>, DomainError> {
        let mut users = self.repo.load_users()?;
        let mut upgraded = 0;
        for user in users.iter_mut().filter(|u| !is_bcrypt_hash(&u.password_hash)) {
            user.password_hash = bcrypt::hash(&user.password_hash, self.hash_cost)
                .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;
            upgraded += 1;
        }
        if upgraded > 0 {
            self.repo.save_users(&users)?;
            log::info!("Hashed {} plaintext stored passwords", upgraded);
        }
        Ok(users)
    }
}

fn is_bcrypt_hash(value: &str) -> bool {
    value.len() == 60 && ["$2a$", "$2b$", "$2x$", "$2y$"].iter().any(|p| value.starts_with(p))
}
