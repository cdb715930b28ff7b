pub mod analytics;
pub mod errors;
pub mod filter;
pub mod lifecycle;
pub mod order;
pub mod ports;
pub mod user;
