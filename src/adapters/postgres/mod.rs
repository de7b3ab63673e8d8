//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresOrderRepository` - Order lookup and atomic conditional status write

mod order_repository;

pub use order_repository::PostgresOrderRepository;
