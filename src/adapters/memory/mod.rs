//! In-memory adapters for tests and local runs.

mod order_repository;

pub use order_repository::InMemoryOrderRepository;
