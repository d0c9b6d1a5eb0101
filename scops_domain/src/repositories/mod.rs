//! Repository ports for aggregate persistence.

pub mod order_repository;

pub use order_repository::OrderRepository;
