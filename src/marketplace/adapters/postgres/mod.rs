//! `PostgreSQL` adapters for the marketplace.

mod models;
mod repository;
mod schema;

pub use repository::PostgresMarketplace;
