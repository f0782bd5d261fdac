//! PostgreSQL persistence for saved meal plans and user profiles.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
