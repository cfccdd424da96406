//! Postgres persistence for trailhead: configuration, pooling, embedded
//! migrations, the roadmap row model, and query functions.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
