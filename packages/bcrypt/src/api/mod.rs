//! Bcrypt hashing API
//!
//! Usage: `Bcrypt::new().with_cost(HashCost::Strong).compute(password).await`

pub mod builder;
pub mod cost;
pub mod hash_functions;

pub use builder::Bcrypt;
pub use cost::HashCost;
pub use hash_functions::{hash, hash_with_setting, verify};
