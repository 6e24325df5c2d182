//! # Database module — user storage
//!
//! [`UserStore`] is the persistence seam for user records. Two backends
//! implement it:
//!
//! - [`PgUserStore`]: PostgreSQL through a shared SQLx pool. Uniqueness of
//!   usernames and provider ids is enforced by constraints in the `users`
//!   table (see `migrations/`).
//! - [`MemoryUserStore`]: a process-local map with the same uniqueness rules,
//!   used by tests.
//!
//! [`connect`] opens the pool and [`migrate`] applies the embedded migrations.

mod memory;
mod pool;
mod postgres;
mod store;

pub use memory::MemoryUserStore;
pub use pool::{connect, migrate};
pub use postgres::PgUserStore;
pub use store::UserStore;
