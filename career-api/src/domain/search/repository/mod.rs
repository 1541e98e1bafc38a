//! Content store implementations.

#[cfg(test)]
mod mock;
mod postgres;

#[cfg(test)]
pub use mock::MockContentStore;
pub use postgres::PgContentStore;
