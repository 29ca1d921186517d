//! Query execution for docgate.
//!
//! [`QueryExecutor`] runs SQL against a [`ConnectionProvider`] and marshals
//! the results into documents: [`QueryExecutor::load_one`] for the first
//! matching row, [`QueryExecutor::load_many`] for all rows, and
//! [`QueryExecutor::execute`] for statements without a result set.
//!
//! Connection acquisition and the actual wire round-trip live behind the
//! [`ConnectionProvider`], [`Connection`] and [`Statement`] traits; the
//! executor binds parameters positionally, hands cursors to the marshaller,
//! and guarantees that connections, statements and cursors are released on
//! every exit path.

pub mod error;
pub mod executor;
pub mod source;

pub use error::{ExecuteError, Result};
pub use executor::QueryExecutor;
pub use source::{Connection, ConnectionProvider, Statement};
