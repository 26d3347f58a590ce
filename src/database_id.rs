//! Database ID type definition.

/// Alias for the integer type the store assigns to each product transaction.
pub type TransactionId = i64;
