//! Product transactions, the records every report is computed from.
//!
//! This module contains:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for reading and replacing the collection
//! - Seeding the collection from the external product feed

mod core;
mod seed;

pub(crate) use core::create_transaction_table;
pub use core::{
    Transaction, TransactionBuilder, count_transactions, create_transaction, get_all_transactions,
    replace_all_transactions,
};
pub use seed::{
    SeedRecord, SeedState, SeedSummary, fetch_seed_records, initialize_db_endpoint,
    parse_seed_records, seed_transactions,
};
