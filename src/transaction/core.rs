//! Defines the product transaction model and the database queries that read and replace it.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// A product listing and whether it sold, i.e. one record of the sales collection.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID the store assigned to the transaction.
    pub id: TransactionId,
    /// The product name.
    pub title: String,
    /// A free text description of the product.
    pub description: String,
    /// The listed price of the product. Never negative.
    pub price: f64,
    /// A short label for the kind of product, e.g. "electronics".
    pub category: String,
    /// When the product was sold, as the text the external feed supplied.
    ///
    /// This is never parsed as a date. Reports compare it as plain text,
    /// see [crate::report::match_month_by_substring].
    pub date_of_sale: String,
    /// Whether the product was sold.
    pub sold: bool,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(title: &str, price: f64, date_of_sale: &str) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            description: String::new(),
            price,
            category: String::new(),
            date_of_sale: date_of_sale.to_owned(),
            sold: false,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The store assigns the ID when the builder is inserted with
/// [create_transaction] or [replace_all_transactions].
///
/// # Examples
///
/// ```ignore
/// use crate::transaction::Transaction;
///
/// let builder = Transaction::build("Mens Cotton Jacket", 55.99, "2021-10-27T20:29:54+05:30")
///     .category("men's clothing")
///     .sold(true);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The product name.
    pub title: String,
    /// Defaults to an empty string.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// Defaults to an empty string.
    pub category: String,
    /// The sale date text, stored as is.
    pub date_of_sale: String,
    /// Defaults to `false`.
    pub sold: bool,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the product was sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a [Error::StoreUnavailable] if there is an SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO product_transaction (title, description, price, category, date_of_sale, sold)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, title, description, price, category, date_of_sale, sold",
        )?
        .query_row(
            (
                builder.title,
                builder.description,
                builder.price,
                builder.category,
                builder.date_of_sale,
                builder.sold,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get every transaction in the database, in the order they were inserted.
///
/// The rows are read with a single statement, so the result is a consistent
/// snapshot even if [replace_all_transactions] runs on another connection.
///
/// # Errors
/// This function will return a [Error::StoreUnavailable] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    let mut stmt = connection.prepare(
        "SELECT id, title, description, price, category, date_of_sale, sold
         FROM product_transaction
         ORDER BY id ASC",
    )?;

    stmt.query_map([], map_transaction_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::StoreUnavailable] if there is an SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u64, Error> {
    let count: i64 =
        connection.query_row("SELECT COUNT(id) FROM product_transaction;", [], |row| {
            row.get(0)
        })?;

    u64::try_from(count)
        .map_err(|error| Error::StoreUnavailable(format!("invalid transaction count {count}: {error}")))
}

/// Replace the entire collection with `builders`.
///
/// The delete and the inserts run in one exclusive SQL transaction, so
/// readers see either the old collection or the new one, never a mix.
/// IDs are assigned from 1 again in the order of `builders`.
///
/// Returns the number of inserted transactions.
///
/// # Errors
/// This function will return a [Error::StoreUnavailable] if there is an SQL
/// error, in which case the old collection is left untouched.
pub fn replace_all_transactions(
    builders: Vec<TransactionBuilder>,
    connection: &Connection,
) -> Result<usize, Error> {
    let sql_transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    sql_transaction.execute("DELETE FROM product_transaction", ())?;
    sql_transaction.execute(
        "UPDATE sqlite_sequence SET seq = 0 WHERE name = 'product_transaction'",
        (),
    )?;

    let count = builders.len();
    for builder in builders {
        create_transaction(builder, &sql_transaction)?;
    }

    sql_transaction.commit()?;

    Ok(count)
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub(crate) fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS product_transaction (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL CHECK (price >= 0),
                category TEXT NOT NULL,
                date_of_sale TEXT NOT NULL,
                sold INTEGER NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT INTO sqlite_sequence (name, seq)
         SELECT 'product_transaction', 0
         WHERE NOT EXISTS (SELECT 1 FROM sqlite_sequence WHERE name = 'product_transaction')",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let description = row.get(2)?;
    let price = row.get(3)?;
    let category = row.get(4)?;
    let date_of_sale = row.get(5)?;
    let sold = row.get(6)?;

    Ok(Transaction {
        id,
        title,
        description,
        price,
        category,
        date_of_sale,
        sold,
    })
}

// ============================================================================
// TESTS
// ============================================================================
