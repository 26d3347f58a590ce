use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use salesboard::{
    initialize_db,
    transaction::{fetch_seed_records, parse_seed_records, seed_transactions},
};

/// A utility for replacing the transactions in a salesboard database with a JSON product feed.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path of the SQLite database, created if it does not exist.
    #[arg(long, short)]
    db_path: String,

    /// File path of the JSON product feed.
    #[arg(long, short, required_unless_present = "url", conflicts_with = "url")]
    json_path: Option<String>,

    /// URL of the JSON product feed.
    #[arg(long, short)]
    url: Option<String>,
}

/// Load a product feed into the database, replacing what was there.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let records = match (&args.json_path, &args.url) {
        (Some(json_path), _) => {
            let json_path = Path::new(json_path);
            if !json_path.is_file() {
                eprintln!("No product feed found at {json_path:#?}!");
                exit(1);
            }

            println!("Reading product feed from {json_path:#?}");
            let feed = std::fs::read_to_string(json_path)?;
            parse_seed_records(&feed)?
        }
        (None, Some(url)) => {
            println!("Downloading product feed from {url}");
            fetch_seed_records(url).await?
        }
        (None, None) => {
            eprintln!("Either --json-path or --url must be given!");
            exit(1);
        }
    };

    println!("Opening database at {:#?}", args.db_path);
    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    let count = seed_transactions(records, &conn)?;

    println!("Stored {count} transactions. Success!");

    Ok(())
}
