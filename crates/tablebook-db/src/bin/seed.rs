//! # Table Layout Seeder
//!
//! Creates the database and inserts the restaurant's table layout.
//!
//! ## Usage
//! ```bash
//! # Default layout into ./tablebook.db
//! cargo run -p tablebook-db --bin seed
//!
//! # Custom layout
//! cargo run -p tablebook-db --bin seed -- --layout "1:2,2:4,3:4,10:8"
//!
//! # Specify database path
//! cargo run -p tablebook-db --bin seed -- --db ./data/tablebook.db
//! ```
//!
//! Tables that already exist keep their current status, so running the
//! seeder against a live database only adds new tables.

use std::env;

use tablebook_core::validation::parse_table_layout;
use tablebook_core::{TableRegistry, DEFAULT_TABLE_LAYOUT};
use tablebook_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./tablebook.db");
    let mut layout = String::from(DEFAULT_TABLE_LAYOUT);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--layout" | "-l" => {
                if i + 1 < args.len() {
                    layout = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tablebook Table Layout Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>        Database file path (default: ./tablebook.db)");
                println!(
                    "  -l, --layout <LAYOUT>  id:capacity list (default: {})",
                    DEFAULT_TABLE_LAYOUT
                );
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                return Err(format!("unknown argument '{}'", other).into());
            }
        }
        i += 1;
    }

    let tables = parse_table_layout(&layout)?;

    println!("Tablebook Table Layout Seeder");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Tables:   {}", tables.len());
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let inserted = db.tables().seed(&tables).await?;
    println!("✓ Inserted {} new tables ({} already present)", inserted, tables.len() - inserted);

    println!();
    for table in db.tables().list_tables().await? {
        println!("  table {:>3}  seats {:>2}  {}", table.id, table.capacity, table.status);
    }

    db.close().await;
    Ok(())
}
