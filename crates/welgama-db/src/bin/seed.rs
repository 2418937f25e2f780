//! # Seed Data Generator
//!
//! Populates the database with development data: a hardware-store
//! catalog, categories/units, and a few customers with open books.
//!
//! ## Usage
//! ```bash
//! cargo run -p welgama-db --bin seed
//! cargo run -p welgama-db --bin seed -- --db ./data/welgama.db
//! ```

use chrono::Utc;
use std::env;
use uuid::Uuid;
use welgama_core::{Customer, Product};
use welgama_db::{Database, DbConfig};

/// Hardware catalog: (category, unit, [(name, cost_cents, price_cents, stock)])
const CATALOG: &[(&str, &str, &[(&str, i64, i64, i64)])] = &[
    (
        "Fasteners",
        "kg",
        &[
            ("Wire Nails 1 inch", 28000, 38000, 40),
            ("Wire Nails 2 inch", 26000, 36000, 55),
            ("Wire Nails 4 inch", 25000, 34000, 60),
            ("Roofing Nails", 42000, 56000, 25),
            ("U Nails", 45000, 60000, 12),
        ],
    ),
    (
        "Plumbing",
        "pcs",
        &[
            ("PVC Pipe 1/2 inch", 28000, 39000, 80),
            ("PVC Pipe 3/4 inch", 36000, 49000, 64),
            ("PVC Elbow 1/2 inch", 3000, 5000, 150),
            ("PVC T Joint 1/2 inch", 3500, 6000, 120),
            ("Gate Valve 1/2 inch", 48000, 68000, 18),
            ("Tap Classic Chrome", 95000, 135000, 10),
        ],
    ),
    (
        "Paint",
        "l",
        &[
            ("Emulsion White 4L", 320000, 410000, 14),
            ("Weather Shield 4L", 520000, 655000, 8),
            ("Enamel Black 1L", 98000, 129000, 22),
            ("Wood Primer 1L", 88000, 115000, 16),
            ("Thinner 500ml", 38000, 52000, 30),
        ],
    ),
    (
        "Electrical",
        "pcs",
        &[
            ("Wiring Cable 1mm x 100m", 780000, 980000, 6),
            ("Switch 1-Gang", 18000, 26000, 45),
            ("Socket Outlet 13A", 32000, 45000, 38),
            ("LED Bulb 9W", 28000, 39000, 90),
            ("Junction Box", 9000, 14000, 70),
        ],
    ),
    (
        "Tools",
        "pcs",
        &[
            ("Claw Hammer", 95000, 130000, 9),
            ("Screwdriver Set", 120000, 165000, 7),
            ("Hacksaw Frame", 78000, 105000, 11),
            ("Measuring Tape 5m", 45000, 62000, 20),
            ("Spirit Level 600mm", 110000, 150000, 5),
        ],
    ),
    (
        "Cement & Aggregate",
        "bag",
        &[
            ("Cement 50kg", 195000, 232000, 120),
            ("Tile Adhesive 25kg", 145000, 185000, 30),
            ("White Cement 1kg", 18000, 26000, 44),
        ],
    ),
];

/// Seed customers: (name, phone, opening_balance_cents)
const CUSTOMERS: &[(&str, &str, i64)] = &[
    ("Sunil Perera", "0712345678", 0),
    ("Kumara Constructions", "0777654321", 0),
    ("Nimal Silva", "0756781234", 0),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./welgama_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Welgama POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./welgama_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Welgama POS Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("Database already has {} products", existing);
        println!("Skipping seed to avoid duplicates.");
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();
    let mut generated = 0;

    let mut units_seen: Vec<&str> = Vec::new();
    for (category, unit, products) in CATALOG {
        db.catalog().insert_category(category).await?;
        if !units_seen.contains(unit) {
            db.catalog().insert_unit(unit).await?;
            units_seen.push(*unit);
        }

        for (name, cost, price, stock) in products.iter() {
            let product = Product {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                category: category.to_string(),
                unit: unit.to_string(),
                cost_price_cents: *cost,
                selling_price_cents: *price,
                quantity: *stock,
                low_stock_threshold: 5,
                created_at: now,
                updated_at: now,
            };

            if let Err(e) = db.products().insert(&product).await {
                eprintln!("Failed to insert {}: {}", product.name, e);
                continue;
            }
            generated += 1;
        }
    }

    println!("Generated {} products", generated);

    for (name, phone, balance) in CUSTOMERS {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: Some(phone.to_string()),
            address: None,
            balance_cents: *balance,
            created_at: now,
            updated_at: now,
        };
        db.customers().insert(&customer).await?;
    }

    println!("Generated {} customers", CUSTOMERS.len());
    println!();
    println!("Seed complete!");

    Ok(())
}
