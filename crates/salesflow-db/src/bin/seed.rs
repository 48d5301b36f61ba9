//! # Seed Data Generator
//!
//! Populates a development database with sample catalog data.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p salesflow-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p salesflow-db --bin seed -- --count 500
//!
//! # Specify database path
//! cargo run -p salesflow-db --bin seed -- --db ./data/salesflow.db
//! ```
//!
//! ## Generated Products
//! Products are spread over the four catalog categories. Each one gets:
//! - Unique SKU: `{CATEGORY}-{NAME}-{INDEX}`
//! - Cost between $2.00 and $49.99, price derived from cost when the index
//!   is even, an explicit price otherwise
//! - Opening stock of 0 - 60, so some start below their reorder level
//!
//! Products go through the regular create path, so every one of them also
//! gets its inventory record and opening movement.

use std::env;

use salesflow_core::{Category, NewProduct};
use salesflow_db::{Database, DbConfig};

/// Product names per category.
const CATALOG: &[(Category, &str, &[&str])] = &[
    (
        Category::Electronics,
        "ELE",
        &[
            "USB-C Charger",
            "Bluetooth Speaker",
            "Wireless Mouse",
            "Mechanical Keyboard",
            "Phone Case",
            "Power Bank",
            "HDMI Cable",
            "Earbuds",
            "Smart Bulb",
            "Webcam",
        ],
    ),
    (
        Category::Clothing,
        "CLO",
        &[
            "Cotton T-Shirt",
            "Denim Jeans",
            "Hoodie",
            "Rain Jacket",
            "Wool Socks",
            "Baseball Cap",
            "Polo Shirt",
            "Sneakers",
            "Scarf",
            "Leather Belt",
        ],
    ),
    (
        Category::Home,
        "HOM",
        &[
            "Desk Lamp",
            "Scented Candle",
            "Bath Towel",
            "Coffee Mug",
            "Throw Pillow",
            "Wall Clock",
            "Picture Frame",
            "Storage Basket",
            "Cutting Board",
            "Plant Pot",
        ],
    ),
    (
        Category::Furniture,
        "FUR",
        &[
            "Office Chair",
            "Bookshelf",
            "Side Table",
            "Bar Stool",
            "Shoe Rack",
            "Coffee Table",
            "Floor Mirror",
            "Bean Bag",
            "TV Stand",
            "Nightstand",
        ],
    ),
];

/// Variants multiplied over every name.
const VARIANTS: &[&str] = &["Black", "White", "Grey", "Blue", "Red"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./salesflow_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("SalesFlow Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./salesflow_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("SalesFlow Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    let candidates = CATALOG.iter().flat_map(|(category, code, names)| {
        names.iter().flat_map(move |name| {
            VARIANTS
                .iter()
                .map(move |variant| (*category, *code, *name, *variant))
        })
    });

    for (seed, (category, code, name, variant)) in candidates.enumerate() {
        if generated >= count {
            break;
        }

        let product = sample_product(category, code, name, variant, seed);
        let sku = product.sku.clone();

        if let Err(e) = db.products().create(product).await {
            eprintln!("Failed to insert {}: {}", sku, e);
            continue;
        }

        generated += 1;
        if generated % 50 == 0 {
            println!("  Generated {} products...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    let low = db.products().list_low_stock().await?;
    println!("  {} start at or below their reorder level", low.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn sample_product(
    category: Category,
    code: &str,
    name: &str,
    variant: &str,
    seed: usize,
) -> NewProduct {
    let initials: String = name
        .split(|c: char| c == ' ' || c == '-')
        .filter_map(|word| word.chars().next())
        .collect();

    // $2.00 - $49.99
    let cost_cents = 200 + ((seed * 37) % 4800) as i64;
    let price_cents = if seed % 2 == 0 {
        None
    } else {
        Some(cost_cents + cost_cents * (20 + (seed % 60) as i64) / 100)
    };

    NewProduct {
        name: format!("{} ({})", name, variant),
        description: Some(format!("{} {} in {}", variant, name, category.as_str())),
        sku: format!("{}-{}-{:04}", code, initials, seed),
        category: Some(category),
        price_cents,
        cost_cents,
        stock_quantity: ((seed * 13) % 61) as i64,
        min_stock_level: 5 + (seed % 6) as i64,
        supplier: Some(format!("{} Wholesale", code)),
    }
}
