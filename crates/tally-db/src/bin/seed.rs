//! # Seed Data Generator
//!
//! Populates the database with test suppliers, products and sales for
//! development.
//!
//! ## Usage
//! ```bash
//! # Generate 500 products (default)
//! cargo run -p tally-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p tally-db --bin seed -- --count 2000
//!
//! # Specify database path and owner
//! cargo run -p tally-db --bin seed -- --db ./data/tally.db --owner <uuid>
//! ```
//!
//! ## Generated Data
//! - A handful of suppliers with contact details
//! - Products across categories (beverages, snacks, dairy, frozen, grocery)
//!   with realistic prices ($0.99 - $19.99) and stock levels (0 - 100, so
//!   all three stock buckets are represented)
//! - A sale recorded for roughly every third product, so reports have data

use std::env;
use tally_core::{NewProduct, NewSupplier, NewTransaction};
use tally_db::{Database, DbConfig};
use uuid::Uuid;

/// Owner id used when --owner is not given. Matches the dev login fixture.
const DEV_OWNER_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Product categories for realistic test data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Beverages",
        &[
            "Coca-Cola",
            "Pepsi",
            "Sprite",
            "Red Bull",
            "Gatorade",
            "Orange Juice",
            "Apple Juice",
            "Lemonade",
            "Iced Tea",
            "Coffee",
        ],
    ),
    (
        "Snacks",
        &[
            "Lays Classic",
            "Doritos Nacho",
            "Pringles",
            "Snickers",
            "Kit Kat",
            "Skittles",
            "Oreos",
            "Goldfish",
            "Pretzels",
            "Gummy Bears",
        ],
    ),
    (
        "Dairy",
        &[
            "Whole Milk",
            "Almond Milk",
            "Cheddar Cheese",
            "Mozzarella",
            "Butter",
            "Greek Yogurt",
            "Sour Cream",
            "Heavy Cream",
            "Eggs Dozen",
            "Parmesan",
        ],
    ),
    (
        "Frozen",
        &[
            "Vanilla Ice Cream",
            "Chocolate Ice Cream",
            "Frozen Pizza",
            "Frozen Burrito",
            "Popsicles",
            "Frozen Vegetables",
            "Frozen Waffles",
            "Fish Sticks",
            "Chicken Nuggets",
            "Sorbet",
        ],
    ),
    (
        "Grocery",
        &[
            "White Bread",
            "Pasta Spaghetti",
            "Rice White",
            "Canned Beans",
            "Canned Soup",
            "Oatmeal",
            "Peanut Butter",
            "Honey",
            "Flour",
            "Sugar",
        ],
    ),
];

/// Size variants for products
const SIZES: &[(&str, i64)] = &[
    ("Small", 0),
    ("Medium", 100),
    ("Large", 200),
    ("12oz", 0),
    ("16oz", 50),
    ("2L", 150),
    ("6-Pack", 300),
    ("12-Pack", 500),
];

const SUPPLIERS: &[(&str, &str, &str)] = &[
    ("Northwind Traders", "Ada Fuller", "ada@northwind.example"),
    ("Contoso Wholesale", "Ben Rivera", "ben@contoso.example"),
    ("Fabrikam Foods", "Caro Lang", "caro@fabrikam.example"),
    ("Tailspin Goods", "Dev Osei", "dev@tailspin.example"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug surfaces the repository-level query logging.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path = String::from("./tally_dev.db");
    let mut owner_id = String::from(DEV_OWNER_ID);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--owner" | "-o" => {
                if i + 1 < args.len() {
                    owner_id = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tally Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./tally_dev.db)");
                println!("  -o, --owner <ID>   Owner id to seed under (default: dev fixture)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    if Uuid::parse_str(&owner_id).is_err() {
        eprintln!("--owner must be a UUID");
        std::process::exit(1);
    }

    println!("🌱 Tally Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Owner:    {}", owner_id);
    println!("Products: {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products for this owner
    let existing = db.products().count(&owner_id).await?;
    if existing > 0 {
        println!("⚠ Owner already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Suppliers first so products can reference them
    println!();
    println!("Creating suppliers...");
    let mut supplier_ids = Vec::new();
    for (name, contact, email) in SUPPLIERS {
        let supplier = db
            .suppliers()
            .create(
                &owner_id,
                NewSupplier {
                    name: name.to_string(),
                    contact_person: contact.to_string(),
                    email: email.to_string(),
                    phone: "+1 555 0100".to_string(),
                    address: None,
                },
            )
            .await?;
        supplier_ids.push(supplier.id);
    }
    println!("✓ Created {} suppliers", supplier_ids.len());

    // Generate products
    println!();
    println!("Generating products...");

    let mut generated = 0;
    let mut sales = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (_category, names)) in CATEGORIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (size_idx, (size, price_addon)) in SIZES.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = category_idx * 1000 + name_idx * 20 + size_idx;
                let input = generate_product(name, size, *price_addon, seed, &supplier_ids);

                let product = match db.products().create(&owner_id, input).await {
                    Ok(product) => product,
                    Err(e) => {
                        eprintln!("Failed to insert {} {}: {}", name, size, e);
                        continue;
                    }
                };

                generated += 1;

                // A sale for roughly every third product with stock.
                if seed % 3 == 0 && product.stock_quantity > 0 {
                    let quantity = 1 + (seed % product.stock_quantity.min(5) as usize) as i64;
                    db.transactions()
                        .record(
                            &owner_id,
                            NewTransaction {
                                product_id: product.id.clone(),
                                product_name: product.name.clone(),
                                quantity,
                                unit_price_cents: product.price_cents,
                                total_cents: quantity * product.price_cents,
                            },
                        )
                        .await?;
                    sales += 1;
                }

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);
    println!("✓ Recorded {} sales", sales);

    let stats = db.products().stats(&owner_id).await?;
    println!();
    println!("Inventory summary:");
    println!("  Total products: {}", stats.total_products);
    println!("  Low stock:      {}", stats.low_stock_count);
    println!("  Out of stock:   {}", stats.out_of_stock_count);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with realistic data.
fn generate_product(
    name: &str,
    size: &str,
    price_addon: i64,
    seed: usize,
    supplier_ids: &[String],
) -> NewProduct {
    // Base $1.99-$9.99 + size addon
    let base_price = 199 + ((seed * 17) % 800) as i64;
    let price_cents = base_price + price_addon;

    // Stock 0-100 so every stock bucket shows up
    let stock_quantity = (seed % 101) as i64;

    NewProduct {
        name: format!("{} {}", name, size),
        price_cents,
        stock_quantity,
        supplier_id: supplier_ids[seed % supplier_ids.len()].clone(),
    }
}
