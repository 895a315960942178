//! # Seed Data Generator
//!
//! Populates a development database with a small café catalog: menu
//! variations, ingredients with stock thresholds, recipes linking the
//! two, a regular customer and a pair of promotions.
//!
//! ## Usage
//! ```bash
//! cargo run -p brew-db --bin seed
//!
//! # Specify database path
//! cargo run -p brew-db --bin seed -- --db ./data/brew.db
//! ```

use chrono::{Duration, Utc};
use std::env;
use tracing_subscriber::EnvFilter;

use brew_db::{Database, DbConfig};

/// Menu items and their size variations: (item_id, variation_id, name).
const VARIATIONS: &[(&str, &str, &str)] = &[
    ("item-americano", "var-americano-r", "Americano (R)"),
    ("item-americano", "var-americano-l", "Americano (L)"),
    ("item-latte", "var-latte-r", "Cafe Latte (R)"),
    ("item-latte", "var-latte-l", "Cafe Latte (L)"),
    ("item-matcha", "var-matcha-r", "Matcha Latte (R)"),
    ("item-croissant", "var-croissant", "Butter Croissant"),
];

/// Ingredients: (id, name, unit, main, sub, main_min, main_max, sub_min, sub_max).
const INGREDIENTS: &[(&str, &str, &str, f64, f64, f64, f64, f64, f64)] = &[
    ("ing-beans", "Espresso Beans", "g", 5000.0, 800.0, 1000.0, 10000.0, 200.0, 1500.0),
    ("ing-milk", "Whole Milk", "ml", 20000.0, 4000.0, 5000.0, 40000.0, 1000.0, 8000.0),
    ("ing-matcha", "Matcha Powder", "g", 800.0, 120.0, 200.0, 2000.0, 40.0, 300.0),
    ("ing-croissant", "Croissant (frozen)", "ea", 60.0, 12.0, 20.0, 120.0, 4.0, 24.0),
];

/// Recipes: (item_id, ingredient_id, quantity per unit sold).
const RECIPES: &[(&str, &str, f64)] = &[
    ("item-americano", "ing-beans", 18.0),
    ("item-latte", "ing-beans", 18.0),
    ("item-latte", "ing-milk", 200.0),
    ("item-matcha", "ing-matcha", 4.0),
    ("item-matcha", "ing-milk", 220.0),
    ("item-croissant", "ing-croissant", 1.0),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./brew_dev.db");

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
                println!("Brew POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./brew_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Brew POS Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Skip if already seeded
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM variations")
        .fetch_one(db.pool())
        .await?;
    if existing > 0 {
        println!("⚠ Database already has {} variations", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    println!();
    println!("Seeding catalog...");

    for &(item_id, variation_id, name) in VARIATIONS {
        sqlx::query("INSERT INTO variations (id, item_id, name) VALUES (?1, ?2, ?3)")
            .bind(variation_id)
            .bind(item_id)
            .bind(name)
            .execute(db.pool())
            .await?;
    }
    println!("  {} variations", VARIATIONS.len());

    for &(id, name, unit, main, sub, main_min, main_max, sub_min, sub_max) in INGREDIENTS {
        sqlx::query(
            r#"
            INSERT INTO ingredients (id, name, unit, main_stock, sub_stock,
                                     main_min, main_max, sub_min, sub_max,
                                     created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(unit)
        .bind(main)
        .bind(sub)
        .bind(main_min)
        .bind(main_max)
        .bind(sub_min)
        .bind(sub_max)
        .bind(now)
        .execute(db.pool())
        .await?;
    }
    println!("  {} ingredients", INGREDIENTS.len());

    for &(item_id, ingredient_id, quantity) in RECIPES {
        sqlx::query("INSERT INTO recipes (item_id, ingredient_id, quantity) VALUES (?1, ?2, ?3)")
            .bind(item_id)
            .bind(ingredient_id)
            .bind(quantity)
            .execute(db.pool())
            .await?;
    }
    println!("  {} recipe rows", RECIPES.len());

    sqlx::query(
        "INSERT INTO customers (id, name, loyalty_points) VALUES ('cust-demo', 'Demo Regular', 120)",
    )
    .execute(db.pool())
    .await?;
    println!("  1 customer");

    for (id, code, kind, value) in [
        ("promo-welcome", "WELCOME10", "percentage", 10.0),
        ("promo-flat", "FLAT5000", "fixed", 5000.0),
    ] {
        sqlx::query(
            r#"
            INSERT INTO promotions (id, code, kind, value, starts_at, ends_at, active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(kind)
        .bind(value)
        .bind(now - Duration::days(1))
        .bind(now + Duration::days(90))
        .execute(db.pool())
        .await?;
    }
    println!("  2 promotions");

    // Smoke-check the recipe resolver over the seeded join
    println!();
    println!("Verifying recipe resolution...");
    let recipes = db.stock().recipes_for_variation("var-latte-l").await?;
    println!("  Latte (L): {} recipe rows", recipes.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
