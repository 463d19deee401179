//! # Seed Data Generator
//!
//! Populates the database with a development branch, employees, the standard
//! service catalog and a handful of receipts.
//!
//! ## Usage
//! ```bash
//! # Seed with defaults (20 receipts)
//! cargo run -p typedesk-db --bin seed
//!
//! # Generate a custom number of receipts
//! cargo run -p typedesk-db --bin seed -- --receipts 100
//!
//! # Specify database path
//! cargo run -p typedesk-db --bin seed -- --db ./data/typedesk.db
//! ```
//!
//! ## Generated Data
//! - One branch (`BR-01`, "Downtown Typing Center")
//! - Three employees attached to it
//! - The standard six-service catalog (typing, photocopying, printing,
//!   scanning, lamination, binding) with its usual prices and commission rates
//! - Random receipts spread across the employees and services

use std::env;

use chrono::Utc;
use rand::Rng;
use typedesk_core::{Branch, Employee, LineRequest, ServiceOffering};
use typedesk_db::{CreateReceipt, Database, DbConfig};
use uuid::Uuid;

/// The standard catalog: (id, name, unit price in cents, commission in bps).
const SERVICES: &[(&str, &str, i64, u32)] = &[
    ("typing", "Typing (per page)", 500, 1000),
    ("photocopying", "Photocopying (per page)", 50, 500),
    ("printing", "Printing (per page)", 100, 800),
    ("scanning", "Scanning (per document)", 200, 1500),
    ("lamination", "Lamination (per sheet)", 300, 2000),
    ("binding", "Binding (per document)", 1000, 2500),
];

const EMPLOYEES: &[(&str, &str)] = &[
    ("EMP-01", "Aisha Rahman"),
    ("EMP-02", "Omar Siddiqui"),
    ("EMP-03", "Fatima Noor"),
];

const CUSTOMERS: &[&str] = &[
    "Jane Doe",
    "Hassan Ali",
    "Maria Garcia",
    "Chen Wei",
    "Adebayo Okafor",
    "Priya Sharma",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut receipt_count: usize = 20;
    let mut db_path = String::from("./typedesk_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--receipts" | "-r" => {
                if i + 1 < args.len() {
                    receipt_count = args[i + 1].parse().unwrap_or(20);
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
                println!("Typedesk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -r, --receipts <N>  Number of receipts to generate (default: 20)");
                println!("  -d, --db <PATH>     Database file path (default: ./typedesk_dev.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Typedesk Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Receipts: {}", receipt_count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Refuse to double-seed
    let existing = db.services().list_active().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} services", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    // Branch
    let branch = Branch {
        id: Uuid::new_v4().to_string(),
        branch_code: "BR-01".to_string(),
        name: "Downtown Typing Center".to_string(),
        is_active: true,
        created_at: now,
    };
    db.branches().insert(&branch).await?;
    println!("✓ Branch {} created", branch.branch_code);

    // Employees
    let mut employee_ids = Vec::new();
    for (code, full_name) in EMPLOYEES {
        let employee = Employee {
            id: Uuid::new_v4().to_string(),
            branch_id: branch.id.clone(),
            employee_code: code.to_string(),
            full_name: full_name.to_string(),
            is_active: true,
            created_at: now,
        };
        db.employees().insert(&employee).await?;
        employee_ids.push(employee.id);
    }
    println!("✓ {} employees created", employee_ids.len());

    // Service catalog
    for (id, name, price_cents, rate_bps) in SERVICES {
        db.services()
            .insert(&ServiceOffering {
                id: id.to_string(),
                name: name.to_string(),
                unit_price_cents: *price_cents,
                commission_rate_bps: *rate_bps,
                is_active: true,
                created_at: now,
            })
            .await?;
    }
    println!("✓ {} services created", SERVICES.len());

    // Receipts
    println!();
    println!("Generating receipts...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    for n in 0..receipt_count {
        let employee_id = &employee_ids[n % employee_ids.len()];
        let customer = CUSTOMERS[n % CUSTOMERS.len()];

        let lines = random_lines();
        let request = CreateReceipt {
            employee_id: employee_id.clone(),
            customer_name: customer.to_string(),
            customer_phone: Some(format!("050-{:07}", rand::thread_rng().gen_range(0..9_999_999))),
            customer_email: None,
            notes: None,
            lines,
        };

        match db.receipts().create(request).await {
            Ok(created) => {
                generated += 1;
                if generated % 25 == 0 {
                    println!("  Generated {} receipts...", generated);
                }
                if n == 0 {
                    println!("  First receipt: {}", created.receipt.receipt_number);
                }
            }
            Err(e) => eprintln!("Failed to create receipt: {}", e),
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} receipts in {:?}", generated, elapsed);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// One to three random lines drawn from the catalog.
fn random_lines() -> Vec<LineRequest> {
    let mut rng = rand::thread_rng();
    let line_count = rng.gen_range(1..=3);

    (0..line_count)
        .map(|_| {
            let (service_id, _, _, _) = SERVICES[rng.gen_range(0..SERVICES.len())];
            LineRequest {
                service_id: service_id.to_string(),
                quantity: rng.gen_range(1..=10),
            }
        })
        .collect()
}
