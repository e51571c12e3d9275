//! Seed data script - populates the database with demo sales records
//!
//! Run with: cargo run --bin seed-data

use std::sync::Arc;

use anyhow::Context;
use rust_decimal_macros::dec;
use tracing::info;

use sales_data_api::{config, db, dto::SalesDataInput, services::SalesDataService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("=== Sales Data API Seed Data ===");

    let cfg = config::load_config().context("failed to load configuration")?;
    info!("Connecting to database: {}", cfg.database_url());
    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;
    db::run_migrations(&pool).await?;

    let service = SalesDataService::new(Arc::new(pool));

    let records = vec![
        ("Wireless Headphones", dec!(1250.50), dec!(980.00), dec!(1100.00), dec!(1420.75), dec!(5000.00)),
        ("USB-C Charger 65W", dec!(640.00), dec!(720.25), dec!(810.00), dec!(905.10), dec!(3000.00)),
        ("Mechanical Keyboard", dec!(2100.00), dec!(1875.40), dec!(1990.00), dec!(2400.00), dec!(8000.00)),
        ("4K Webcam", dec!(450.00), dec!(380.00), dec!(515.75), dec!(600.00), dec!(2500.00)),
        ("Canvas Backpack", dec!(300.00), dec!(0.00), dec!(275.50), dec!(410.00), dec!(1200.00)),
    ];

    let mut created = 0;
    for (name, q1, q2, q3, q4, target) in records {
        let record = service
            .create(SalesDataInput {
                product_name: name.to_string(),
                q1_sales: q1,
                q2_sales: q2,
                q3_sales: q3,
                q4_sales: q4,
                target,
            })
            .await
            .with_context(|| format!("failed to seed '{}'", name))?;
        info!("  Created #{} {}", record.id, record.product_name);
        created += 1;
    }

    info!("=== Seed Data Complete: {} records ===", created);
    info!("Try: curl http://{}:{}/api/sales-data", cfg.host, cfg.port);
    info!("Or explore interactively at: http://{}:{}/swagger-ui", cfg.host, cfg.port);

    Ok(())
}
