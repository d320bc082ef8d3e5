//! Database seeder for Comptoir development and testing.
//!
//! Seeds an admin account, a small catalogue, partners and employees so a
//! fresh database can be explored right away. Everything goes through the
//! repositories, so the same validation applies as for API requests.
//!
//! Usage: cargo run --bin seeder
//!
//! The seed is skipped when the admin account already exists.

use anyhow::Context;
use chrono::NaiveDate;
use comptoir_core::auth::hash_password;
use comptoir_db::entities::sea_orm_active_enums::{ProductKind, UserRole};
use comptoir_db::repositories::client::CreateClientInput;
use comptoir_db::repositories::commercial::CreateCommercialInput;
use comptoir_db::repositories::employee::CreateEmployeeInput;
use comptoir_db::repositories::product::CreateProductInput;
use comptoir_db::repositories::supplier::{ContactDetails, CreateSupplierInput};
use comptoir_db::repositories::user::CreateUserInput;
use comptoir_db::{
    ClientRepository, CommercialRepository, EmployeeRepository, ProductRepository,
    SupplierRepository, UserRepository,
};
use comptoir_shared::AppConfig;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing::info;

const ADMIN_EMAIL: &str = "admin@comptoir.dev";
const ADMIN_PASSWORD: &str = "comptoir123";

/// `(sku, name, kind, unit, sale price, unit cost, reorder level)`
const PRODUCTS: &[(&str, &str, ProductKind, &str, &str, &str, &str)] = &[
    ("RM-FLOUR", "Wheat flour", ProductKind::RawMaterial, "kg", "0", "0.80", "50"),
    ("RM-SUGAR", "Sugar", ProductKind::RawMaterial, "kg", "0", "1.10", "20"),
    ("RM-BUTTER", "Butter", ProductKind::RawMaterial, "kg", "0", "6.50", "10"),
    ("FG-BISCUIT", "Butter biscuits 500g", ProductKind::FinishedGood, "pcs", "4.90", "0", "30"),
    ("MD-WATER", "Mineral water 1.5L", ProductKind::Merchandise, "pcs", "0.90", "0.35", "100"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter("seeder=info,comptoir_db=info")
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = comptoir_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let users = UserRepository::new(db.clone());
    if users.find_by_email(ADMIN_EMAIL).await?.is_some() {
        info!("admin account already exists, skipping seed");
        return Ok(());
    }

    seed_admin(&users).await?;
    seed_products(&db).await?;
    seed_partners(&db).await?;
    seed_employees(&db).await?;

    info!("seeding complete");
    Ok(())
}

async fn seed_admin(users: &UserRepository) -> anyhow::Result<()> {
    let user = users
        .create(CreateUserInput {
            email: ADMIN_EMAIL.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD)?,
            full_name: "Comptoir Admin".to_string(),
            role: UserRole::Admin,
        })
        .await?;
    info!(email = %user.email, "seeded admin account");
    Ok(())
}

async fn seed_products(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = ProductRepository::new(db.clone());
    for (sku, name, kind, unit, sale_price, unit_cost, reorder_level) in PRODUCTS {
        repo.create(CreateProductInput {
            sku: (*sku).to_string(),
            name: (*name).to_string(),
            description: None,
            kind: *kind,
            unit: (*unit).to_string(),
            sale_price: sale_price.parse::<Decimal>()?,
            unit_cost: unit_cost.parse::<Decimal>()?,
            reorder_level: reorder_level.parse::<Decimal>()?,
        })
        .await?;
    }
    info!(count = PRODUCTS.len(), "seeded products");
    Ok(())
}

async fn seed_partners(db: &DatabaseConnection) -> anyhow::Result<()> {
    SupplierRepository::new(db.clone())
        .create(CreateSupplierInput {
            name: "Moulins du Nord".to_string(),
            contact: ContactDetails {
                contact_name: Some("Karim Benali".to_string()),
                phone: Some("+212 522 000 111".to_string()),
                ..ContactDetails::default()
            },
        })
        .await?;

    ClientRepository::new(db.clone())
        .create(CreateClientInput {
            name: "Epicerie Centrale".to_string(),
            contact: ContactDetails {
                email: Some("achats@epicerie-centrale.example".to_string()),
                ..ContactDetails::default()
            },
            credit_limit: Decimal::new(5_000, 0),
        })
        .await?;

    CommercialRepository::new(db.clone())
        .create(CreateCommercialInput {
            name: "Youssef Amrani".to_string(),
            phone: Some("+212 661 000 222".to_string()),
            email: None,
            vehicle_plate: Some("12345-A-6".to_string()),
            commission_rate: Decimal::new(25, 1),
        })
        .await?;

    info!("seeded supplier, client and commercial");
    Ok(())
}

async fn seed_employees(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = EmployeeRepository::new(db.clone());
    let hire_date = NaiveDate::from_ymd_opt(2025, 1, 6).context("invalid hire date")?;

    for (code, first, last, position, salary) in [
        ("EMP-001", "Salma", "Idrissi", "Warehouse lead", 6_500),
        ("EMP-002", "Omar", "Tazi", "Baker", 4_800),
    ] {
        repo.create(CreateEmployeeInput {
            employee_code: code.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: None,
            phone: None,
            position: Some(position.to_string()),
            department: Some("Production".to_string()),
            hire_date,
            base_salary: Decimal::new(salary, 0),
            overtime_multiplier: None,
        })
        .await?;
    }
    info!("seeded employees");
    Ok(())
}
