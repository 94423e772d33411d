//! Seed the database with demo data.
//!
//! Inserts two demo distributors with their accounts, products, and logins
//! so the API can be exercised immediately after `migrate`. Running it
//! against a database that already has products is a no-op.

use sqlx::SqlitePool;
use tracing::{info, warn};

use feather_core::{DistributorId, Role};
use feather_storefront::db;

struct SeedAccount {
    name: &'static str,
    city: &'static str,
    state: &'static str,
    price_level: &'static str,
    payment_terms: &'static str,
    email: &'static str,
}

struct SeedProduct {
    name: &'static str,
    sku: &'static str,
    unit_price: &'static str,
    category: &'static str,
}

struct SeedDistributor {
    id: i64,
    name: &'static str,
    admin_username: &'static str,
    admin_password: &'static str,
    accounts: &'static [SeedAccount],
    products: &'static [SeedProduct],
}

const DISTRIBUTORS: &[SeedDistributor] = &[
    SeedDistributor {
        id: 1,
        name: "Sunshine Distributors",
        admin_username: "sunshine-admin",
        admin_password: "sunshine123",
        accounts: &[
            SeedAccount {
                name: "Joe's Grocery",
                city: "Springfield",
                state: "OR",
                price_level: "standard",
                payment_terms: "net30",
                email: "orders@joesgrocery.example",
            },
            SeedAccount {
                name: "Fresh Farm Market",
                city: "Eugene",
                state: "OR",
                price_level: "preferred",
                payment_terms: "net15",
                email: "buyer@freshfarm.example",
            },
        ],
        products: &[
            SeedProduct {
                name: "Organic Bananas",
                sku: "BAN001",
                unit_price: "1.99",
                category: "produce",
            },
            SeedProduct {
                name: "Almond Milk",
                sku: "ALM002",
                unit_price: "3.49",
                category: "dairy",
            },
        ],
    },
    SeedDistributor {
        id: 2,
        name: "Northwind Wholesalers",
        admin_username: "northwind-admin",
        admin_password: "northwind123",
        accounts: &[SeedAccount {
            name: "City Mini Mart",
            city: "Portland",
            state: "OR",
            price_level: "standard",
            payment_terms: "net30",
            email: "manager@cityminimart.example",
        }],
        products: &[SeedProduct {
            name: "Sparkling Water",
            sku: "SPK003",
            unit_price: "0.99",
            category: "beverages",
        }],
    },
];

/// Seed demo distributors, accounts, products, and admin logins.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url();

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;
    if existing > 0 {
        warn!("Database already contains products; nothing to do");
        return Ok(());
    }

    let mut accounts = 0usize;
    let mut products = 0usize;

    for distributor in DISTRIBUTORS {
        let distributor_id = DistributorId::new(distributor.id);

        for account in distributor.accounts {
            insert_account(&pool, distributor_id, account).await?;
            accounts += 1;
        }
        for product in distributor.products {
            insert_product(&pool, distributor_id, product).await?;
            products += 1;
        }

        sqlx::query(
            r"
            INSERT INTO users (username, password, distributor_id, distributor_name, role, account_id)
            VALUES (?, ?, ?, ?, ?, NULL)
            ",
        )
        .bind(distributor.admin_username)
        .bind(distributor.admin_password)
        .bind(distributor_id)
        .bind(distributor.name)
        .bind(Role::Admin.to_string())
        .execute(&pool)
        .await?;
    }

    info!("Seeding complete!");
    info!("  Distributors: {}", DISTRIBUTORS.len());
    info!("  Accounts inserted: {accounts}");
    info!("  Products inserted: {products}");
    info!("  Admin logins: {}", DISTRIBUTORS.len());

    Ok(())
}

async fn insert_account(
    pool: &SqlitePool,
    distributor_id: DistributorId,
    account: &SeedAccount,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO accounts (distributor_id, name, city, state, price_level, payment_terms, email)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(distributor_id)
    .bind(account.name)
    .bind(account.city)
    .bind(account.state)
    .bind(account.price_level)
    .bind(account.payment_terms)
    .bind(account.email)
    .execute(pool)
    .await?;
    Ok(())
}

async fn insert_product(
    pool: &SqlitePool,
    distributor_id: DistributorId,
    product: &SeedProduct,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO products (distributor_id, name, sku, unit_price, category)
        VALUES (?, ?, ?, ?, ?)
        ",
    )
    .bind(distributor_id)
    .bind(product.name)
    .bind(product.sku)
    .bind(product.unit_price)
    .bind(product.category)
    .execute(pool)
    .await?;
    Ok(())
}
