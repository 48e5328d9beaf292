//! Common test utilities for integration tests
//!
//! Shared fixtures for seeding a brokerage database. Offices, agents and
//! clients have no write operation of their own, so they are inserted with
//! plain SQL.

#![allow(dead_code)]

use std::path::PathBuf;

use brokerage::adapters::sqlite::create_migrated_test_pool;
use brokerage::domain::models::Record;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Create a temporary directory holding a database file path.
pub fn temp_db_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    (dir, db_path)
}

/// Initialize a tracing subscriber that writes through the test harness.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Fresh in-memory database with the schema applied.
pub async fn test_pool() -> SqlitePool {
    create_migrated_test_pool()
        .await
        .expect("failed to create test database")
}

pub async fn insert_office(pool: &SqlitePool, name: &str, city: &str) -> i64 {
    sqlx::query(
        "INSERT INTO offices (office_name, street, city, state, zipcode, phone)
         VALUES (?, '1 Main St', ?, 'IL', '62701', '555-0100')",
    )
    .bind(name)
    .bind(city)
    .execute(pool)
    .await
    .expect("failed to insert office")
    .last_insert_rowid()
}

pub async fn insert_agent(pool: &SqlitePool, office_id: Option<i64>, first: &str, last: &str) -> i64 {
    sqlx::query(
        "INSERT INTO agents (office_id, first_name, last_name, email, phone, license_number, date_hired)
         VALUES (?, ?, ?, ?, '555-0101', NULL, '2020-06-01')",
    )
    .bind(office_id)
    .bind(first)
    .bind(last)
    .bind(format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()))
    .execute(pool)
    .await
    .expect("failed to insert agent")
    .last_insert_rowid()
}

pub async fn insert_client(pool: &SqlitePool, first: &str, last: &str) -> i64 {
    sqlx::query(
        "INSERT INTO clients (first_name, last_name, email, phone, street, city, state, zipcode)
         VALUES (?, ?, ?, '555-0199', '9 Oak Ave', 'Springfield', 'IL', '62704')",
    )
    .bind(first)
    .bind(last)
    .bind(format!("{}@example.com", first.to_lowercase()))
    .execute(pool)
    .await
    .expect("failed to insert client")
    .last_insert_rowid()
}

pub async fn link_client(pool: &SqlitePool, client_id: i64, agent_id: i64) {
    sqlx::query(
        "INSERT INTO client_agents (client_id, agent_id, relationship_date, status)
         VALUES (?, ?, '2024-01-15T09:00:00.000000Z', 'ACTIVE')",
    )
    .bind(client_id)
    .bind(agent_id)
    .execute(pool)
    .await
    .expect("failed to link client");
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("failed to count rows")
}

/// A complete, valid listing for `agent_id` with text values as a form
/// would submit them.
pub fn listing(agent_id: i64) -> Record {
    Record::new()
        .with("agent_id", agent_id)
        .with("property_type", "HOUSE")
        .with("street", "12 Elm St")
        .with("city", "Springfield")
        .with("state", "IL")
        .with("zipcode", "62704")
        .with("list_price", "325000.00")
        .with("num_bedrooms", "3")
        .with("num_bathrooms", "2")
        .with("square_footage", "1850")
        .with("description", "Corner lot")
        .with("listing_date", "2024-05-01")
        .with("status", "AVAILABLE")
        .with("image_url", "https://img.example.com/12-elm.jpg")
}
