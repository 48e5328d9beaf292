//! Property-based tests for the data-access layer.

mod common;

use brokerage::adapters::sqlite::{InsertBuilder, SelectBuilder, SqliteAgentRepository, Table};
use brokerage::domain::errors::DomainError;
use brokerage::domain::models::{NewTransaction, PropertyStatus, PropertyType, Record};
use brokerage::domain::ports::AgentRepository;
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use common::{count_rows, insert_agent, insert_client, test_pool};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime")
}

/// Non-blank text with quotes, semicolons and comment markers mixed in.
fn hostile_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9';\"%_(),=*-][A-Za-z0-9 ';\"%_(),=*-]{0,40}[A-Za-z0-9';\"%_()=*-]",
        Just("O'Brien".to_string()),
        Just("1; DROP TABLE properties".to_string()),
        Just("x' OR '1'='1".to_string()),
        Just("Robert'); --".to_string()),
    ]
}

fn column_name_outside(table: Table) -> impl Strategy<Value = String> {
    "[a-z_;' ()*-]{1,24}".prop_filter("must not be an allowed column", move |name| {
        table.column(name).is_none()
    })
}

#[derive(Debug, Clone)]
struct Listing {
    property_type: PropertyType,
    status: PropertyStatus,
    street: String,
    city: String,
    description: String,
    price_cents: i64,
    bedrooms: u32,
    bathrooms: u32,
    square_footage: u32,
    listing_date: NaiveDate,
}

impl Listing {
    fn to_record(&self, agent_id: i64) -> Record {
        Record::new()
            .with("agent_id", agent_id)
            .with("property_type", self.property_type.as_str())
            .with("street", self.street.as_str())
            .with("city", self.city.as_str())
            .with("state", "IL")
            .with("zipcode", "62704")
            .with("list_price", Decimal::new(self.price_cents, 2).to_string())
            .with("num_bedrooms", self.bedrooms.to_string())
            .with("num_bathrooms", self.bathrooms)
            .with("square_footage", self.square_footage.to_string())
            .with("description", self.description.as_str())
            .with("listing_date", self.listing_date)
            .with("status", self.status.as_str().to_lowercase())
    }
}

fn listing_strategy() -> impl Strategy<Value = Listing> {
    (
        prop::sample::select(PropertyType::ALL.to_vec()),
        prop::sample::select(PropertyStatus::ALL.to_vec()),
        hostile_text(),
        hostile_text(),
        hostile_text(),
        0_i64..10_000_000_000,
        (0_u32..12, 0_u32..8, 0_u32..20_000),
        (0_i64..20_000).prop_map(|days| {
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + chrono::Duration::days(days)
        }),
    )
        .prop_map(
            |(property_type, status, street, city, description, price_cents, counts, listing_date)| Listing {
                property_type,
                status,
                street,
                city,
                description,
                price_cents,
                bedrooms: counts.0,
                bathrooms: counts.1,
                square_footage: counts.2,
                listing_date,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: every valid listing reads back exactly as written
    #[test]
    fn prop_add_property_round_trips(listing in listing_strategy()) {
        let rt = runtime();
        rt.block_on(async {
            let pool = test_pool().await;
            let agent_id = insert_agent(&pool, None, "Dana", "Reyes").await;
            let repo = SqliteAgentRepository::new(pool.clone());

            let id = repo.add_property(listing.to_record(agent_id)).await.unwrap();
            let stored = repo.get_properties_by_agent(agent_id).await.unwrap();
            prop_assert_eq!(stored.len(), 1);

            let property = &stored[0];
            prop_assert_eq!(property.id, id);
            prop_assert_eq!(property.property_type, listing.property_type);
            prop_assert_eq!(property.status, listing.status);
            prop_assert_eq!(&property.street, &listing.street);
            prop_assert_eq!(&property.city, &listing.city);
            prop_assert_eq!(&property.description, &listing.description);
            prop_assert_eq!(property.list_price, Decimal::new(listing.price_cents, 2));
            prop_assert_eq!(property.num_bedrooms, listing.bedrooms);
            prop_assert_eq!(property.num_bathrooms, listing.bathrooms);
            prop_assert_eq!(property.square_footage, listing.square_footage);
            prop_assert_eq!(property.listing_date, listing.listing_date);

            prop_assert_eq!(count_rows(&pool, "agents").await, 1);
            Ok(())
        })?;
    }

    /// Property: names outside the allow-list never yield a statement
    #[test]
    fn prop_unknown_columns_are_rejected(
        (table, name) in prop::sample::select(Table::ALL.to_vec())
            .prop_flat_map(|table| (Just(table), column_name_outside(table)))
    ) {
        let select = SelectBuilder::new(table).filter(&name, 1_i64).build();
        prop_assert!(
            matches!(select, Err(DomainError::InvalidColumn { ref column, .. }) if *column == name),
            "select accepted {:?}", name
        );

        let projected = SelectBuilder::new(table).columns(&[name.as_str()]).build();
        prop_assert!(
            matches!(projected, Err(DomainError::InvalidColumn { .. })),
            "projection accepted {:?}", name
        );

        let insert = InsertBuilder::new(table).value(&name, "x").build();
        prop_assert!(
            matches!(insert, Err(DomainError::InvalidColumn { .. })),
            "insert accepted {:?}", name
        );
    }

    /// Property: a negative amount never reaches storage
    #[test]
    fn prop_negative_amount_inserts_nothing(cents in 1_i64..1_000_000_000) {
        let rt = runtime();
        rt.block_on(async {
            let pool = test_pool().await;
            let agent_id = insert_agent(&pool, None, "Dana", "Reyes").await;
            let client_id = insert_client(&pool, "Lee", "Park").await;
            let repo = SqliteAgentRepository::new(pool.clone());

            let result = repo
                .add_transaction(NewTransaction::new(agent_id, client_id, Decimal::new(-cents, 2), "SALE"))
                .await;
            prop_assert!(
                matches!(result, Err(DomainError::ValidationError(_))),
                "negative amount accepted: -{}", cents
            );
            prop_assert_eq!(count_rows(&pool, "transactions").await, 0);
            Ok(())
        })?;
    }
}
