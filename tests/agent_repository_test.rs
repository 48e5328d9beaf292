mod common;

use brokerage::adapters::sqlite::SqliteAgentRepository;
use brokerage::domain::errors::DomainError;
use brokerage::domain::models::{NewTransaction, PropertyStatus, PropertyType, TransactionType};
use brokerage::domain::ports::AgentRepository;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use common::{count_rows, insert_agent, insert_client, insert_office, link_client, listing, test_pool};

#[tokio::test]
async fn test_property_round_trip_keeps_every_field() {
    let pool = test_pool().await;
    let agent_id = insert_agent(&pool, None, "Dana", "Reyes").await;
    let repo = SqliteAgentRepository::new(pool.clone());

    let id = repo.add_property(listing(agent_id)).await.expect("failed to add property");
    let properties = repo.get_properties_by_agent(agent_id).await.unwrap();
    assert_eq!(properties.len(), 1);

    let property = &properties[0];
    assert_eq!(property.id, id);
    assert_eq!(property.agent_id, agent_id);
    assert_eq!(property.property_type, PropertyType::House);
    assert_eq!(property.street, "12 Elm St");
    assert_eq!(property.city, "Springfield");
    assert_eq!(property.state, "IL");
    assert_eq!(property.zipcode, "62704");
    assert_eq!(property.list_price, Decimal::new(32_500_000, 2));
    assert_eq!(property.num_bedrooms, 3);
    assert_eq!(property.num_bathrooms, 2);
    assert_eq!(property.square_footage, 1850);
    assert_eq!(property.description, "Corner lot");
    assert_eq!(property.listing_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    assert_eq!(property.status, PropertyStatus::Available);
    assert_eq!(property.image_url, "https://img.example.com/12-elm.jpg");

    pool.close().await;
}

#[tokio::test]
async fn test_properties_listed_in_insertion_order_per_agent() {
    let pool = test_pool().await;
    let dana = insert_agent(&pool, None, "Dana", "Reyes").await;
    let sam = insert_agent(&pool, None, "Sam", "Okafor").await;
    let repo = SqliteAgentRepository::new(pool.clone());

    let first = repo.add_property(listing(dana)).await.unwrap();
    let other = repo.add_property(listing(sam).with("street", "4 Pine Rd")).await.unwrap();
    let second = repo.add_property(listing(dana).with("street", "88 Birch Ln")).await.unwrap();

    let ids: Vec<_> = repo
        .get_properties_by_agent(dana)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![first, second]);

    let sams = repo.get_properties_by_agent(sam).await.unwrap();
    assert_eq!(sams.len(), 1);
    assert_eq!(sams[0].id, other);
    assert_eq!(sams[0].street, "4 Pine Rd");
}

#[tokio::test]
async fn test_metacharacters_are_stored_verbatim() {
    let pool = test_pool().await;
    let agent_id = insert_agent(&pool, None, "Dana", "Reyes").await;
    let repo = SqliteAgentRepository::new(pool.clone());

    let fields = listing(agent_id)
        .with("street", "O'Brien Way")
        .with("description", "1; DROP TABLE properties; --")
        .with("city", "\"Quoted\" City");
    repo.add_property(fields).await.unwrap();

    let property = &repo.get_properties_by_agent(agent_id).await.unwrap()[0];
    assert_eq!(property.street, "O'Brien Way");
    assert_eq!(property.description, "1; DROP TABLE properties; --");
    assert_eq!(property.city, "\"Quoted\" City");
    assert_eq!(count_rows(&pool, "properties").await, 1);
}

#[tokio::test]
async fn test_add_property_rejects_unknown_column() {
    let pool = test_pool().await;
    let agent_id = insert_agent(&pool, None, "Dana", "Reyes").await;
    let repo = SqliteAgentRepository::new(pool.clone());

    let fields = listing(agent_id).with("street; DROP TABLE agents", "x");
    let result = repo.add_property(fields).await;
    assert!(matches!(result, Err(DomainError::InvalidColumn { table: "properties", .. })));
    assert_eq!(count_rows(&pool, "properties").await, 0);
    assert_eq!(count_rows(&pool, "agents").await, 1);
}

#[tokio::test]
async fn test_add_property_lists_all_missing_fields() {
    let pool = test_pool().await;
    let agent_id = insert_agent(&pool, None, "Dana", "Reyes").await;
    let repo = SqliteAgentRepository::new(pool.clone());

    let mut fields = listing(agent_id);
    for column in ["street", "city", "list_price"] {
        fields.remove(column);
    }

    let err = repo.add_property(fields).await.unwrap_err();
    let mut names: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["city", "list_price", "street"]);
    assert_eq!(count_rows(&pool, "properties").await, 0);
}

#[tokio::test]
async fn test_get_agent_exact_fields_and_not_found() {
    let pool = test_pool().await;
    let office_id = insert_office(&pool, "Lakeside", "Chicago").await;
    let agent_id = insert_agent(&pool, Some(office_id), "Priya", "Nair").await;
    let repo = SqliteAgentRepository::new(pool.clone());

    let agent = repo.get_agent(agent_id).await.unwrap();
    assert_eq!(agent.id, agent_id);
    assert_eq!(agent.office_id, Some(office_id));
    assert_eq!(agent.first_name, "Priya");
    assert_eq!(agent.last_name, "Nair");
    assert_eq!(agent.email, "priya.nair@example.com");
    assert_eq!(agent.phone, "555-0101");
    assert_eq!(agent.license_number, None);
    assert_eq!(agent.date_hired, NaiveDate::from_ymd_opt(2020, 6, 1));

    let office = repo.get_office(agent_id).await.unwrap().expect("office assigned");
    assert_eq!(office.id, office_id);
    assert_eq!(office.city, "Chicago");

    assert!(matches!(
        repo.get_agent(agent_id + 100).await,
        Err(DomainError::NotFound { entity: "Agent", .. })
    ));
}

#[tokio::test]
async fn test_get_clients_only_returns_linked_clients() {
    let pool = test_pool().await;
    let dana = insert_agent(&pool, None, "Dana", "Reyes").await;
    let sam = insert_agent(&pool, None, "Sam", "Okafor").await;
    let lonely = insert_agent(&pool, None, "Ana", "Lind").await;
    let lee = insert_client(&pool, "Lee", "Park").await;
    let mo = insert_client(&pool, "Mo", "Haddad").await;
    let kim = insert_client(&pool, "Kim", "Berg").await;
    link_client(&pool, lee, dana).await;
    link_client(&pool, kim, dana).await;
    link_client(&pool, mo, sam).await;
    let repo = SqliteAgentRepository::new(pool.clone());

    let ids: Vec<_> = repo.get_clients(dana).await.unwrap().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![lee, kim]);

    let sams = repo.get_clients(sam).await.unwrap();
    assert_eq!(sams.len(), 1);
    assert_eq!(sams[0].full_name(), "Mo Haddad");

    assert!(repo.get_clients(lonely).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_transaction_appears_exactly_once() {
    let pool = test_pool().await;
    let agent_id = insert_agent(&pool, None, "Dana", "Reyes").await;
    let client_id = insert_client(&pool, "Lee", "Park").await;
    let repo = SqliteAgentRepository::new(pool.clone());
    let property_id = repo.add_property(listing(agent_id)).await.unwrap();

    let created = repo
        .add_transaction(
            NewTransaction::new(agent_id, client_id, Decimal::new(32_000_000, 2), "purchase")
                .with_property(property_id),
        )
        .await
        .unwrap();
    assert_eq!(created.transaction_type, TransactionType::Purchase);
    assert_eq!(created.property_id, Some(property_id));
    assert_eq!(created.paid_at, None);

    let listed = repo.get_transactions_by_agent(agent_id).await.unwrap();
    assert_eq!(listed.iter().filter(|t| t.id == created.id).count(), 1);
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn test_add_transaction_rejects_bad_input_without_insert() {
    let pool = test_pool().await;
    let agent_id = insert_agent(&pool, None, "Dana", "Reyes").await;
    let client_id = insert_client(&pool, "Lee", "Park").await;
    let repo = SqliteAgentRepository::new(pool.clone());

    let negative = repo
        .add_transaction(NewTransaction::new(agent_id, client_id, Decimal::new(-100, 2), "SALE"))
        .await;
    assert!(matches!(negative, Err(DomainError::ValidationError(_))));

    let bad_type = repo
        .add_transaction(NewTransaction::new(agent_id, client_id, Decimal::ONE, "LEASE"))
        .await
        .unwrap_err();
    assert_eq!(bad_type.field_errors()[0].field, "transaction_type");

    let unknown_agent = repo
        .add_transaction(NewTransaction::new(agent_id + 50, client_id, Decimal::ONE, "SALE"))
        .await;
    assert!(matches!(unknown_agent, Err(DomainError::NotFound { entity: "Agent", .. })));

    let unknown_property = repo
        .add_transaction(NewTransaction::new(agent_id, client_id, Decimal::ONE, "SALE").with_property(999))
        .await;
    assert!(matches!(unknown_property, Err(DomainError::NotFound { entity: "Property", id: 999 })));

    assert_eq!(count_rows(&pool, "transactions").await, 0);
}

#[tokio::test]
async fn test_listings_for_unknown_agent_are_empty() {
    let pool = test_pool().await;
    let repo = SqliteAgentRepository::new(pool.clone());

    assert!(repo.get_properties_by_agent(5).await.unwrap().is_empty());
    assert!(repo.get_appointments_by_agent(5).await.unwrap().is_empty());
    assert!(repo.get_transactions_by_agent(5).await.unwrap().is_empty());
    assert!(repo.get_clients(5).await.unwrap().is_empty());
}
