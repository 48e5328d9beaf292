//! Property listing domain model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::record::{Record, Value};
use crate::domain::errors::{DomainError, FieldError};

/// Kind of property being listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    /// Detached single-family house.
    House,
    /// Condominium unit.
    Condo,
    /// Attached townhouse.
    Townhouse,
    /// Apartment in a multi-unit building.
    Apartment,
    /// Undeveloped lot.
    Land,
    /// Commercial premises.
    Commercial,
}

impl PropertyType {
    /// Every type, in display order.
    pub const ALL: [Self; 6] = [
        Self::House,
        Self::Condo,
        Self::Townhouse,
        Self::Apartment,
        Self::Land,
        Self::Commercial,
    ];

    /// Canonical upper-case storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::House => "HOUSE",
            Self::Condo => "CONDO",
            Self::Townhouse => "TOWNHOUSE",
            Self::Apartment => "APARTMENT",
            Self::Land => "LAND",
            Self::Commercial => "COMMERCIAL",
        }
    }

    /// Case-insensitive parse of the storage form.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "HOUSE" => Some(Self::House),
            "CONDO" => Some(Self::Condo),
            "TOWNHOUSE" => Some(Self::Townhouse),
            "APARTMENT" => Some(Self::Apartment),
            "LAND" => Some(Self::Land),
            "COMMERCIAL" => Some(Self::Commercial),
            _ => None,
        }
    }
}

/// Listing status of a property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    /// On the market. New listings start here.
    #[default]
    Available,
    /// Under contract.
    Pending,
    /// Off the market.
    Sold,
}

impl PropertyStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Available, Self::Pending, Self::Sold];

    /// Canonical upper-case storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Pending => "PENDING",
            Self::Sold => "SOLD",
        }
    }

    /// Case-insensitive parse of the storage form.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "AVAILABLE" => Some(Self::Available),
            "PENDING" => Some(Self::Pending),
            "SOLD" => Some(Self::Sold),
            _ => None,
        }
    }
}

fn allowed<T: Copy>(all: &[T], as_str: fn(&T) -> &'static str) -> String {
    all.iter().map(as_str).collect::<Vec<_>>().join(", ")
}

/// A stored property listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Storage-assigned id.
    pub id: i64,
    /// Listing agent.
    pub agent_id: i64,
    /// Kind of property.
    pub property_type: PropertyType,
    /// Street address.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub zipcode: String,
    /// Asking price, exact to the cent.
    pub list_price: Decimal,
    /// Bedroom count.
    pub num_bedrooms: u32,
    /// Bathroom count.
    pub num_bathrooms: u32,
    /// Interior area in square feet.
    pub square_footage: u32,
    /// Free text; may be empty.
    pub description: String,
    /// Day the property went on the market.
    pub listing_date: NaiveDate,
    /// Current listing status.
    pub status: PropertyStatus,
    /// Listing photo; empty when none.
    pub image_url: String,
}

impl TryFrom<Record> for Property {
    type Error = DomainError;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        let property_type = record.text("property_type")?;
        let status = record.text("status")?;

        Ok(Self {
            id: record.integer("property_id")?,
            agent_id: record.integer("agent_id")?,
            property_type: PropertyType::parse_str(&property_type).ok_or_else(|| {
                DomainError::TypeMismatch {
                    column: "property_type".to_string(),
                    expected: "property type",
                    found: property_type.clone(),
                }
            })?,
            street: record.text("street")?,
            city: record.text("city")?,
            state: record.text("state")?,
            zipcode: record.text("zipcode")?,
            list_price: record.decimal("list_price")?,
            num_bedrooms: record.count("num_bedrooms")?,
            num_bathrooms: record.count("num_bathrooms")?,
            square_footage: record.count("square_footage")?,
            description: record.opt_text("description")?.unwrap_or_default(),
            listing_date: record.date("listing_date")?,
            status: PropertyStatus::parse_str(&status).ok_or_else(|| DomainError::TypeMismatch {
                column: "status".to_string(),
                expected: "property status",
                found: status.clone(),
            })?,
            image_url: record.opt_text("image_url")?.unwrap_or_default(),
        })
    }
}

/// A property about to be inserted. Identity is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProperty {
    /// Listing agent; must exist.
    pub agent_id: i64,
    /// Kind of property.
    pub property_type: PropertyType,
    /// Street address.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub zipcode: String,
    /// Asking price; zero is allowed, negative is not.
    pub list_price: Decimal,
    /// Bedroom count.
    pub num_bedrooms: u32,
    /// Bathroom count.
    pub num_bathrooms: u32,
    /// Interior area in square feet.
    pub square_footage: u32,
    /// Free text; may be empty.
    pub description: String,
    /// Defaults to the insertion date when absent.
    pub listing_date: Option<NaiveDate>,
    /// `Available` unless given.
    pub status: PropertyStatus,
    /// Listing photo; empty when none.
    pub image_url: String,
}

const COUNTS: [&str; 3] = ["num_bedrooms", "num_bathrooms", "square_footage"];

fn required_text(record: &Record, field: &str, errors: &mut Vec<FieldError>) -> String {
    match record.get(field) {
        Some(Value::Text(s)) if !s.trim().is_empty() => s.clone(),
        _ => {
            if !errors.iter().any(|e| e.field == field) {
                errors.push(FieldError::missing(field));
            }
            String::new()
        }
    }
}

impl NewProperty {
    /// Build from a record whose values are already coerced to column types.
    ///
    /// `reported` holds problems found earlier (e.g. during coercion); those
    /// fields are not reported twice. Every remaining problem is collected.
    pub fn from_record(record: &Record, reported: Vec<FieldError>) -> Result<Self, Vec<FieldError>> {
        let mut errors = reported;
        let already = |errors: &[FieldError], field: &str| errors.iter().any(|e| e.field == field);

        let agent_id = match record.get("agent_id") {
            Some(Value::Integer(id)) => Some(*id),
            _ => {
                if !already(&errors, "agent_id") {
                    errors.push(FieldError::missing("agent_id"));
                }
                None
            }
        };

        let property_type = match record.get("property_type") {
            Some(Value::Text(s)) if !s.trim().is_empty() => {
                let parsed = PropertyType::parse_str(s);
                if parsed.is_none() {
                    errors.push(FieldError::new(
                        "property_type",
                        format!(
                            "must be one of: {}",
                            allowed(&PropertyType::ALL, PropertyType::as_str)
                        ),
                    ));
                }
                parsed
            }
            _ => {
                if !already(&errors, "property_type") {
                    errors.push(FieldError::missing("property_type"));
                }
                None
            }
        };

        let status = match record.get("status") {
            Some(Value::Text(s)) if !s.trim().is_empty() => {
                let parsed = PropertyStatus::parse_str(s);
                if parsed.is_none() {
                    errors.push(FieldError::new(
                        "status",
                        format!(
                            "must be one of: {}",
                            allowed(&PropertyStatus::ALL, PropertyStatus::as_str)
                        ),
                    ));
                }
                parsed
            }
            // New listings start out available.
            _ => Some(PropertyStatus::default()),
        };

        let street = required_text(record, "street", &mut errors);
        let city = required_text(record, "city", &mut errors);
        let state = required_text(record, "state", &mut errors);
        let zipcode = required_text(record, "zipcode", &mut errors);

        let list_price = match record.get("list_price") {
            Some(Value::Decimal(d)) if d.is_sign_negative() && !d.is_zero() => {
                errors.push(FieldError::new("list_price", "must be >= 0"));
                None
            }
            Some(Value::Decimal(d)) => Some(*d),
            _ => {
                if !already(&errors, "list_price") {
                    errors.push(FieldError::missing("list_price"));
                }
                None
            }
        };

        let mut counts = [0_u32; 3];
        for (slot, field) in counts.iter_mut().zip(COUNTS) {
            match record.get(field) {
                Some(Value::Integer(n)) => match u32::try_from(*n) {
                    Ok(n) => *slot = n,
                    Err(_) if *n < 0 => errors.push(FieldError::new(field, "must be >= 0")),
                    Err(_) => errors.push(FieldError::new(field, "is too large")),
                },
                _ => {
                    if !already(&errors, field) {
                        errors.push(FieldError::missing(field));
                    }
                }
            }
        }

        let listing_date = match record.get("listing_date") {
            Some(Value::Date(d)) => Some(*d),
            _ => None,
        };
        let description = match record.get("description") {
            Some(Value::Text(s)) => s.clone(),
            _ => String::new(),
        };
        let image_url = match record.get("image_url") {
            Some(Value::Text(s)) => s.clone(),
            _ => String::new(),
        };

        match (agent_id, property_type, status, list_price) {
            (Some(agent_id), Some(property_type), Some(status), Some(list_price))
                if errors.is_empty() =>
            {
                Ok(Self {
                    agent_id,
                    property_type,
                    street,
                    city,
                    state,
                    zipcode,
                    list_price,
                    num_bedrooms: counts[0],
                    num_bathrooms: counts[1],
                    square_footage: counts[2],
                    description,
                    listing_date,
                    status,
                    image_url,
                })
            }
            _ => Err(errors),
        }
    }

    /// Column values for insertion, with `listing_date` defaulted to `today`.
    pub fn to_record(&self, today: NaiveDate) -> Record {
        Record::new()
            .with("agent_id", self.agent_id)
            .with("property_type", self.property_type.as_str())
            .with("street", self.street.as_str())
            .with("city", self.city.as_str())
            .with("state", self.state.as_str())
            .with("zipcode", self.zipcode.as_str())
            .with("list_price", self.list_price)
            .with("num_bedrooms", self.num_bedrooms)
            .with("num_bathrooms", self.num_bathrooms)
            .with("square_footage", self.square_footage)
            .with("description", self.description.as_str())
            .with("listing_date", self.listing_date.unwrap_or(today))
            .with("status", self.status.as_str())
            .with("image_url", self.image_url.as_str())
    }
}
