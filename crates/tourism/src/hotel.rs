use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adminhub_core::error::{optional_text, require_text};
use adminhub_core::{DomainError, DomainResult, EntityKind, Identifier, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: RecordId,
    pub hotel_id: Identifier,
    pub name: String,
    pub destination: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub star_rating: Option<u8>,
    /// Nightly room rate in minor currency units.
    pub nightly_rate: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHotel {
    pub name: String,
    pub destination: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub star_rating: Option<u8>,
    pub nightly_rate: u64,
}

impl NewHotel {
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)?;
        require_text("destination", &self.destination)?;
        validate_rating(self.star_rating)
    }
}

fn validate_rating(rating: Option<u8>) -> DomainResult<()> {
    match rating {
        Some(r) if !(1..=5).contains(&r) => {
            Err(DomainError::validation("starRating must be between 1 and 5"))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HotelPatch {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub star_rating: Option<u8>,
    pub nightly_rate: Option<u64>,
}

impl Hotel {
    pub fn new(id: RecordId, hotel_id: Identifier, input: NewHotel, now: DateTime<Utc>) -> Self {
        Self {
            id,
            hotel_id,
            name: input.name,
            destination: input.destination,
            address: input.address,
            phone: input.phone,
            star_rating: input.star_rating,
            nightly_rate: input.nightly_rate,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_patch(&mut self, patch: HotelPatch, now: DateTime<Utc>) -> DomainResult<()> {
        optional_text("name", patch.name.as_deref())?;
        optional_text("destination", patch.destination.as_deref())?;
        validate_rating(patch.star_rating)?;

        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.destination {
            self.destination = v;
        }
        if let Some(v) = patch.address {
            self.address = Some(v);
        }
        if let Some(v) = patch.phone {
            self.phone = Some(v);
        }
        if let Some(v) = patch.star_rating {
            self.star_rating = Some(v);
        }
        if let Some(v) = patch.nightly_rate {
            self.nightly_rate = v;
        }
        self.updated_at = now;
        Ok(())
    }
}

impl_identified_record!(Hotel, EntityKind::Hotel, hotel_id);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_rating_is_bounded() {
        let mut h = NewHotel {
            name: "Sea Pearl".to_string(),
            destination: "Cox's Bazar".to_string(),
            address: None,
            phone: None,
            star_rating: Some(6),
            nightly_rate: 900_000,
        };
        assert!(h.validate().is_err());
        h.star_rating = Some(5);
        assert!(h.validate().is_ok());
    }

    #[test]
    fn hotel_identifiers_use_the_separator() {
        assert_eq!(EntityKind::Hotel.format().render(3).as_str(), "H-003");
    }
}
