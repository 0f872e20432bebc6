use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adminhub_core::error::{optional_text, require_text};
use adminhub_core::{DomainResult, Entity, Record, RecordId};

/// Destination catalogue entry; the name is the unique business key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: RecordId,
    pub name: String,
    pub country: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDestination {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewDestination {
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)?;
        require_text("country", &self.country)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DestinationPatch {
    pub name: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
}

impl Destination {
    pub fn new(id: RecordId, input: NewDestination, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name.trim().to_string(),
            country: input.country,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_patch(&mut self, patch: DestinationPatch, now: DateTime<Utc>) -> DomainResult<()> {
        optional_text("name", patch.name.as_deref())?;
        optional_text("country", patch.country.as_deref())?;

        if let Some(v) = patch.name {
            self.name = v.trim().to_string();
        }
        if let Some(v) = patch.country {
            self.country = v;
        }
        if let Some(v) = patch.description {
            self.description = Some(v);
        }
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Destination {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Destination {
    const COLLECTION: &'static str = "destinations";

    fn business_key(&self) -> Option<String> {
        Some(self.name.clone())
    }
}
