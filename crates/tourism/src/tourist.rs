use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adminhub_core::error::{optional_text, require_text};
use adminhub_core::{DomainResult, EntityKind, Identifier, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tourist {
    pub id: RecordId,
    pub tourist_id: Identifier,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub nationality: Option<String>,
    pub passport_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTourist {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub passport_number: Option<String>,
}

impl NewTourist {
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)?;
        require_text("phone", &self.phone)?;
        optional_text("email", self.email.as_deref())?;
        optional_text("passportNumber", self.passport_number.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TouristPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub nationality: Option<String>,
    pub passport_number: Option<String>,
}

impl Tourist {
    pub fn new(id: RecordId, tourist_id: Identifier, input: NewTourist, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tourist_id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            nationality: input.nationality,
            passport_number: input.passport_number,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_patch(&mut self, patch: TouristPatch, now: DateTime<Utc>) -> DomainResult<()> {
        optional_text("name", patch.name.as_deref())?;
        optional_text("phone", patch.phone.as_deref())?;

        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.email {
            self.email = Some(v);
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.nationality {
            self.nationality = Some(v);
        }
        if let Some(v) = patch.passport_number {
            self.passport_number = Some(v);
        }
        self.updated_at = now;
        Ok(())
    }
}

impl_identified_record!(Tourist, EntityKind::Tourist, tourist_id);
