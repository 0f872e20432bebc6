use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adminhub_core::error::{optional_text, require_text};
use adminhub_core::{DomainError, DomainResult, EntityKind, Identifier, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guide {
    pub id: RecordId,
    pub guide_id: Identifier,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub languages: Vec<String>,
    /// Day rate in minor currency units.
    pub day_rate: u64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuide {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub day_rate: u64,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl NewGuide {
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)?;
        require_text("phone", &self.phone)?;
        optional_text("email", self.email.as_deref())?;
        validate_languages(&self.languages)
    }
}

fn validate_languages(languages: &[String]) -> DomainResult<()> {
    if languages.iter().any(|l| l.trim().is_empty()) {
        return Err(DomainError::validation("languages must not contain blank entries"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GuidePatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub languages: Option<Vec<String>>,
    pub day_rate: Option<u64>,
    pub available: Option<bool>,
}

impl Guide {
    pub fn new(id: RecordId, guide_id: Identifier, input: NewGuide, now: DateTime<Utc>) -> Self {
        Self {
            id,
            guide_id,
            name: input.name,
            phone: input.phone,
            email: input.email,
            languages: input.languages,
            day_rate: input.day_rate,
            available: input.available,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_patch(&mut self, patch: GuidePatch, now: DateTime<Utc>) -> DomainResult<()> {
        optional_text("name", patch.name.as_deref())?;
        optional_text("phone", patch.phone.as_deref())?;
        if let Some(langs) = &patch.languages {
            validate_languages(langs)?;
        }

        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.email {
            self.email = Some(v);
        }
        if let Some(v) = patch.languages {
            self.languages = v;
        }
        if let Some(v) = patch.day_rate {
            self.day_rate = v;
        }
        if let Some(v) = patch.available {
            self.available = v;
        }
        self.updated_at = now;
        Ok(())
    }
}

impl_identified_record!(Guide, EntityKind::Guide, guide_id);
