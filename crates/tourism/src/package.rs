use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adminhub_core::error::{optional_text, require_text};
use adminhub_core::{DomainError, DomainResult, EntityKind, Identifier, RecordId};

/// A sellable tour package, priced per traveler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourPackage {
    pub id: RecordId,
    pub package_id: Identifier,
    pub name: String,
    pub destination: String,
    pub duration_days: u32,
    /// Price per traveler in minor currency units.
    pub price: u64,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTourPackage {
    pub name: String,
    pub destination: String,
    pub duration_days: u32,
    pub price: u64,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTourPackage {
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)?;
        require_text("destination", &self.destination)?;
        validate_duration(self.duration_days)
    }
}

fn validate_duration(days: u32) -> DomainResult<()> {
    if days == 0 {
        return Err(DomainError::validation("durationDays must be at least 1"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TourPackagePatch {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub duration_days: Option<u32>,
    pub price: Option<u64>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl TourPackage {
    pub fn new(id: RecordId, package_id: Identifier, input: NewTourPackage, now: DateTime<Utc>) -> Self {
        Self {
            id,
            package_id,
            name: input.name,
            destination: input.destination,
            duration_days: input.duration_days,
            price: input.price,
            description: input.description,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_patch(&mut self, patch: TourPackagePatch, now: DateTime<Utc>) -> DomainResult<()> {
        optional_text("name", patch.name.as_deref())?;
        optional_text("destination", patch.destination.as_deref())?;
        if let Some(days) = patch.duration_days {
            validate_duration(days)?;
        }

        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.destination {
            self.destination = v;
        }
        if let Some(v) = patch.duration_days {
            self.duration_days = v;
        }
        if let Some(v) = patch.price {
            self.price = v;
        }
        if let Some(v) = patch.description {
            self.description = Some(v);
        }
        if let Some(v) = patch.active {
            self.active = v;
        }
        self.updated_at = now;
        Ok(())
    }
}

impl_identified_record!(TourPackage, EntityKind::TourPackage, package_id);
