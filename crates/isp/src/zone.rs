use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adminhub_core::error::require_text;
use adminhub_core::{DomainResult, Entity, Record, RecordId};

/// Service zone. Names are free-text and unique; customers reference zones by
/// name, so renames and merges must rewrite those references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewZone {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewZone {
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)
    }
}

impl Zone {
    pub fn new(id: RecordId, input: NewZone, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: normalize_name(&input.name),
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, new_name: &str, now: DateTime<Utc>) -> DomainResult<()> {
        require_text("name", new_name)?;
        self.name = normalize_name(new_name);
        self.updated_at = now;
        Ok(())
    }
}

/// Trim surrounding whitespace; zone names are otherwise taken verbatim.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

impl Entity for Zone {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Zone {
    const COLLECTION: &'static str = "zones";

    fn business_key(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_keyed() {
        let z = Zone::new(
            RecordId::new(),
            NewZone {
                name: "  Uttara Sector 4 ".to_string(),
                description: None,
            },
            Utc::now(),
        );
        assert_eq!(z.name, "Uttara Sector 4");
        assert_eq!(z.business_key().as_deref(), Some("Uttara Sector 4"));
    }

    #[test]
    fn rename_rejects_blank() {
        let mut z = Zone::new(
            RecordId::new(),
            NewZone {
                name: "North".to_string(),
                description: None,
            },
            Utc::now(),
        );
        assert!(z.rename("  ", Utc::now()).is_err());
        z.rename("North-East", Utc::now()).unwrap();
        assert_eq!(z.name, "North-East");
    }
}
