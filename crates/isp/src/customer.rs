use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use adminhub_core::error::{optional_text, require_text};
use adminhub_core::{
    DomainError, DomainResult, Entity, EntityKind, IdentifiedRecord, Identifier, Record, RecordId,
};

use crate::zone::normalize_name;

/// Customer status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

/// Line credentials provisioned for the customer (PPPoE login, static IP).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkCredentials {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// ID document on file. Image URLs come from the external upload service and
/// are attached after the customer record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IdDocument {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub front_url: Option<String>,
    #[serde(default)]
    pub back_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: RecordId,
    pub customer_id: Identifier,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Zone name; must reference an existing zone.
    pub zone: Option<String>,
    /// Billing package name.
    pub package: String,
    /// Monthly fee in minor currency units.
    pub monthly_fee: u64,
    pub credentials: NetworkCredentials,
    pub id_document: IdDocument,
    pub status: CustomerStatus,
    pub connection_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload. Carries no identifier: that is allocated server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    pub package: String,
    pub monthly_fee: u64,
    #[serde(default)]
    pub credentials: NetworkCredentials,
    #[serde(default)]
    pub id_document_number: Option<String>,
    #[serde(default)]
    pub status: CustomerStatus,
    #[serde(default)]
    pub connection_date: Option<NaiveDate>,
}

impl NewCustomer {
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)?;
        require_text("phone", &self.phone)?;
        require_text("package", &self.package)?;
        optional_text("email", self.email.as_deref())?;
        optional_text("zone", self.zone.as_deref())?;
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

/// Partial update. `customerId` is read-only after creation, so it is not
/// part of the payload at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Absent: unchanged. `null`: unassigned. A name: moved to that zone.
    #[serde(default, deserialize_with = "present_or_null")]
    pub zone: Option<Option<String>>,
    pub package: Option<String>,
    pub monthly_fee: Option<u64>,
    pub credentials: Option<NetworkCredentials>,
    pub id_document_number: Option<String>,
    pub status: Option<CustomerStatus>,
    pub connection_date: Option<NaiveDate>,
}

impl CustomerPatch {
    pub fn validate(&self) -> DomainResult<()> {
        optional_text("name", self.name.as_deref())?;
        optional_text("phone", self.phone.as_deref())?;
        optional_text("package", self.package.as_deref())?;
        optional_text("zone", self.assigned_zone())?;
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    /// Zone the patch assigns, if any.
    pub fn assigned_zone(&self) -> Option<&str> {
        self.zone.as_ref().and_then(Option::as_deref)
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn validate_email(email: &str) -> DomainResult<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(DomainError::validation(format!("invalid email '{email}'"))),
    }
}

impl Customer {
    /// Build a customer from a validated payload and an allocated identifier.
    ///
    /// Image URLs start empty; see [`Customer::attach_id_images`].
    pub fn new(id: RecordId, customer_id: Identifier, input: NewCustomer, now: DateTime<Utc>) -> Self {
        Self {
            id,
            customer_id,
            name: input.name,
            phone: input.phone,
            email: input.email,
            address: input.address,
            zone: input.zone.as_deref().map(normalize_name),
            package: input.package,
            monthly_fee: input.monthly_fee,
            credentials: input.credentials,
            id_document: IdDocument {
                number: input.id_document_number,
                front_url: None,
                back_url: None,
            },
            status: input.status,
            connection_date: input.connection_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_patch(&mut self, patch: CustomerPatch, now: DateTime<Utc>) -> DomainResult<()> {
        patch.validate()?;

        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.email {
            self.email = Some(v);
        }
        if let Some(v) = patch.address {
            self.address = Some(v);
        }
        if let Some(v) = patch.zone {
            self.zone = v.as_deref().map(normalize_name);
        }
        if let Some(v) = patch.package {
            self.package = v;
        }
        if let Some(v) = patch.monthly_fee {
            self.monthly_fee = v;
        }
        if let Some(v) = patch.credentials {
            self.credentials = v;
        }
        if let Some(v) = patch.id_document_number {
            self.id_document.number = Some(v);
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.connection_date {
            self.connection_date = Some(v);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Record image URLs returned by the upload service. Absent sides are kept.
    pub fn attach_id_images(
        &mut self,
        front_url: Option<String>,
        back_url: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if front_url.is_none() && back_url.is_none() {
            return Err(DomainError::validation("at least one image url is required"));
        }
        optional_text("idFrontUrl", front_url.as_deref())?;
        optional_text("idBackUrl", back_url.as_deref())?;

        if front_url.is_some() {
            self.id_document.front_url = front_url;
        }
        if back_url.is_some() {
            self.id_document.back_url = back_url;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Move the customer to another zone (or unassign it).
    pub fn reassign_zone(&mut self, zone: Option<String>, now: DateTime<Utc>) {
        self.zone = zone.as_deref().map(normalize_name);
        self.updated_at = now;
    }

    /// Whether the customer sits in `zone`, ignoring surrounding whitespace.
    pub fn in_zone(&self, zone: &str) -> bool {
        self.zone
            .as_deref()
            .is_some_and(|z| normalize_name(z) == normalize_name(zone))
    }
}

impl Entity for Customer {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Customer {
    const COLLECTION: &'static str = EntityKind::Customer.collection();

    fn business_key(&self) -> Option<String> {
        Some(self.customer_id.to_string())
    }
}

impl IdentifiedRecord for Customer {
    const KIND: EntityKind = EntityKind::Customer;

    fn identifier(&self) -> &Identifier {
        &self.customer_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewCustomer {
        NewCustomer {
            name: "Rahim Uddin".to_string(),
            phone: "+8801700000000".to_string(),
            email: Some("rahim@example.com".to_string()),
            address: Some("House 12, Road 3".to_string()),
            zone: Some("North".to_string()),
            package: "Home 20 Mbps".to_string(),
            monthly_fee: 80_000,
            credentials: NetworkCredentials {
                username: "rahim.lc".to_string(),
                password: "pppoe-pass".to_string(),
                ip_address: None,
            },
            id_document_number: Some("NID-123".to_string()),
            status: CustomerStatus::Active,
            connection_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        }
    }

    fn customer() -> Customer {
        let id = EntityKind::Customer.format().render(7);
        Customer::new(RecordId::new(), id, input(), Utc::now())
    }

    #[test]
    fn new_customer_has_no_images_yet() {
        let c = customer();
        assert_eq!(c.customer_id.as_str(), "LC-007");
        assert_eq!(c.id_document.number.as_deref(), Some("NID-123"));
        assert!(c.id_document.front_url.is_none());
        assert!(c.id_document.back_url.is_none());
    }

    #[test]
    fn blank_name_fails_validation() {
        let mut i = input();
        i.name = " ".to_string();
        assert!(matches!(i.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn malformed_email_fails_validation() {
        let mut i = input();
        i.email = Some("not-an-email".to_string());
        assert!(i.validate().is_err());
    }

    #[test]
    fn patch_keeps_identifier_and_updates_fields() {
        let mut c = customer();
        let patch = CustomerPatch {
            phone: Some("+8801800000000".to_string()),
            status: Some(CustomerStatus::Suspended),
            ..Default::default()
        };
        c.apply_patch(patch, Utc::now()).unwrap();
        assert_eq!(c.customer_id.as_str(), "LC-007");
        assert_eq!(c.phone, "+8801800000000");
        assert_eq!(c.status, CustomerStatus::Suspended);
    }

    #[test]
    fn attaching_images_is_partial() {
        let mut c = customer();
        c.attach_id_images(Some("https://files/front.jpg".to_string()), None, Utc::now())
            .unwrap();
        c.attach_id_images(None, Some("https://files/back.jpg".to_string()), Utc::now())
            .unwrap();
        assert_eq!(c.id_document.front_url.as_deref(), Some("https://files/front.jpg"));
        assert_eq!(c.id_document.back_url.as_deref(), Some("https://files/back.jpg"));
        assert!(c.attach_id_images(None, None, Utc::now()).is_err());
    }

    #[test]
    fn serialized_record_exposes_customer_id() {
        let json = serde_json::to_value(customer()).unwrap();
        assert_eq!(json["customerId"], "LC-007");
        assert_eq!(json["idDocument"]["frontUrl"], serde_json::Value::Null);
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn create_payload_ignores_a_client_supplied_identifier() {
        let body = serde_json::json!({
            "customerId": "LC-999",
            "name": "Karim",
            "phone": "017",
            "package": "Basic",
            "monthlyFee": 50000
        });
        let parsed: NewCustomer = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.name, "Karim");
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn zone_names_are_stored_trimmed() {
        let mut i = input();
        i.zone = Some("  North ".to_string());
        let mut c = Customer::new(RecordId::new(), EntityKind::Customer.format().render(1), i, Utc::now());
        assert_eq!(c.zone.as_deref(), Some("North"));
        assert!(c.in_zone(" North"));

        let patch: CustomerPatch = serde_json::from_value(serde_json::json!({ "zone": " South " })).unwrap();
        c.apply_patch(patch, Utc::now()).unwrap();
        assert_eq!(c.zone.as_deref(), Some("South"));
    }

    #[test]
    fn patch_tells_null_zone_from_absent_zone() {
        let mut c = customer();
        assert_eq!(c.zone.as_deref(), Some("North"));

        let absent: CustomerPatch = serde_json::from_value(serde_json::json!({ "phone": "019" })).unwrap();
        assert_eq!(absent.zone, None);
        c.apply_patch(absent, Utc::now()).unwrap();
        assert_eq!(c.zone.as_deref(), Some("North"));

        let null: CustomerPatch = serde_json::from_value(serde_json::json!({ "zone": null })).unwrap();
        assert_eq!(null.zone, Some(None));
        assert_eq!(null.assigned_zone(), None);
        c.apply_patch(null, Utc::now()).unwrap();
        assert_eq!(c.zone, None);
    }
}
