//! Service wiring and the request-level operations handlers call into.
//!
//! Every record lives in one [`DocumentStore`] (Postgres or in-memory). The
//! allocator, zone service and typed repository all share it.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use adminhub_core::{EntityKind, IdentifiedRecord, Identifier, Record, RecordId};
use adminhub_infra::{
    DocumentStore, IdentifierAllocator, IdentifierAudit, InMemoryDocumentStore,
    PostgresDocumentStore, Records, ServiceError, ZoneService,
};
use adminhub_isp::Customer;
use adminhub_tourism::{
    Booking, BookingQuote, BookingStatus, Destination, DestinationPatch, Guide, Hotel, NewBooking,
    NewDestination, TourPackage, Tourist, quote,
};

use crate::app::dto::QuoteRequest;
use crate::app::resources::ManagedRecord;
use crate::config::Config;

pub type SharedStore = Arc<dyn DocumentStore>;

#[derive(Clone)]
pub struct AppServices {
    records: Records<SharedStore>,
    allocator: IdentifierAllocator<SharedStore>,
    zones: ZoneService<SharedStore>,
}

impl AppServices {
    pub fn new(store: SharedStore, max_allocation_attempts: u32) -> Self {
        let records = Records::new(store);
        Self {
            allocator: IdentifierAllocator::new(records.clone())
                .with_max_attempts(max_allocation_attempts),
            zones: ZoneService::new(records.clone()),
            records,
        }
    }

    /// Postgres when `DATABASE_URL` is configured, in-memory otherwise.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let store: SharedStore = match &config.database_url {
            Some(url) => {
                let store = PostgresDocumentStore::connect(url).await?;
                info!("using postgres document store");
                Arc::new(store)
            }
            None => Arc::new(InMemoryDocumentStore::new()),
        };
        Ok(Self::new(store, config.max_allocation_attempts))
    }

    pub fn zones(&self) -> &ZoneService<SharedStore> {
        &self.zones
    }

    // -------------------------
    // Identified records
    // -------------------------

    /// Preview only: nothing is reserved.
    pub async fn next_identifier(&self, kind: EntityKind) -> Result<Identifier, ServiceError> {
        Ok(self.allocator.allocate_next(kind).await?)
    }

    #[instrument(skip_all, fields(kind = %R::KIND), err)]
    pub async fn create<R: ManagedRecord>(&self, input: R::New) -> Result<R, ServiceError> {
        R::validate_new(&input)?;
        self.zones.ensure_assignable(R::zone_of_new(&input)).await?;

        let now = Utc::now();
        let record = self
            .allocator
            .create(|identifier| R::build(RecordId::new(), identifier, input.clone(), now))
            .await?;

        info!(identifier = %record.identifier(), "record created");
        Ok(record)
    }

    pub async fn update<R: ManagedRecord>(&self, id: RecordId, patch: R::Patch) -> Result<R, ServiceError> {
        let mut record = self.get::<R>(id).await?;
        self.zones.ensure_assignable(R::zone_of_patch(&patch)).await?;
        record.patch(patch, Utc::now())?;
        self.records.replace(&record).await?;
        Ok(record)
    }

    pub async fn get<R: Record>(&self, id: RecordId) -> Result<R, ServiceError> {
        self.records
            .get::<R>(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(R::COLLECTION.trim_end_matches('s')))
    }

    pub async fn list<R: Record>(&self) -> Result<Vec<R>, ServiceError> {
        Ok(self.records.list::<R>().await?)
    }

    /// Delete and retire the identifier so it is never issued again.
    pub async fn delete_identified<R: IdentifiedRecord>(&self, id: RecordId) -> Result<(), ServiceError> {
        match self.allocator.delete::<R>(id).await? {
            Some(record) => {
                info!(identifier = %record.identifier(), "record deleted");
                Ok(())
            }
            None => Err(ServiceError::not_found(R::KIND.label())),
        }
    }

    pub async fn audit(&self, kind: EntityKind) -> Result<IdentifierAudit, ServiceError> {
        Ok(self.allocator.audit(kind).await?)
    }

    /// Record ID document image URLs for a customer that already exists.
    pub async fn attach_customer_images(
        &self,
        id: RecordId,
        front_url: Option<String>,
        back_url: Option<String>,
    ) -> Result<Customer, ServiceError> {
        let mut customer = self.get::<Customer>(id).await?;
        customer.attach_id_images(front_url, back_url, Utc::now())?;
        self.records.replace(&customer).await?;
        Ok(customer)
    }

    // -------------------------
    // Destinations
    // -------------------------

    pub async fn create_destination(&self, input: NewDestination) -> Result<Destination, ServiceError> {
        input.validate()?;
        let destination = Destination::new(RecordId::new(), input, Utc::now());
        self.records.insert(&destination).await?;
        Ok(destination)
    }

    pub async fn update_destination(
        &self,
        id: RecordId,
        patch: DestinationPatch,
    ) -> Result<Destination, ServiceError> {
        let mut destination = self.get::<Destination>(id).await?;
        destination.apply_patch(patch, Utc::now())?;
        self.records.replace(&destination).await?;
        Ok(destination)
    }

    pub async fn delete_record<R: Record>(&self, id: RecordId) -> Result<(), ServiceError> {
        if self.records.delete::<R>(id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found(R::COLLECTION.trim_end_matches('s')))
        }
    }

    // -------------------------
    // Bookings
    // -------------------------

    async fn price(&self, request: &QuoteRequest) -> Result<BookingQuote, ServiceError> {
        let package = self.get::<TourPackage>(request.package).await?;
        if !package.active {
            return Err(ServiceError::Validation(format!(
                "package {} is not bookable",
                package.package_id
            )));
        }

        let guide = match request.guide {
            Some(id) => {
                let guide = self.get::<Guide>(id).await?;
                if !guide.available {
                    return Err(ServiceError::Validation(format!(
                        "guide {} is not available",
                        guide.guide_id
                    )));
                }
                Some(guide)
            }
            None => None,
        };

        Ok(quote(
            &package,
            guide.as_ref(),
            request.travelers,
            request.start_date,
            request.end_date,
        )?)
    }

    pub async fn quote_booking(&self, request: QuoteRequest) -> Result<BookingQuote, ServiceError> {
        self.price(&request).await
    }

    #[instrument(skip_all, err)]
    pub async fn create_booking(&self, input: NewBooking) -> Result<Booking, ServiceError> {
        self.get::<Tourist>(input.tourist).await?;
        if let Some(hotel) = input.hotel {
            self.get::<Hotel>(hotel).await?;
        }

        let priced = self.price(&QuoteRequest::from(&input)).await?;
        let booking = Booking::new(RecordId::new(), input, priced, Utc::now());
        self.records.insert(&booking).await?;

        info!(booking = %booking.id, total = booking.total_amount(), "booking created");
        Ok(booking)
    }

    pub async fn set_booking_status(
        &self,
        id: RecordId,
        status: BookingStatus,
    ) -> Result<Booking, ServiceError> {
        let mut booking = self.get::<Booking>(id).await?;
        booking.transition_to(status, Utc::now())?;
        self.records.replace(&booking).await?;
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminhub_isp::NewZone;
    use serde_json::json;

    fn services() -> AppServices {
        AppServices::new(Arc::new(InMemoryDocumentStore::new()), 5)
    }

    fn payload<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn customers_get_sequential_identifiers() {
        let s = services();
        let body = json!({ "name": "Rahim", "phone": "017", "package": "Basic", "monthlyFee": 500 });

        let first: Customer = s.create::<Customer>(payload(body.clone())).await.unwrap();
        let second: Customer = s.create::<Customer>(payload(body)).await.unwrap();
        assert_eq!(first.customer_id.as_str(), "LC-001");
        assert_eq!(second.customer_id.as_str(), "LC-002");
        assert_eq!(s.next_identifier(EntityKind::Customer).await.unwrap().as_str(), "LC-003");
    }

    #[tokio::test]
    async fn unknown_zone_is_rejected_before_allocation() {
        let s = services();
        let body = json!({
            "name": "Rahim", "phone": "017", "package": "Basic", "monthlyFee": 500, "zone": "Nowhere"
        });
        let err = s.create::<Customer>(payload(body)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(s.next_identifier(EntityKind::Customer).await.unwrap().as_str(), "LC-001");

        s.zones()
            .create(NewZone {
                name: "Nowhere".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let body = json!({
            "name": "Rahim", "phone": "017", "package": "Basic", "monthlyFee": 500, "zone": "Nowhere"
        });
        assert!(s.create::<Customer>(payload(body)).await.is_ok());
    }

    #[tokio::test]
    async fn booking_is_priced_from_stored_records() {
        let s = services();
        let tourist: Tourist = s
            .create::<Tourist>(payload(json!({ "name": "Ana", "phone": "+3519" })))
            .await
            .unwrap();
        let package: TourPackage = s
            .create::<TourPackage>(payload(json!({
                "name": "Sundarbans", "destination": "Khulna", "durationDays": 3, "price": 12000
            })))
            .await
            .unwrap();
        let guide: Guide = s
            .create::<Guide>(payload(json!({
                "name": "Sumi", "phone": "018", "languages": ["en"], "dayRate": 2000
            })))
            .await
            .unwrap();

        let booking = s
            .create_booking(payload(json!({
                "tourist": tourist.id,
                "package": package.id,
                "guide": guide.id,
                "startDate": "2024-12-01",
                "endDate": "2024-12-03",
                "travelers": 2
            })))
            .await
            .unwrap();
        assert_eq!(booking.total_amount(), 12000 * 2 + 2000 * 3);

        let confirmed = s
            .set_booking_status(booking.id, BookingStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn deleting_an_identified_record_retires_its_number() {
        let s = services();
        let body = json!({ "name": "Ana", "phone": "+3519" });
        let mut last = None;
        for _ in 0..3 {
            last = Some(s.create::<Tourist>(payload(body.clone())).await.unwrap());
        }
        let last = last.unwrap();
        assert_eq!(last.tourist_id.as_str(), "TMS-0003");

        s.delete_identified::<Tourist>(last.id).await.unwrap();
        assert_eq!(s.next_identifier(EntityKind::Tourist).await.unwrap().as_str(), "TMS-0004");
        assert!(matches!(
            s.delete_identified::<Tourist>(last.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn padded_zone_name_does_not_survive_zone_deletion() {
        let s = services();
        s.zones()
            .create(NewZone {
                name: "North".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let body = json!({
            "name": "Rahim", "phone": "017", "package": "Basic", "monthlyFee": 500, "zone": " North "
        });
        let customer: Customer = s.create::<Customer>(payload(body)).await.unwrap();
        assert_eq!(customer.zone.as_deref(), Some("North"));

        let change = s.zones().delete("North", None).await.unwrap();
        assert_eq!(change.customers_updated, 1);
        let stored = s.get::<Customer>(customer.id).await.unwrap();
        assert_eq!(stored.zone, None);
    }

    #[tokio::test]
    async fn patching_zone_to_null_unassigns() {
        let s = services();
        s.zones()
            .create(NewZone {
                name: "North".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let body = json!({
            "name": "Rahim", "phone": "017", "package": "Basic", "monthlyFee": 500, "zone": "North"
        });
        let customer: Customer = s.create::<Customer>(payload(body)).await.unwrap();

        let kept = s
            .update::<Customer>(customer.id, payload(json!({ "phone": "019" })))
            .await
            .unwrap();
        assert_eq!(kept.zone.as_deref(), Some("North"));

        let cleared = s
            .update::<Customer>(customer.id, payload(json!({ "zone": null })))
            .await
            .unwrap();
        assert_eq!(cleared.zone, None);
    }
}
