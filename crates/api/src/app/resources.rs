//! Record kinds served by the generic identified-record routes.
//!
//! Each kind plugs its create/patch payloads and constructors into
//! [`ManagedRecord`]; allocation, storage and HTTP handling are shared.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use adminhub_core::{DomainResult, IdentifiedRecord, Identifier, RecordId};
use adminhub_isp::{Customer, CustomerPatch, NewCustomer};
use adminhub_tourism::{
    Guide, GuidePatch, Hotel, HotelPatch, NewGuide, NewHotel, NewTourPackage, NewTourist,
    TourPackage, TourPackagePatch, Tourist, TouristPatch,
};

pub trait ManagedRecord: IdentifiedRecord {
    type New: DeserializeOwned + Clone + Send + Sync + 'static;
    type Patch: DeserializeOwned + Send + 'static;

    fn validate_new(input: &Self::New) -> DomainResult<()>;

    fn build(id: RecordId, identifier: Identifier, input: Self::New, now: DateTime<Utc>) -> Self;

    fn patch(&mut self, patch: Self::Patch, now: DateTime<Utc>) -> DomainResult<()>;

    /// Zone the payload assigns, if the kind references zones.
    fn zone_of_new(_input: &Self::New) -> Option<&str> {
        None
    }

    fn zone_of_patch(_patch: &Self::Patch) -> Option<&str> {
        None
    }
}

impl ManagedRecord for Customer {
    type New = NewCustomer;
    type Patch = CustomerPatch;

    fn validate_new(input: &NewCustomer) -> DomainResult<()> {
        input.validate()
    }

    fn build(id: RecordId, identifier: Identifier, input: NewCustomer, now: DateTime<Utc>) -> Self {
        Customer::new(id, identifier, input, now)
    }

    fn patch(&mut self, patch: CustomerPatch, now: DateTime<Utc>) -> DomainResult<()> {
        self.apply_patch(patch, now)
    }

    fn zone_of_new(input: &NewCustomer) -> Option<&str> {
        input.zone.as_deref()
    }

    fn zone_of_patch(patch: &CustomerPatch) -> Option<&str> {
        patch.assigned_zone()
    }
}

macro_rules! managed_record {
    ($t:ty, $new:ty, $patch:ty) => {
        impl ManagedRecord for $t {
            type New = $new;
            type Patch = $patch;

            fn validate_new(input: &$new) -> DomainResult<()> {
                input.validate()
            }

            fn build(id: RecordId, identifier: Identifier, input: $new, now: DateTime<Utc>) -> Self {
                <$t>::new(id, identifier, input, now)
            }

            fn patch(&mut self, patch: $patch, now: DateTime<Utc>) -> DomainResult<()> {
                self.apply_patch(patch, now)
            }
        }
    };
}

managed_record!(Guide, NewGuide, GuidePatch);
managed_record!(TourPackage, NewTourPackage, TourPackagePatch);
managed_record!(Tourist, NewTourist, TouristPatch);
managed_record!(Hotel, NewHotel, HotelPatch);
