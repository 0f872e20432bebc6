//! Tourism desk: tourists, guides, tour packages, hotels, destinations and
//! the bookings tying them together.

macro_rules! impl_identified_record {
    ($t:ty, $kind:expr, $field:ident) => {
        impl adminhub_core::Entity for $t {
            type Id = adminhub_core::RecordId;

            fn id(&self) -> &Self::Id {
                &self.id
            }
        }

        impl adminhub_core::Record for $t {
            const COLLECTION: &'static str = $kind.collection();

            fn business_key(&self) -> Option<String> {
                Some(self.$field.to_string())
            }
        }

        impl adminhub_core::IdentifiedRecord for $t {
            const KIND: adminhub_core::EntityKind = $kind;

            fn identifier(&self) -> &adminhub_core::Identifier {
                &self.$field
            }
        }
    };
}

pub mod booking;
pub mod destination;
pub mod guide;
pub mod hotel;
pub mod package;
pub mod tourist;

pub use booking::{Booking, BookingQuote, BookingStatus, NewBooking, quote};
pub use destination::{Destination, DestinationPatch, NewDestination};
pub use guide::{Guide, GuidePatch, NewGuide};
pub use hotel::{Hotel, HotelPatch, NewHotel};
pub use package::{NewTourPackage, TourPackage, TourPackagePatch};
pub use tourist::{NewTourist, Tourist, TouristPatch};
