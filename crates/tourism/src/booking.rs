//! Bookings and their price arithmetic.
//!
//! `total = package.price * travelers + guide.day_rate * days`, where `days`
//! counts calendar days inclusively (`end - start + 1`). Without a guide the
//! guide component is zero. The inputs used are snapshotted on the booking so
//! later price edits do not rewrite past totals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use adminhub_core::{DomainError, DomainResult, Entity, Record, RecordId};

use crate::{Guide, TourPackage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// pending -> confirmed -> completed; pending|confirmed -> cancelled.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Confirmed, Completed) | (Pending, Cancelled) | (Confirmed, Cancelled)
        )
    }
}

/// Price breakdown for a prospective or stored booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuote {
    pub package_price: u64,
    pub travelers: u32,
    pub guide_day_rate: u64,
    pub days: u32,
    pub package_amount: u64,
    pub guide_amount: u64,
    pub total_amount: u64,
}

/// Compute the booking total from the package, optional guide and date span.
pub fn quote(
    package: &TourPackage,
    guide: Option<&Guide>,
    travelers: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> DomainResult<BookingQuote> {
    if travelers == 0 {
        return Err(DomainError::validation("travelers must be at least 1"));
    }
    if end_date < start_date {
        return Err(DomainError::validation("endDate must not be before startDate"));
    }

    let days = u32::try_from((end_date - start_date).num_days() + 1)
        .map_err(|_| DomainError::validation("date span is too long"))?;
    let guide_day_rate = guide.map(|g| g.day_rate).unwrap_or(0);

    let overflow = || DomainError::validation("booking amount overflows");
    let package_amount = package
        .price
        .checked_mul(u64::from(travelers))
        .ok_or_else(overflow)?;
    let guide_amount = guide_day_rate
        .checked_mul(u64::from(days))
        .ok_or_else(overflow)?;
    let total_amount = package_amount.checked_add(guide_amount).ok_or_else(overflow)?;

    Ok(BookingQuote {
        package_price: package.price,
        travelers,
        guide_day_rate,
        days,
        package_amount,
        guide_amount,
        total_amount,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: RecordId,
    pub tourist: RecordId,
    pub package: RecordId,
    pub guide: Option<RecordId>,
    pub hotel: Option<RecordId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers: u32,
    pub quote: BookingQuote,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload; references are storage ids of existing records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub tourist: RecordId,
    pub package: RecordId,
    #[serde(default)]
    pub guide: Option<RecordId>,
    #[serde(default)]
    pub hotel: Option<RecordId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Booking {
    pub fn new(id: RecordId, input: NewBooking, quote: BookingQuote, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tourist: input.tourist,
            package: input.package,
            guide: input.guide,
            hotel: input.hotel,
            start_date: input.start_date,
            end_date: input.end_date,
            travelers: input.travelers,
            quote,
            status: BookingStatus::Pending,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn total_amount(&self) -> u64 {
        self.quote.total_amount
    }

    pub fn transition_to(&mut self, next: BookingStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invariant(format!(
                "cannot move booking from {:?} to {:?}",
                self.status, next
            )));
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Booking {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Booking {
    const COLLECTION: &'static str = "bookings";

    fn business_key(&self) -> Option<String> {
        None
    }
}
