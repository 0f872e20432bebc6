//! Human-facing, prefixed sequential identifiers (`LC-007`, `GD-012`, ...).
//!
//! Each [`EntityKind`] owns an independent sequence rendered through a static
//! [`IdFormat`] (prefix + zero-pad width). Formats are data, not per-call-site
//! logic: every allocation, preview and audit goes through the same table.

use core::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Entity categories that carry their own identifier sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Customer,
    Guide,
    TourPackage,
    Tourist,
    Hotel,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Customer,
        EntityKind::Guide,
        EntityKind::TourPackage,
        EntityKind::Tourist,
        EntityKind::Hotel,
    ];

    /// Canonical identifier format for this kind.
    pub const fn format(self) -> IdFormat {
        match self {
            EntityKind::Customer => IdFormat::new("LC", 3),
            EntityKind::Guide => IdFormat::new("GD", 3),
            EntityKind::TourPackage => IdFormat::new("PKG", 3),
            EntityKind::Tourist => IdFormat::new("TMS", 4),
            EntityKind::Hotel => IdFormat::new("H", 3),
        }
    }

    /// Store collection holding records of this kind.
    pub const fn collection(self) -> &'static str {
        match self {
            EntityKind::Customer => "customers",
            EntityKind::Guide => "guides",
            EntityKind::TourPackage => "packages",
            EntityKind::Tourist => "tourists",
            EntityKind::Hotel => "hotels",
        }
    }

    /// Singular, user-facing name ("customer", "package").
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Customer => "customer",
            EntityKind::Guide => "guide",
            EntityKind::TourPackage => "package",
            EntityKind::Tourist => "tourist",
            EntityKind::Hotel => "hotel",
        }
    }

    /// JSON field carrying the identifier on the record (`customerId`).
    pub const fn identifier_field(self) -> &'static str {
        match self {
            EntityKind::Customer => "customerId",
            EntityKind::Guide => "guideId",
            EntityKind::TourPackage => "packageId",
            EntityKind::Tourist => "touristId",
            EntityKind::Hotel => "hotelId",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = DomainError;

    /// Accepts the singular label or the collection name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|k| k.label() == s || k.collection() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown entity kind '{s}'")))
    }
}

/// Prefix + zero-pad width of one kind's identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdFormat {
    prefix: &'static str,
    width: usize,
}

impl IdFormat {
    pub const fn new(prefix: &'static str, width: usize) -> Self {
        Self { prefix, width }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Render `sequence` as `PREFIX-<digits>`.
    ///
    /// Digits are zero-padded to the width; a sequence that needs more digits
    /// widens the output (`LC-1000`), it never wraps or truncates.
    pub fn render(&self, sequence: u64) -> Identifier {
        Identifier(format!(
            "{}-{:0width$}",
            self.prefix,
            sequence,
            width = self.width
        ))
    }

    /// Strictly parse a canonical identifier of this format.
    ///
    /// Requires `PREFIX-` followed by at least `width` digits. Legacy shapes
    /// (`H003`, `T-2024-01`) are rejected rather than coerced.
    pub fn parse(&self, raw: &str) -> DomainResult<Identifier> {
        let digits = raw
            .strip_prefix(self.prefix)
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or_else(|| {
                DomainError::invalid_id(format!("'{raw}' does not start with '{}-'", self.prefix))
            })?;

        if digits.len() < self.width || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_id(format!(
                "'{raw}' must end in at least {} digits",
                self.width
            )));
        }
        digits
            .parse::<u64>()
            .map_err(|e| DomainError::invalid_id(format!("'{raw}': {e}")))?;

        Ok(Identifier(raw.to_string()))
    }

    /// Compile a scanner matching `^PREFIX-\d+$` for sequence extraction.
    pub fn scanner(&self) -> DomainResult<IdScanner> {
        let pattern = Regex::new(&format!(r"^{}-(\d+)$", regex::escape(self.prefix)))
            .map_err(|e| DomainError::invariant(format!("identifier pattern: {e}")))?;
        Ok(IdScanner { pattern })
    }
}

/// Extracts numeric suffixes from stored identifiers of one format.
#[derive(Debug, Clone)]
pub struct IdScanner {
    pattern: Regex,
}

impl IdScanner {
    /// Numeric suffix of `raw`, or `None` if it does not match the format
    /// (or its digits do not fit in a `u64`).
    pub fn sequence_of(&self, raw: &str) -> Option<u64> {
        let caps = self.pattern.captures(raw)?;
        caps.get(1)?.as_str().parse().ok()
    }
}

/// A formatted identifier, persisted as the record's business key.
///
/// New identifiers only come out of [`IdFormat::render`] / [`IdFormat::parse`].
/// Deserialization keeps stored values verbatim so legacy data stays visible
/// (and reportable) instead of failing reads or being silently rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl ValueObject for Identifier {}

impl core::fmt::Display for Identifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn renders_zero_padded_to_width() {
        let f = EntityKind::Customer.format();
        assert_eq!(f.render(7).as_str(), "LC-007");
        assert_eq!(EntityKind::Tourist.format().render(1).as_str(), "TMS-0001");
        assert_eq!(EntityKind::Hotel.format().render(3).as_str(), "H-003");
    }

    #[test]
    fn widens_instead_of_wrapping() {
        let f = EntityKind::Customer.format();
        assert_eq!(f.render(1000).as_str(), "LC-1000");
        assert_eq!(f.render(0).as_str(), "LC-000");
    }

    #[test]
    fn parse_rejects_legacy_shapes() {
        let hotel = EntityKind::Hotel.format();
        assert!(hotel.parse("H-003").is_ok());
        assert!(hotel.parse("H003").is_err());

        let tourist = EntityKind::Tourist.format();
        assert!(tourist.parse("TMS-0042").is_ok());
        assert!(tourist.parse("T-2024-01").is_err());
        assert!(tourist.parse("TMS-42").is_err());
    }

    #[test]
    fn parse_accepts_widened_values() {
        let f = EntityKind::Guide.format();
        assert_eq!(f.parse("GD-1200").unwrap().as_str(), "GD-1200");
        assert!(f.parse("GD-12a").is_err());
        assert!(f.parse("LC-001").is_err());
    }

    #[test]
    fn scanner_ignores_other_prefixes_and_garbage() {
        let s = EntityKind::TourPackage.format().scanner().unwrap();
        assert_eq!(s.sequence_of("PKG-002"), Some(2));
        assert_eq!(s.sequence_of("PKG-1"), Some(1));
        assert_eq!(s.sequence_of("PKG-abc"), None);
        assert_eq!(s.sequence_of("XPKG-002"), None);
        assert_eq!(s.sequence_of("PKG-002 "), None);
        assert_eq!(s.sequence_of("PKG-99999999999999999999999"), None);
    }

    #[test]
    fn kind_parses_from_label_or_collection() {
        assert_eq!("customers".parse::<EntityKind>().unwrap(), EntityKind::Customer);
        assert_eq!("package".parse::<EntityKind>().unwrap(), EntityKind::TourPackage);
        assert_eq!("Hotel".parse::<EntityKind>().unwrap(), EntityKind::Hotel);
        assert!("zone".parse::<EntityKind>().is_err());
    }

    #[test]
    fn identifier_serializes_as_plain_string() {
        let id = EntityKind::Guide.format().render(4);
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("GD-004"));
    }

    proptest! {
        #[test]
        fn rendered_identifiers_scan_back_to_their_sequence(seq in 0u64..10_000_000) {
            for kind in EntityKind::ALL {
                let f = kind.format();
                let id = f.render(seq);
                let digits = id.as_str().len() - f.prefix().len() - 1;
                prop_assert_eq!(digits, f.width().max(seq.to_string().len()));
                prop_assert_eq!(f.scanner().unwrap().sequence_of(id.as_str()), Some(seq));
                prop_assert!(f.parse(id.as_str()).is_ok());
            }
        }
    }
}
