//! Zone maintenance.
//!
//! Customers reference zones by name. Every operation here that changes or
//! removes a zone name also rewrites the affected customers, so no customer
//! is left pointing at a zone that does not exist.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

use adminhub_core::RecordId;
use adminhub_core::error::require_text;
use adminhub_isp::{Customer, NewZone, Zone, normalize_name};

use crate::error::ServiceError;
use crate::repository::Records;
use crate::store::DocumentStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneChange {
    pub zone: Option<Zone>,
    /// Customers whose zone reference was rewritten.
    pub customers_updated: usize,
    /// Zone records removed.
    pub zones_removed: usize,
}

#[derive(Debug, Clone)]
pub struct ZoneService<S> {
    records: Records<S>,
}

impl<S> ZoneService<S>
where
    S: DocumentStore,
{
    pub fn new(records: Records<S>) -> Self {
        Self { records }
    }

    pub async fn list(&self) -> Result<Vec<Zone>, ServiceError> {
        Ok(self.records.list::<Zone>().await?)
    }

    pub async fn find(&self, name: &str) -> Result<Option<Zone>, ServiceError> {
        Ok(self.records.find_by_key::<Zone>(&normalize_name(name)).await?)
    }

    pub async fn exists(&self, name: &str) -> Result<bool, ServiceError> {
        Ok(self.find(name).await?.is_some())
    }

    async fn require(&self, name: &str) -> Result<Zone, ServiceError> {
        self.find(name)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("zone '{}'", normalize_name(name))))
    }

    /// Fails with `Validation` if `zone` is set and unknown.
    pub async fn ensure_assignable(&self, zone: Option<&str>) -> Result<(), ServiceError> {
        match zone {
            Some(name) if !self.exists(name).await? => Err(ServiceError::Validation(format!(
                "zone '{}' does not exist",
                normalize_name(name)
            ))),
            _ => Ok(()),
        }
    }

    #[instrument(skip_all, fields(zone = %input.name), err)]
    pub async fn create(&self, input: NewZone) -> Result<Zone, ServiceError> {
        input.validate()?;
        let zone = Zone::new(RecordId::new(), input, Utc::now());
        self.records.insert(&zone).await?;
        Ok(zone)
    }

    /// Rewrite `zone == from` to `to` on every customer.
    async fn reassign_customers(&self, from: &str, to: Option<&str>) -> Result<usize, ServiceError> {
        let now = Utc::now();
        let mut updated = 0;
        for mut customer in self.records.list::<Customer>().await? {
            if customer.in_zone(from) {
                customer.reassign_zone(to.map(str::to_string), now);
                self.records.replace(&customer).await?;
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Rename a zone and move its customers along with it.
    #[instrument(skip(self), err)]
    pub async fn rename(&self, old_name: &str, new_name: &str) -> Result<ZoneChange, ServiceError> {
        let mut zone = self.require(old_name).await?;
        let old = zone.name.clone();

        zone.rename(new_name, Utc::now())?;
        if zone.name == old {
            return Ok(ZoneChange {
                zone: Some(zone),
                customers_updated: 0,
                zones_removed: 0,
            });
        }

        // Unique index rejects renaming onto an existing zone.
        self.records.replace(&zone).await?;
        let customers_updated = self.reassign_customers(&old, Some(&zone.name)).await?;

        info!(from = %old, to = %zone.name, customers_updated, "zone renamed");
        Ok(ZoneChange {
            zone: Some(zone),
            customers_updated,
            zones_removed: 0,
        })
    }

    /// Fold `sources` into `target`, creating `target` if needed.
    ///
    /// All sources must exist; they are checked before anything is changed.
    #[instrument(skip(self), err)]
    pub async fn merge(&self, sources: &[String], target: &str) -> Result<ZoneChange, ServiceError> {
        require_text("target", target)?;
        if sources.is_empty() {
            return Err(ServiceError::Validation("sources must not be empty".to_string()));
        }

        let target_name = normalize_name(target);
        let mut source_zones = Vec::with_capacity(sources.len());
        for name in sources {
            let zone = self.require(name).await?;
            if zone.name != target_name && !source_zones.iter().any(|z: &Zone| z.id == zone.id) {
                source_zones.push(zone);
            }
        }

        let target_zone = match self.find(&target_name).await? {
            Some(zone) => zone,
            None => {
                self.create(NewZone {
                    name: target_name.clone(),
                    description: None,
                })
                .await?
            }
        };

        let mut customers_updated = 0;
        let mut zones_removed = 0;
        for source in &source_zones {
            customers_updated += self
                .reassign_customers(&source.name, Some(&target_zone.name))
                .await?;
            if self.records.delete::<Zone>(source.id).await? {
                zones_removed += 1;
            }
        }

        info!(target = %target_zone.name, customers_updated, zones_removed, "zones merged");
        Ok(ZoneChange {
            zone: Some(target_zone),
            customers_updated,
            zones_removed,
        })
    }

    /// Delete a zone. Its customers move to `reassign_to` (which must exist)
    /// or are left without a zone.
    #[instrument(skip(self), err)]
    pub async fn delete(
        &self,
        name: &str,
        reassign_to: Option<&str>,
    ) -> Result<ZoneChange, ServiceError> {
        let zone = self.require(name).await?;

        let destination = match reassign_to {
            Some(other) => {
                let other = self.require(other).await?;
                if other.id == zone.id {
                    return Err(ServiceError::Validation(
                        "cannot reassign customers to the zone being deleted".to_string(),
                    ));
                }
                Some(other)
            }
            None => None,
        };

        let customers_updated = self
            .reassign_customers(&zone.name, destination.as_ref().map(|z| z.name.as_str()))
            .await?;
        let removed = self.records.delete::<Zone>(zone.id).await?;

        info!(zone = %zone.name, customers_updated, "zone deleted");
        Ok(ZoneChange {
            zone: destination,
            customers_updated,
            zones_removed: usize::from(removed),
        })
    }

    /// Unassign customers whose zone has no zone record.
    #[instrument(skip(self), err)]
    pub async fn repair_dangling(&self) -> Result<ZoneChange, ServiceError> {
        let known: Vec<String> = self
            .records
            .list::<Zone>()
            .await?
            .into_iter()
            .map(|z| z.name)
            .collect();

        let now = Utc::now();
        let mut customers_updated = 0;
        for mut customer in self.records.list::<Customer>().await? {
            let dangling = customer
                .zone
                .as_ref()
                .is_some_and(|zone| !known.contains(&normalize_name(zone)));
            if dangling {
                customer.reassign_zone(None, now);
                self.records.replace(&customer).await?;
                customers_updated += 1;
            }
        }

        info!(customers_updated, "dangling zone references repaired");
        Ok(ZoneChange {
            zone: None,
            customers_updated,
            zones_removed: 0,
        })
    }
}
