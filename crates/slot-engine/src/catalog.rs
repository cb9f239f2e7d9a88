//! Service lookup and VIP/standard classification.

use std::collections::HashMap;

use crate::model::Service;

/// How a booked service counts toward slot occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceClass {
    /// Reserves the whole slot.
    Vip,
    /// Shares the slot up to the standard capacity.
    Standard,
    /// Service id not in the catalog (deleted or stale reference).
    Unknown,
}

/// Services keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    services: HashMap<String, Service>,
}

impl ServiceCatalog {
    pub fn new(services: impl IntoIterator<Item = Service>) -> Self {
        Self {
            services: services.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    pub fn get(&self, service_id: &str) -> Option<&Service> {
        self.services.get(service_id)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Classify a booked service id.
    ///
    /// Unknown ids are not an error: the booking views tolerate partial data,
    /// so such appointments are simply left out of VIP/standard accounting.
    pub fn classify(&self, service_id: &str) -> ServiceClass {
        match self.services.get(service_id) {
            Some(service) if service.is_vip_only => ServiceClass::Vip,
            Some(_) => ServiceClass::Standard,
            None => {
                tracing::debug!(service_id, "unknown service; excluded from occupancy");
                ServiceClass::Unknown
            }
        }
    }
}

impl FromIterator<Service> for ServiceCatalog {
    fn from_iter<I: IntoIterator<Item = Service>>(iter: I) -> Self {
        Self::new(iter)
    }
}
