use serde::{Deserialize, Serialize};

use crate::catalog::ServiceId;
use crate::domain::address::{AddressKind, AddressRecord};
use crate::domain::contact::Contact;
use crate::domain::inventory::Inventory;
use crate::domain::schedule::Schedule;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerTypeSelection {
    pub customer_type: String,
}

/// Everything collected by one wizard session. Both address sequences always
/// hold at least one record and only ever grow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub customer_type: CustomerTypeSelection,
    pickup_addresses: Vec<AddressRecord>,
    dropoff_addresses: Vec<AddressRecord>,
    pub inventory: Inventory,
    pub schedule: Schedule,
    pub services_selected: Vec<ServiceId>,
    pub contact: Contact,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            customer_type: CustomerTypeSelection::default(),
            pickup_addresses: vec![AddressRecord::empty()],
            dropoff_addresses: vec![AddressRecord::empty()],
            inventory: Inventory::default(),
            schedule: Schedule::default(),
            services_selected: Vec::new(),
            contact: Contact::default(),
        }
    }
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn addresses(&self, kind: AddressKind) -> &[AddressRecord] {
        match kind {
            AddressKind::Pickup => &self.pickup_addresses,
            AddressKind::Dropoff => &self.dropoff_addresses,
        }
    }

    pub fn address(&self, kind: AddressKind, index: usize) -> Option<&AddressRecord> {
        self.addresses(kind).get(index)
    }

    pub fn address_mut(&mut self, kind: AddressKind, index: usize) -> Option<&mut AddressRecord> {
        match kind {
            AddressKind::Pickup => self.pickup_addresses.get_mut(index),
            AddressKind::Dropoff => self.dropoff_addresses.get_mut(index),
        }
    }

    pub fn pickup_addresses(&self) -> &[AddressRecord] {
        &self.pickup_addresses
    }

    pub fn dropoff_addresses(&self) -> &[AddressRecord] {
        &self.dropoff_addresses
    }

    pub fn address_count(&self, kind: AddressKind) -> usize {
        self.addresses(kind).len()
    }

    /// Appends an empty record and returns its index.
    pub fn push_address(&mut self, kind: AddressKind) -> usize {
        let addresses = match kind {
            AddressKind::Pickup => &mut self.pickup_addresses,
            AddressKind::Dropoff => &mut self.dropoff_addresses,
        };
        addresses.push(AddressRecord::empty());
        addresses.len() - 1
    }

    pub fn toggle_service(&mut self, service_id: ServiceId) -> bool {
        if let Some(position) = self.services_selected.iter().position(|id| id == &service_id) {
            self.services_selected.remove(position);
            false
        } else {
            self.services_selected.push(service_id);
            true
        }
    }

    /// Restores the non-empty address invariant on payloads that arrive from
    /// outside the wizard.
    pub fn normalize(&mut self) {
        if self.pickup_addresses.is_empty() {
            self.pickup_addresses.push(AddressRecord::empty());
        }
        if self.dropoff_addresses.is_empty() {
            self.dropoff_addresses.push(AddressRecord::empty());
        }
    }
}
