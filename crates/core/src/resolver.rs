//! Keyed reads and writes against [`FormData`], addressed by [`SlotRef`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::ServiceId;
use crate::domain::{AddressRecord, Contact, CustomerTypeSelection, FormData, Inventory, Schedule};
use crate::flows::pages::SlotRef;

/// Owned payload for one slot, as handed back by a step's update callback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotValue {
    CustomerType(CustomerTypeSelection),
    Address(AddressRecord),
    Inventory(Inventory),
    Schedule(Schedule),
    Services(Vec<ServiceId>),
    Contact(Contact),
}

impl SlotValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CustomerType(_) => "customer_type",
            Self::Address(_) => "address",
            Self::Inventory(_) => "inventory",
            Self::Schedule(_) => "schedule",
            Self::Services(_) => "services",
            Self::Contact(_) => "contact",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotView<'a> {
    CustomerType(&'a CustomerTypeSelection),
    Address(&'a AddressRecord),
    Inventory(&'a Inventory),
    Schedule(&'a Schedule),
    Services(&'a [ServiceId]),
    Contact(&'a Contact),
}

impl SlotView<'_> {
    pub fn to_value(&self) -> SlotValue {
        match *self {
            Self::CustomerType(value) => SlotValue::CustomerType(value.clone()),
            Self::Address(value) => SlotValue::Address(value.clone()),
            Self::Inventory(value) => SlotValue::Inventory(value.clone()),
            Self::Schedule(value) => SlotValue::Schedule(value.clone()),
            Self::Services(value) => SlotValue::Services(value.to_vec()),
            Self::Contact(value) => SlotValue::Contact(value.clone()),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolverError {
    #[error("slot `{slot}` cannot hold a `{value}` value")]
    SlotMismatch { slot: SlotRef, value: &'static str },
    #[error("slot `{slot}` is out of range (sequence length {len})")]
    IndexOutOfRange { slot: SlotRef, len: usize },
}

/// Reads the slice a page is bound to. Indexed reads past the end of an
/// address sequence return `None`.
pub fn resolve(form: &FormData, slot: SlotRef) -> Option<SlotView<'_>> {
    let view = match slot {
        SlotRef::CustomerType => SlotView::CustomerType(&form.customer_type),
        SlotRef::PickupAddress(_) | SlotRef::DropoffAddress(_) => {
            let (kind, index) = slot.as_address()?;
            SlotView::Address(form.address(kind, index)?)
        }
        SlotRef::Inventory => SlotView::Inventory(&form.inventory),
        SlotRef::Schedule => SlotView::Schedule(&form.schedule),
        SlotRef::Services => SlotView::Services(&form.services_selected),
        SlotRef::Contact => SlotView::Contact(&form.contact),
    };
    Some(view)
}

/// Replaces exactly the addressed slice. Rejected writes leave `form`
/// untouched.
pub fn apply(form: &mut FormData, slot: SlotRef, value: SlotValue) -> Result<(), ResolverError> {
    match (slot, value) {
        (SlotRef::CustomerType, SlotValue::CustomerType(value)) => form.customer_type = value,
        (SlotRef::PickupAddress(_) | SlotRef::DropoffAddress(_), SlotValue::Address(value)) => {
            let Some((kind, index)) = slot.as_address() else {
                return Err(ResolverError::SlotMismatch { slot, value: "address" });
            };
            let len = form.address_count(kind);
            let target = form
                .address_mut(kind, index)
                .ok_or(ResolverError::IndexOutOfRange { slot, len })?;
            *target = value;
        }
        (SlotRef::Inventory, SlotValue::Inventory(value)) => form.inventory = value,
        (SlotRef::Schedule, SlotValue::Schedule(value)) => form.schedule = value,
        (SlotRef::Services, SlotValue::Services(value)) => form.services_selected = value,
        (SlotRef::Contact, SlotValue::Contact(value)) => form.contact = value,
        (slot, value) => return Err(ResolverError::SlotMismatch { slot, value: value.kind() }),
    }
    Ok(())
}
