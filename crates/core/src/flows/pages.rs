use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::address::AddressKind;

/// The slice of [`FormData`](crate::domain::FormData) a page reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SlotRef {
    CustomerType,
    PickupAddress(usize),
    DropoffAddress(usize),
    Inventory,
    Schedule,
    Services,
    Contact,
}

impl SlotRef {
    pub fn address(kind: AddressKind, index: usize) -> Self {
        match kind {
            AddressKind::Pickup => Self::PickupAddress(index),
            AddressKind::Dropoff => Self::DropoffAddress(index),
        }
    }

    pub fn as_address(&self) -> Option<(AddressKind, usize)> {
        match self {
            Self::PickupAddress(index) => Some((AddressKind::Pickup, *index)),
            Self::DropoffAddress(index) => Some((AddressKind::Dropoff, *index)),
            _ => None,
        }
    }

    /// Top-level field name in the submitted payload.
    pub fn slot_name(&self) -> &'static str {
        match self {
            Self::CustomerType => "customerType",
            Self::PickupAddress(_) => "pickupAddresses",
            Self::DropoffAddress(_) => "dropoffAddresses",
            Self::Inventory => "inventory",
            Self::Schedule => "schedule",
            Self::Services => "servicesSelected",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_address() {
            Some((_, index)) => write!(f, "{}[{index}]", self.slot_name()),
            None => f.write_str(self.slot_name()),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DataKeyError {
    #[error("malformed data key `{0}`")]
    Malformed(String),
    #[error("unknown data key `{0}`")]
    UnknownSlot(String),
    #[error("data key `{0}` does not address a sequence slot")]
    NotIndexable(String),
    #[error("data key `{0}` must carry an index")]
    MissingIndex(String),
}

impl FromStr for SlotRef {
    type Err = DataKeyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = raw.trim();
        let (name, index) = match key.split_once('[') {
            Some((name, rest)) => {
                let digits = rest
                    .strip_suffix(']')
                    .filter(|digits| !digits.is_empty())
                    .ok_or_else(|| DataKeyError::Malformed(raw.to_owned()))?;
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| DataKeyError::Malformed(raw.to_owned()))?;
                (name, Some(index))
            }
            None => (key, None),
        };

        match (name, index) {
            ("pickupAddresses", Some(index)) => Ok(Self::PickupAddress(index)),
            ("dropoffAddresses", Some(index)) => Ok(Self::DropoffAddress(index)),
            ("pickupAddresses" | "dropoffAddresses", None) => {
                Err(DataKeyError::MissingIndex(raw.to_owned()))
            }
            ("customerType" | "inventory" | "schedule" | "servicesSelected" | "contact", Some(_)) => {
                Err(DataKeyError::NotIndexable(raw.to_owned()))
            }
            ("customerType", None) => Ok(Self::CustomerType),
            ("inventory", None) => Ok(Self::Inventory),
            ("schedule", None) => Ok(Self::Schedule),
            ("servicesSelected", None) => Ok(Self::Services),
            ("contact", None) => Ok(Self::Contact),
            _ => Err(DataKeyError::UnknownSlot(raw.to_owned())),
        }
    }
}

impl TryFrom<String> for SlotRef {
    type Error = DataKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotRef> for String {
    fn from(value: SlotRef) -> Self {
        value.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PageId {
    CustomerType,
    PickupAddress(usize),
    DropoffAddress(usize),
    QuoteType,
    Inventory,
    FragileItems,
    HeavyItems,
    MovingDate,
    AdditionalServices,
    ContactDetails,
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CustomerType => f.write_str("customer-type"),
            Self::PickupAddress(index) => write!(f, "address-from-{index}"),
            Self::DropoffAddress(index) => write!(f, "address-to-{index}"),
            Self::QuoteType => f.write_str("quote-type"),
            Self::Inventory => f.write_str("inventory"),
            Self::FragileItems => f.write_str("fragile-items"),
            Self::HeavyItems => f.write_str("heavy-items"),
            Self::MovingDate => f.write_str("moving-date"),
            Self::AdditionalServices => f.write_str("additional-services"),
            Self::ContactDetails => f.write_str("contact-details"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown page id `{0}`")]
pub struct UnknownPageId(pub String);

impl FromStr for PageId {
    type Err = UnknownPageId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let indexed = |prefix: &str| {
            raw.strip_prefix(prefix).and_then(|rest| rest.parse::<usize>().ok())
        };
        if let Some(index) = indexed("address-from-") {
            return Ok(Self::PickupAddress(index));
        }
        if let Some(index) = indexed("address-to-") {
            return Ok(Self::DropoffAddress(index));
        }

        match raw {
            "customer-type" => Ok(Self::CustomerType),
            "quote-type" => Ok(Self::QuoteType),
            "inventory" => Ok(Self::Inventory),
            "fragile-items" => Ok(Self::FragileItems),
            "heavy-items" => Ok(Self::HeavyItems),
            "moving-date" => Ok(Self::MovingDate),
            "additional-services" => Ok(Self::AdditionalServices),
            "contact-details" => Ok(Self::ContactDetails),
            other => Err(UnknownPageId(other.to_owned())),
        }
    }
}

impl TryFrom<String> for PageId {
    type Error = UnknownPageId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PageId> for String {
    fn from(value: PageId) -> Self {
        value.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepComponent {
    CustomerType,
    AddressDetails,
    QuoteType,
    Inventory,
    FragileItems,
    HeavyItems,
    MovingDateTime,
    Services,
    ContactDetails,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormType {
    SingleSelection,
    MultiStep,
    Final,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPageProps {
    pub title: String,
    pub subtitle: String,
    pub address_type: AddressKind,
    pub show_add_another: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    pub id: PageId,
    /// Progress-indicator bucket (1..=7); several pages share one.
    pub display_step: u8,
    #[serde(rename = "dataKey")]
    pub slot: SlotRef,
    pub component: StepComponent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<AddressPageProps>,
    pub form_type: FormType,
    #[serde(default)]
    pub requires_selection: bool,
}

impl PageDescriptor {
    pub fn data_key(&self) -> String {
        self.slot.to_string()
    }

    pub fn address_kind(&self) -> Option<AddressKind> {
        self.props.as_ref().map(|props| props.address_type)
    }

    pub fn is_final(&self) -> bool {
        self.form_type == FormType::Final
    }
}
