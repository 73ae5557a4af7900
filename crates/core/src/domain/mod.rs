pub mod address;
pub mod contact;
pub mod form;
pub mod inventory;
pub mod schedule;

pub use address::{AddressKind, AddressRecord, FloorArea};
pub use contact::{Contact, ContactCustomerType};
pub use form::{CustomerTypeSelection, FormData};
pub use inventory::{CustomItemInput, Inventory, ItemId, SpecialItem, SpecialItemKind};
pub use schedule::{Schedule, StartTimePreference};
