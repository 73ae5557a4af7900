use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactCustomerType {
    #[default]
    New,
    Returning,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub customer_type: ContactCustomerType,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub different_contact: bool,
    pub contact_first_name: String,
    pub contact_last_name: String,
    pub contact_phone: String,
    pub agree_privacy: bool,
    pub receive_updates: bool,
}
