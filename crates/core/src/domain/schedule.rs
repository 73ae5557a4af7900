use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartTimePreference {
    #[default]
    #[serde(rename = "")]
    Unset,
    Flexible,
    Preferred,
    Required,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Schedule {
    /// ISO `YYYY-MM-DD`, empty until a date is picked.
    pub moving_date: String,
    pub flexible_date: bool,
    pub start_time_preference: StartTimePreference,
    pub start_time_slot: String,
    pub additional_time_details: String,
}

impl Schedule {
    pub fn set_start_time_preference(&mut self, preference: StartTimePreference) {
        if preference == StartTimePreference::Flexible {
            self.start_time_slot.clear();
        }
        self.start_time_preference = preference;
    }
}
