use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Pickup,
    Dropoff,
}

impl AddressKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Dropoff => "dropoff",
        }
    }
}

/// Living area of a property. A square-meter figure and "not applicable" can
/// never both be set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FloorArea {
    #[default]
    Unspecified,
    SquareMeters(String),
    NotApplicable,
}

impl FloorArea {
    pub fn square_meters(&self) -> &str {
        match self {
            Self::SquareMeters(value) => value,
            Self::Unspecified | Self::NotApplicable => "",
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AddressWire", into = "AddressWire")]
pub struct AddressRecord {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub property_type: String,
    pub floor_area: FloorArea,
    pub floor: String,
    pub multiple_floors: bool,
    pub elevator: String,
    pub access: String,
    pub walking_distance: String,
    pub additional_details: String,
}

impl AddressRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Typing a value clears "not applicable"; clearing the field leaves the
    /// area unspecified.
    pub fn set_square_meters(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.floor_area = if value.trim().is_empty() {
            FloorArea::Unspecified
        } else {
            FloorArea::SquareMeters(value)
        };
    }

    pub fn set_square_meters_not_applicable(&mut self, not_applicable: bool) {
        if not_applicable {
            self.floor_area = FloorArea::NotApplicable;
        } else if self.floor_area.is_not_applicable() {
            self.floor_area = FloorArea::Unspecified;
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AddressWire {
    street_address: String,
    city: String,
    state: String,
    zip_code: String,
    property_type: String,
    square_meters: String,
    square_meters_not_applicable: bool,
    floor: String,
    multiple_floors: bool,
    elevator: String,
    access: String,
    walking_distance: String,
    additional_details: String,
}

impl From<AddressWire> for AddressRecord {
    fn from(wire: AddressWire) -> Self {
        // "not applicable" wins when an older payload carries both.
        let floor_area = if wire.square_meters_not_applicable {
            FloorArea::NotApplicable
        } else if wire.square_meters.trim().is_empty() {
            FloorArea::Unspecified
        } else {
            FloorArea::SquareMeters(wire.square_meters)
        };

        Self {
            street_address: wire.street_address,
            city: wire.city,
            state: wire.state,
            zip_code: wire.zip_code,
            property_type: wire.property_type,
            floor_area,
            floor: wire.floor,
            multiple_floors: wire.multiple_floors,
            elevator: wire.elevator,
            access: wire.access,
            walking_distance: wire.walking_distance,
            additional_details: wire.additional_details,
        }
    }
}

impl From<AddressRecord> for AddressWire {
    fn from(record: AddressRecord) -> Self {
        Self {
            square_meters: record.floor_area.square_meters().to_owned(),
            square_meters_not_applicable: record.floor_area.is_not_applicable(),
            street_address: record.street_address,
            city: record.city,
            state: record.state,
            zip_code: record.zip_code,
            property_type: record.property_type,
            floor: record.floor,
            multiple_floors: record.multiple_floors,
            elevator: record.elevator,
            access: record.access,
            walking_distance: record.walking_distance,
            additional_details: record.additional_details,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{AddressRecord, FloorArea};

    #[test]
    fn square_meters_and_not_applicable_are_exclusive() {
        let mut address = AddressRecord::empty();
        address.set_square_meters("72");
        assert_eq!(address.floor_area, FloorArea::SquareMeters("72".to_owned()));

        address.set_square_meters_not_applicable(true);
        assert_eq!(address.floor_area, FloorArea::NotApplicable);
        assert_eq!(address.floor_area.square_meters(), "");

        address.set_square_meters("55");
        assert!(!address.floor_area.is_not_applicable());
    }

    #[test]
    fn unchecking_not_applicable_leaves_area_unspecified() {
        let mut address = AddressRecord::empty();
        address.set_square_meters_not_applicable(true);
        address.set_square_meters_not_applicable(false);
        assert_eq!(address.floor_area, FloorArea::Unspecified);

        address.set_square_meters("40");
        address.set_square_meters_not_applicable(false);
        assert_eq!(address.floor_area, FloorArea::SquareMeters("40".to_owned()));
    }

    #[test]
    fn serializes_with_flat_square_meter_fields() {
        let mut address = AddressRecord::empty();
        address.city = "Helsinki".to_owned();
        address.set_square_meters("64");

        let value = serde_json::to_value(&address).expect("serialize address");
        assert_eq!(value["city"], "Helsinki");
        assert_eq!(value["squareMeters"], "64");
        assert_eq!(value["squareMetersNotApplicable"], false);
    }

    #[test]
    fn conflicting_payload_resolves_to_not_applicable() {
        let address: AddressRecord = serde_json::from_value(json!({
            "streetAddress": "Mannerheimintie 1",
            "squareMeters": "80",
            "squareMetersNotApplicable": true
        }))
        .expect("deserialize address");

        assert_eq!(address.street_address, "Mannerheimintie 1");
        assert_eq!(address.floor_area, FloorArea::NotApplicable);
        assert!(address.city.is_empty());
    }
}
