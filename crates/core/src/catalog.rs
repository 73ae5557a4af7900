use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::inventory::ItemId;

/// Volume assumed for a custom item entered without dimensions.
pub const DEFAULT_CUSTOM_ITEM_VOLUME: Decimal = Decimal::from_parts(3, 0, 0, false, 1);

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub String);

impl ServiceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    /// Cubic meters.
    pub volume: Decimal,
    pub icon: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCategory {
    pub name: String,
    pub items: Vec<CatalogItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub name: String,
    pub count: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ItemCatalog {
    categories: Vec<ItemCategory>,
}

impl ItemCatalog {
    pub fn new(categories: Vec<ItemCategory>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[ItemCategory] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&ItemCategory> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn find(&self, item_id: &ItemId) -> Option<&CatalogItem> {
        self.categories
            .iter()
            .flat_map(|category| category.items.iter())
            .find(|item| &item.id == item_id)
    }

    /// Sum of `count × volume`; ids missing from the catalog contribute nothing.
    pub fn total_volume(&self, selections: &BTreeMap<ItemId, u32>) -> Decimal {
        selections
            .iter()
            .filter_map(|(item_id, count)| {
                self.find(item_id).map(|item| item.volume * Decimal::from(*count))
            })
            .sum()
    }

    pub fn selected_items(&self, selections: &BTreeMap<ItemId, u32>) -> Vec<SelectedItem> {
        selections
            .iter()
            .filter(|(_, count)| **count > 0)
            .filter_map(|(item_id, count)| {
                self.find(item_id).map(|item| SelectedItem { name: item.name.clone(), count: *count })
            })
            .collect()
    }

    pub fn standard() -> Self {
        let category = |name: &str, items: &[(&str, &str, &str, i64, &str)]| ItemCategory {
            name: name.to_owned(),
            items: items
                .iter()
                .map(|(id, name, description, centi_m3, icon)| CatalogItem {
                    id: ItemId::new(*id),
                    name: (*name).to_owned(),
                    description: (*description).to_owned(),
                    volume: Decimal::new(*centi_m3, 2),
                    icon: (*icon).to_owned(),
                })
                .collect(),
        };

        Self::new(vec![
            category(
                "Small Items",
                &[
                    ("moving-box", "Moving Box", "60L capacity", 8, "package"),
                    ("trash-bag", "Trash Bag", "100L", 5, "trash"),
                    ("big-suitcase", "Big Suitcase", "Checked luggage", 15, "briefcase"),
                    ("small-suitcase", "Small Suitcase", "Carry-on", 8, "briefcase"),
                ],
            ),
            category(
                "Items to Sit On",
                &[
                    ("bench", "Bench", "For 2-3 people", 80, "armchair"),
                    ("chair", "Chair", "Dining or desk", 40, "armchair"),
                    ("office-chair", "Office Chair", "Swivel with armrests", 60, "circle-dot"),
                    ("lounger", "Lounger", "Armchair", 180, "armchair"),
                    ("bean-bag", "Bean Bag", "Comfortable seating", 50, "circle-dot"),
                    ("sofa-2", "2-Seater Sofa", "Loveseat", 200, "armchair"),
                    ("sofa-3", "3-Seater Sofa", "Standard sofa", 280, "armchair"),
                    ("divan-sofa", "Divan Sofa", "Sectional", 350, "armchair"),
                ],
            ),
            category(
                "Beds",
                &[
                    ("single-bed", "Single Bed", "90x200 cm", 150, "bed"),
                    ("double-bed", "Double Bed", "140x200 cm", 200, "bed"),
                    ("queen-bed", "Queen Bed", "160x200 cm", 250, "bed"),
                    ("king-bed", "King Size Bed", "180x200 cm", 300, "bed"),
                ],
            ),
            category(
                "Tables",
                &[
                    ("coffee-table", "Coffee Table", "Living room", 60, "table"),
                    ("dining-table", "Dining Table", "For 4-6 people", 120, "table"),
                    ("desk", "Desk", "Work or study", 80, "monitor"),
                    ("side-table", "Side Table", "Nightstand", 30, "table"),
                ],
            ),
            category(
                "Storage",
                &[
                    ("bookshelf", "Bookshelf", "5-6 shelves", 150, "book-open"),
                    ("wardrobe-small", "Wardrobe Small", "2 doors", 200, "shirt"),
                    ("wardrobe-large", "Wardrobe Large", "3+ doors", 350, "shirt"),
                    ("chest-drawers", "Chest of Drawers", "4-5 drawers", 100, "grid"),
                    ("tv-stand", "TV Stand", "Media console", 70, "tv"),
                ],
            ),
            category(
                "Outdoor",
                &[
                    ("bicycle", "Bicycle", "Standard bike", 50, "bike"),
                    ("garden-furniture", "Garden Furniture", "Set of 4", 200, "flower"),
                    ("bbq-grill", "BBQ Grill", "Outdoor grill", 80, "flame"),
                ],
            ),
            category(
                "Lighting",
                &[
                    ("floor-lamp", "Floor Lamp", "Standing lamp", 30, "lamp"),
                    ("table-lamp", "Table Lamp", "Desk lamp", 10, "lightbulb"),
                    ("chandelier", "Chandelier", "Ceiling fixture", 40, "layers"),
                ],
            ),
        ])
    }
}

/// Volume in m³ of a box measured in centimeters. Falls back to
/// [`DEFAULT_CUSTOM_ITEM_VOLUME`] when any side is missing or not a positive
/// number.
pub fn custom_item_volume(length_cm: &str, width_cm: &str, height_cm: &str) -> Decimal {
    let parse = |value: &str| {
        value.trim().parse::<Decimal>().ok().filter(|parsed| *parsed > Decimal::ZERO)
    };
    match (parse(length_cm), parse(width_cm), parse(height_cm)) {
        (Some(length), Some(width), Some(height)) => {
            length * width * height / Decimal::from(1_000_000)
        }
        _ => DEFAULT_CUSTOM_ITEM_VOLUME,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub included: bool,
    pub price: Option<String>,
    pub price_subtext: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn find(&self, service_id: &ServiceId) -> Option<&Service> {
        self.services.iter().find(|service| &service.id == service_id)
    }

    pub fn included(&self) -> impl Iterator<Item = &Service> {
        self.services.iter().filter(|service| service.included)
    }

    /// Optional services grouped by category, each group in catalog order.
    pub fn optional_by_category(&self) -> BTreeMap<&str, Vec<&Service>> {
        let mut grouped: BTreeMap<&str, Vec<&Service>> = BTreeMap::new();
        for service in self.services.iter().filter(|service| !service.included) {
            grouped.entry(service.category.as_str()).or_default().push(service);
        }
        grouped
    }

    pub fn standard() -> Self {
        let service = |id: &str, name: &str, description: &str, category: &str| Service {
            id: ServiceId::new(id),
            name: name.to_owned(),
            description: description.to_owned(),
            category: category.to_owned(),
            included: category == "included",
            price: None,
            price_subtext: None,
        };

        Self::new(vec![
            service(
                "furniture-protection",
                "Standard Protection of Furniture",
                "Basic protection for your furniture during transport",
                "included",
            ),
            service(
                "washing-machine",
                "Disconnecting Washing Machine",
                "Professional disconnection of your washing machine",
                "included",
            ),
            service(
                "moving-boxes",
                "Moving Boxes",
                "High-quality moving boxes in various sizes",
                "supplies",
            ),
            service(
                "packing-materials",
                "Packaging Materials",
                "Bubble wrap, packing tape, and paper",
                "supplies",
            ),
            service(
                "washing-installation",
                "Washing Machine Installation",
                "Professional installation at your new home",
                "bathroom",
            ),
            Service {
                price: Some("+25€".to_owned()),
                price_subtext: Some("during move".to_owned()),
                ..service(
                    "water-outlets",
                    "Plugging Bathroom Water Outlets",
                    "Connect water outlets for washing machine",
                    "bathroom",
                )
            },
            service(
                "furniture-assembly",
                "Removal and Assembly of Furniture",
                "Disassemble and reassemble furniture",
                "other",
            ),
            service(
                "lamp-installation",
                "Removal and Installation of Lamps",
                "Professional lamp and lighting installation",
                "other",
            ),
            service(
                "wall-installations",
                "Wall Installations",
                "Mount TVs, shelves, and wall fixtures",
                "other",
            ),
            service(
                "item-protection",
                "Thorough Item Protection",
                "For extremely fragile or valuable items",
                "protection",
            ),
            service(
                "floor-protection",
                "Floor Protection",
                "Protective covering for floors during move",
                "protection",
            ),
            service(
                "elevator-protection",
                "Elevator Protection",
                "Mostly for small, expensive elevators",
                "protection",
            ),
            service(
                "wall-protection",
                "Wall Protection",
                "Recommended for tight stairways inside apartment",
                "protection",
            ),
            service(
                "packing-service",
                "Packaging Service",
                "Professional packing of your belongings",
                "additional",
            ),
            service(
                "cleaning",
                "Move-Out Cleaning",
                "Professional cleaning of your old home",
                "additional",
            ),
            service(
                "recycling",
                "Recycling Service",
                "Get rid of old furniture at the same time",
                "additional",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal::Decimal;

    use crate::domain::inventory::ItemId;

    use super::{
        custom_item_volume, ItemCatalog, ServiceCatalog, ServiceId, DEFAULT_CUSTOM_ITEM_VOLUME,
    };

    #[test]
    fn finds_items_across_categories() {
        let catalog = ItemCatalog::standard();
        let item = catalog.find(&ItemId::new("king-bed")).expect("king bed");
        assert_eq!(item.name, "King Size Bed");
        assert_eq!(item.volume, Decimal::new(300, 2));
        assert!(catalog.find(&ItemId::new("spaceship")).is_none());
        assert_eq!(catalog.categories().len(), 7);
    }

    #[test]
    fn total_volume_ignores_unknown_ids() {
        let catalog = ItemCatalog::standard();
        let selections = BTreeMap::from([
            (ItemId::new("moving-box"), 10),
            (ItemId::new("sofa-3"), 1),
            (ItemId::new("unknown"), 5),
        ]);

        assert_eq!(catalog.total_volume(&selections), Decimal::new(360, 2));
        let selected = catalog.selected_items(&selections);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].name, "Moving Box");
        assert_eq!(selected[0].count, 10);
    }

    #[test]
    fn custom_volume_converts_cubic_centimeters() {
        assert_eq!(custom_item_volume("100", "50", "200"), Decimal::ONE);
        assert_eq!(custom_item_volume(" 40 ", "30", "25"), Decimal::new(3, 2));
    }

    #[test]
    fn custom_volume_defaults_when_a_side_is_unusable() {
        assert_eq!(custom_item_volume("100", "", "200"), DEFAULT_CUSTOM_ITEM_VOLUME);
        assert_eq!(custom_item_volume("100", "-5", "200"), Decimal::new(3, 1));
        assert_eq!(custom_item_volume("wide", "50", "200"), DEFAULT_CUSTOM_ITEM_VOLUME);
    }

    #[test]
    fn services_split_into_included_and_optional_groups() {
        let catalog = ServiceCatalog::standard();
        let included: Vec<&str> = catalog.included().map(|service| service.id.as_str()).collect();
        assert_eq!(included, vec!["furniture-protection", "washing-machine"]);

        let optional = catalog.optional_by_category();
        assert!(!optional.contains_key("included"));
        assert_eq!(optional["protection"].len(), 4);

        let outlets = catalog.find(&ServiceId::new("water-outlets")).expect("water outlets");
        assert_eq!(outlets.price.as_deref(), Some("+25€"));
    }
}
