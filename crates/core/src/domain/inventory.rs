use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ItemCatalog;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A fragile or heavy item declared by the customer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialItem {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: SpecialItemKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub additional_details: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpecialItemKind {
    #[serde(rename_all = "camelCase")]
    Predefined { source_item_id: ItemId },
    #[serde(rename_all = "camelCase")]
    Custom {
        #[serde(default)]
        length: String,
        #[serde(default)]
        width: String,
        #[serde(default)]
        height: String,
        #[serde(default)]
        already_included: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomItemInput {
    pub name: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub already_included: bool,
    pub additional_details: String,
}

impl SpecialItem {
    pub fn source_item_id(&self) -> Option<&ItemId> {
        match &self.kind {
            SpecialItemKind::Predefined { source_item_id } => Some(source_item_id),
            SpecialItemKind::Custom { .. } => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.kind, SpecialItemKind::Custom { .. })
    }
}

/// Appends one predefined entry per selected unit, in catalog order of the
/// selection map. Unknown item ids are skipped.
pub fn add_from_inventory(
    items: &mut Vec<SpecialItem>,
    selections: &BTreeMap<ItemId, u32>,
    catalog: &ItemCatalog,
) -> usize {
    let mut added = 0;
    for (item_id, count) in selections {
        let Some(catalog_item) = catalog.find(item_id) else {
            continue;
        };
        for _ in 0..*count {
            items.push(SpecialItem {
                id: format!("inventory-{}-{}", item_id.as_str(), Uuid::new_v4().simple()),
                name: catalog_item.name.clone(),
                kind: SpecialItemKind::Predefined { source_item_id: item_id.clone() },
                additional_details: String::new(),
            });
            added += 1;
        }
    }
    added
}

pub fn add_custom(
    items: &mut Vec<SpecialItem>,
    input: CustomItemInput,
) -> Result<&SpecialItem, DomainError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(DomainError::InvariantViolation("custom item name is required".to_owned()));
    }

    items.push(SpecialItem {
        id: format!("custom-{}", Uuid::new_v4().simple()),
        name: name.to_owned(),
        kind: SpecialItemKind::Custom {
            length: input.length,
            width: input.width,
            height: input.height,
            already_included: input.already_included,
        },
        additional_details: input.additional_details.trim().to_owned(),
    });

    Ok(&items[items.len() - 1])
}

pub fn remove_item(items: &mut Vec<SpecialItem>, item_id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id != item_id);
    items.len() != before
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Inventory {
    pub quote_type: String,
    pub items: BTreeMap<ItemId, u32>,
    pub additional_notes: String,
    pub fragile_items: Vec<SpecialItem>,
    pub fragile_items_details: String,
    pub heavy_items: Vec<SpecialItem>,
    pub heavy_items_details: String,
}

impl Inventory {
    /// A count of zero drops the entry.
    pub fn set_item_count(&mut self, item_id: ItemId, count: u32) {
        if count == 0 {
            self.items.remove(&item_id);
        } else {
            self.items.insert(item_id, count);
        }
    }

    pub fn increment(&mut self, item_id: ItemId) -> u32 {
        let count = self.items.entry(item_id).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn decrement(&mut self, item_id: &ItemId) -> u32 {
        match self.items.get_mut(item_id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                *count
            }
            Some(_) => {
                self.items.remove(item_id);
                0
            }
            None => 0,
        }
    }

    pub fn selected_item_count(&self) -> u32 {
        self.items.values().fold(0u32, |total, count| total.saturating_add(*count))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use crate::catalog::ItemCatalog;

    use super::{
        add_custom, add_from_inventory, remove_item, CustomItemInput, Inventory, ItemId,
        SpecialItem, SpecialItemKind,
    };

    #[test]
    fn zero_count_removes_item() {
        let mut inventory = Inventory::default();
        inventory.set_item_count(ItemId::new("chair"), 4);
        inventory.set_item_count(ItemId::new("desk"), 1);
        inventory.set_item_count(ItemId::new("chair"), 0);

        assert_eq!(inventory.items.len(), 1);
        assert_eq!(inventory.selected_item_count(), 1);
    }

    #[test]
    fn increment_saturates_at_the_counter_limit() {
        let mut inventory = Inventory::default();
        inventory.set_item_count(ItemId::new("moving-box"), u32::MAX);
        inventory.set_item_count(ItemId::new("chair"), 2);

        assert_eq!(inventory.increment(ItemId::new("moving-box")), u32::MAX);
        assert_eq!(inventory.selected_item_count(), u32::MAX);
    }

    #[test]
    fn decrement_at_one_drops_entry() {
        let mut inventory = Inventory::default();
        inventory.increment(ItemId::new("bicycle"));
        inventory.increment(ItemId::new("bicycle"));

        assert_eq!(inventory.decrement(&ItemId::new("bicycle")), 1);
        assert_eq!(inventory.decrement(&ItemId::new("bicycle")), 0);
        assert!(inventory.items.is_empty());
        assert_eq!(inventory.decrement(&ItemId::new("bicycle")), 0);
    }

    #[test]
    fn inventory_selection_expands_per_unit_with_unique_ids() {
        let catalog = ItemCatalog::standard();
        let mut items = Vec::new();
        let selections = BTreeMap::from([
            (ItemId::new("chandelier"), 2),
            (ItemId::new("not-in-catalog"), 3),
        ]);

        let added = add_from_inventory(&mut items, &selections, &catalog);

        assert_eq!(added, 2);
        assert_eq!(items[0].name, "Chandelier");
        assert_eq!(items[0].source_item_id(), Some(&ItemId::new("chandelier")));
        assert_ne!(items[0].id, items[1].id);
    }

    #[test]
    fn custom_item_requires_a_name() {
        let mut items = Vec::new();
        let error = add_custom(
            &mut items,
            CustomItemInput { name: "   ".to_owned(), ..CustomItemInput::default() },
        )
        .expect_err("blank name must be rejected");

        assert!(matches!(error, crate::errors::DomainError::InvariantViolation(_)));
        assert!(items.is_empty());
    }

    #[test]
    fn custom_item_is_trimmed_and_removable() {
        let mut items = Vec::new();
        let id = add_custom(
            &mut items,
            CustomItemInput {
                name: "  Aquarium ".to_owned(),
                length: "120".to_owned(),
                already_included: true,
                ..CustomItemInput::default()
            },
        )
        .expect("custom item")
        .id
        .clone();

        assert_eq!(items[0].name, "Aquarium");
        assert!(items[0].is_custom());
        assert!(remove_item(&mut items, &id));
        assert!(!remove_item(&mut items, &id));
    }

    #[test]
    fn special_item_wire_format_uses_type_tag() {
        let item = SpecialItem {
            id: "custom-1".to_owned(),
            name: "Piano".to_owned(),
            kind: SpecialItemKind::Custom {
                length: "150".to_owned(),
                width: "60".to_owned(),
                height: "110".to_owned(),
                already_included: false,
            },
            additional_details: String::new(),
        };

        let value = serde_json::to_value(&item).expect("serialize");
        assert_eq!(value["type"], "custom");
        assert_eq!(value["alreadyIncluded"], false);
        assert!(value.get("additionalDetails").is_none());

        let predefined: SpecialItem = serde_json::from_value(json!({
            "id": "inventory-bookshelf-1",
            "name": "Bookshelf",
            "type": "predefined",
            "sourceItemId": "bookshelf"
        }))
        .expect("deserialize predefined");
        assert_eq!(predefined.source_item_id(), Some(&ItemId::new("bookshelf")));
    }
}
