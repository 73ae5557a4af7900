use std::collections::BTreeMap;

use clap::ValueEnum;
use movequote_core::catalog::{ItemCatalog, Service, ServiceCatalog};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CatalogKind {
    Items,
    Services,
}

#[derive(Debug, Serialize)]
struct ServiceListing<'a> {
    included: Vec<&'a Service>,
    optional: BTreeMap<&'a str, Vec<&'a Service>>,
}

pub fn run(kind: CatalogKind) -> CommandResult {
    match kind {
        CatalogKind::Items => {
            let catalog = ItemCatalog::standard();
            let item_count: usize =
                catalog.categories().iter().map(|category| category.items.len()).sum();
            CommandResult::success_with_data(
                "catalog",
                format!("{item_count} items in {} categories", catalog.categories().len()),
                &catalog.categories(),
            )
        }
        CatalogKind::Services => {
            let catalog = ServiceCatalog::standard();
            let listing = ServiceListing {
                included: catalog.included().collect(),
                optional: catalog.optional_by_category(),
            };
            CommandResult::success_with_data(
                "catalog",
                format!(
                    "{} services ({} included)",
                    catalog.services().len(),
                    listing.included.len()
                ),
                &listing,
            )
        }
    }
}
