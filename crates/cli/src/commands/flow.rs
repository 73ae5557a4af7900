use movequote_core::flows::{build_flow, PageDescriptor};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct FlowPage<'a> {
    index: usize,
    #[serde(flatten)]
    page: &'a PageDescriptor,
    title: String,
}

pub fn run(pickups: usize, dropoffs: usize) -> CommandResult {
    if pickups == 0 || dropoffs == 0 {
        return CommandResult::failure(
            "flow",
            "invalid_arguments",
            "--pickups and --dropoffs must both be at least 1",
            2,
        );
    }

    let flow = build_flow(pickups, dropoffs);
    let pages: Vec<FlowPage<'_>> = flow
        .iter()
        .enumerate()
        .map(|(index, page)| FlowPage {
            index,
            page,
            title: page.component.step().heading(page).0,
        })
        .collect();

    CommandResult::success_with_data(
        "flow",
        format!("{} pages for {pickups} pickup and {dropoffs} drop-off address(es)", pages.len()),
        &pages,
    )
}
