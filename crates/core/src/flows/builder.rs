use crate::domain::address::AddressKind;
use crate::flows::pages::{
    AddressPageProps, FormType, PageDescriptor, PageId, SlotRef, StepComponent,
};

pub const TOTAL_DISPLAY_STEPS: u8 = 7;

const ADDRESS_SUBTITLE: &str =
    "Update your delivery location information to ensure accurate moving estimates";

pub trait FlowDefinition {
    fn build(&self, pickup_count: usize, dropoff_count: usize) -> Vec<PageDescriptor>;

    fn total_display_steps(&self) -> u8 {
        TOTAL_DISPLAY_STEPS
    }
}

#[derive(Clone, Debug, Default)]
pub struct MovingQuoteFlow;

impl FlowDefinition for MovingQuoteFlow {
    fn build(&self, pickup_count: usize, dropoff_count: usize) -> Vec<PageDescriptor> {
        build_flow(pickup_count, dropoff_count)
    }
}

/// Ordered pages for the given address counts. Pickup pages always precede
/// drop-off pages, which precede the item pages; display steps depend on it.
pub fn build_flow(pickup_count: usize, dropoff_count: usize) -> Vec<PageDescriptor> {
    let mut flow = Vec::with_capacity(pickup_count + dropoff_count + 8);

    flow.push(PageDescriptor {
        id: PageId::CustomerType,
        display_step: 1,
        slot: SlotRef::CustomerType,
        component: StepComponent::CustomerType,
        props: None,
        form_type: FormType::SingleSelection,
        requires_selection: true,
    });

    flow.extend((0..pickup_count).map(|index| address_page(AddressKind::Pickup, index)));
    flow.extend((0..dropoff_count).map(|index| address_page(AddressKind::Dropoff, index)));

    flow.extend([
        fixed_page(PageId::QuoteType, 4, SlotRef::Inventory, StepComponent::QuoteType),
        fixed_page(PageId::Inventory, 4, SlotRef::Inventory, StepComponent::Inventory),
        fixed_page(PageId::FragileItems, 4, SlotRef::Inventory, StepComponent::FragileItems),
        fixed_page(PageId::HeavyItems, 4, SlotRef::Inventory, StepComponent::HeavyItems),
        fixed_page(PageId::MovingDate, 5, SlotRef::Schedule, StepComponent::MovingDateTime),
        fixed_page(PageId::AdditionalServices, 6, SlotRef::Services, StepComponent::Services),
        fixed_page(PageId::ContactDetails, 7, SlotRef::Contact, StepComponent::ContactDetails),
    ]);

    flow
}

fn fixed_page(
    id: PageId,
    display_step: u8,
    slot: SlotRef,
    component: StepComponent,
) -> PageDescriptor {
    let form_type = match component {
        StepComponent::QuoteType => FormType::SingleSelection,
        StepComponent::ContactDetails => FormType::Final,
        _ => FormType::MultiStep,
    };

    PageDescriptor {
        id,
        display_step,
        slot,
        component,
        props: None,
        form_type,
        requires_selection: form_type == FormType::SingleSelection,
    }
}

fn address_page(kind: AddressKind, index: usize) -> PageDescriptor {
    let (id, display_step, first_title, next_title) = match kind {
        AddressKind::Pickup => (
            PageId::PickupAddress(index),
            2,
            "Add pickup address",
            "Add another pickup address",
        ),
        AddressKind::Dropoff => (
            PageId::DropoffAddress(index),
            3,
            "Add drop-off address",
            "Add another drop-off address",
        ),
    };

    PageDescriptor {
        id,
        display_step,
        slot: SlotRef::address(kind, index),
        component: StepComponent::AddressDetails,
        props: Some(AddressPageProps {
            title: if index == 0 { first_title } else { next_title }.to_owned(),
            subtitle: ADDRESS_SUBTITLE.to_owned(),
            address_type: kind,
            show_add_another: true,
        }),
        form_type: FormType::MultiStep,
        requires_selection: false,
    }
}
