//! One [`Step`] per page component. A step turns the resolved slot into a
//! [`StepView`] and decides whether the page may be left forward.

use serde::Serialize;

use crate::domain::address::AddressKind;
use crate::domain::contact::Contact;
use crate::flows::pages::{PageDescriptor, PageId, StepComponent};
use crate::resolver::{SlotValue, SlotView};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const CUSTOMER_TYPE_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption {
        value: "private",
        label: "Private Customer",
        description: "Moving your personal belongings or household items to a new residence.",
    },
    ChoiceOption {
        value: "corporate",
        label: "Corporate Customer",
        description: "Relocating office equipment, furniture, or business assets for your company.",
    },
];

pub const QUOTE_TYPE_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption {
        value: "detailed",
        label: "Detailed item list",
        description: "Pick every item from the catalog for the most accurate estimate.",
    },
    ChoiceOption {
        value: "quick",
        label: "Quick estimate",
        description: "Describe the move briefly and refine the details later.",
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryAction {
    Next,
    /// Single-selection pages that move on as soon as a choice is made.
    SelectToContinue,
    Submit,
}

impl PrimaryAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Next | Self::SelectToContinue => "Next",
            Self::Submit => "Submit Quote Request",
        }
    }
}

/// Everything a front end needs to draw the current page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub page_id: PageId,
    pub component: StepComponent,
    pub display_step: u8,
    pub title: String,
    pub subtitle: String,
    pub data: SlotValue,
    pub options: &'static [ChoiceOption],
    pub missing_fields: Vec<&'static str>,
    pub can_advance: bool,
    pub show_previous: bool,
    pub add_another: Option<AddressKind>,
    pub primary_action: PrimaryAction,
}

pub trait Step: Send + Sync {
    fn component(&self) -> StepComponent;

    fn heading(&self, page: &PageDescriptor) -> (String, String);

    /// Required fields that are still empty. An empty list unlocks "Next".
    fn missing_fields(&self, _data: SlotView<'_>) -> Vec<&'static str> {
        Vec::new()
    }

    fn options(&self) -> &'static [ChoiceOption] {
        &[]
    }

    fn primary_action(&self) -> PrimaryAction {
        PrimaryAction::Next
    }

    fn render(&self, page: &PageDescriptor, data: SlotView<'_>, show_previous: bool) -> StepView {
        let (title, subtitle) = self.heading(page);
        let missing_fields = self.missing_fields(data);
        let add_another = page
            .props
            .as_ref()
            .filter(|props| props.show_add_another)
            .map(|props| props.address_type);

        StepView {
            page_id: page.id,
            component: self.component(),
            display_step: page.display_step,
            title,
            subtitle,
            data: data.to_value(),
            options: self.options(),
            can_advance: missing_fields.is_empty(),
            missing_fields,
            show_previous,
            add_another,
            primary_action: self.primary_action(),
        }
    }
}

fn fixed_heading(title: &str, subtitle: &str) -> (String, String) {
    (title.to_owned(), subtitle.to_owned())
}

pub struct CustomerTypeStep;

impl Step for CustomerTypeStep {
    fn component(&self) -> StepComponent {
        StepComponent::CustomerType
    }

    fn heading(&self, _page: &PageDescriptor) -> (String, String) {
        fixed_heading(
            "Select Customer Type",
            "Fill in the details below to receive an instant, personalized quote for your move.",
        )
    }

    fn missing_fields(&self, data: SlotView<'_>) -> Vec<&'static str> {
        match data {
            SlotView::CustomerType(selection) if selection.customer_type.trim().is_empty() => {
                vec!["customerType"]
            }
            _ => Vec::new(),
        }
    }

    fn options(&self) -> &'static [ChoiceOption] {
        CUSTOMER_TYPE_OPTIONS
    }

    fn primary_action(&self) -> PrimaryAction {
        PrimaryAction::SelectToContinue
    }
}

pub struct AddressDetailsStep;

impl Step for AddressDetailsStep {
    fn component(&self) -> StepComponent {
        StepComponent::AddressDetails
    }

    fn heading(&self, page: &PageDescriptor) -> (String, String) {
        page.props
            .as_ref()
            .map(|props| (props.title.clone(), props.subtitle.clone()))
            .unwrap_or_default()
    }
}

pub struct QuoteTypeStep;

impl Step for QuoteTypeStep {
    fn component(&self) -> StepComponent {
        StepComponent::QuoteType
    }

    fn heading(&self, _page: &PageDescriptor) -> (String, String) {
        fixed_heading(
            "How precisely do you want to provide item details?",
            "We use this information to estimate the time and recommend the most cost-efficient crew.",
        )
    }

    fn missing_fields(&self, data: SlotView<'_>) -> Vec<&'static str> {
        match data {
            SlotView::Inventory(inventory) if inventory.quote_type.trim().is_empty() => {
                vec!["quoteType"]
            }
            _ => Vec::new(),
        }
    }

    fn options(&self) -> &'static [ChoiceOption] {
        QUOTE_TYPE_OPTIONS
    }

    fn primary_action(&self) -> PrimaryAction {
        PrimaryAction::SelectToContinue
    }
}

pub struct InventoryStep;

impl Step for InventoryStep {
    fn component(&self) -> StepComponent {
        StepComponent::Inventory
    }

    fn heading(&self, _page: &PageDescriptor) -> (String, String) {
        fixed_heading(
            "What needs to be moved?",
            "Select items to calculate total volume and plan your move efficiently",
        )
    }
}

pub struct FragileItemsStep;

impl Step for FragileItemsStep {
    fn component(&self) -> StepComponent {
        StepComponent::FragileItems
    }

    fn heading(&self, _page: &PageDescriptor) -> (String, String) {
        fixed_heading(
            "Fragile Items",
            "Select items that require extra care and protection during the move",
        )
    }
}

pub struct HeavyItemsStep;

impl Step for HeavyItemsStep {
    fn component(&self) -> StepComponent {
        StepComponent::HeavyItems
    }

    fn heading(&self, _page: &PageDescriptor) -> (String, String) {
        fixed_heading(
            "Heavy Items (+100kg)",
            "Select items that weigh over 100kg and require special handling",
        )
    }
}

pub struct MovingDateTimeStep;

impl Step for MovingDateTimeStep {
    fn component(&self) -> StepComponent {
        StepComponent::MovingDateTime
    }

    fn heading(&self, _page: &PageDescriptor) -> (String, String) {
        fixed_heading(
            "Moving Date Details",
            "Please provide your preferred moving date and time to help us schedule your move efficiently",
        )
    }
}

pub struct ServicesStep;

impl Step for ServicesStep {
    fn component(&self) -> StepComponent {
        StepComponent::Services
    }

    fn heading(&self, _page: &PageDescriptor) -> (String, String) {
        fixed_heading(
            "Choose Additional Services",
            "Select any additional services you'd like to include with your move",
        )
    }
}

pub struct ContactDetailsStep;

impl Step for ContactDetailsStep {
    fn component(&self) -> StepComponent {
        StepComponent::ContactDetails
    }

    fn heading(&self, _page: &PageDescriptor) -> (String, String) {
        fixed_heading(
            "Add your Contact Information",
            "Please provide your contact details to receive your moving estimate",
        )
    }

    fn missing_fields(&self, data: SlotView<'_>) -> Vec<&'static str> {
        match data {
            SlotView::Contact(contact) => missing_contact_fields(contact),
            _ => Vec::new(),
        }
    }

    fn primary_action(&self) -> PrimaryAction {
        PrimaryAction::Submit
    }
}

fn missing_contact_fields(contact: &Contact) -> Vec<&'static str> {
    let mut required = vec![
        ("firstName", contact.first_name.as_str()),
        ("lastName", contact.last_name.as_str()),
        ("phone", contact.phone.as_str()),
        ("email", contact.email.as_str()),
    ];
    if contact.different_contact {
        required.extend([
            ("contactFirstName", contact.contact_first_name.as_str()),
            ("contactLastName", contact.contact_last_name.as_str()),
            ("contactPhone", contact.contact_phone.as_str()),
        ]);
    }

    let mut missing: Vec<&'static str> = required
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();
    if !contact.agree_privacy {
        missing.push("agreePrivacy");
    }
    missing
}

impl StepComponent {
    pub fn step(&self) -> &'static dyn Step {
        match self {
            Self::CustomerType => &CustomerTypeStep,
            Self::AddressDetails => &AddressDetailsStep,
            Self::QuoteType => &QuoteTypeStep,
            Self::Inventory => &InventoryStep,
            Self::FragileItems => &FragileItemsStep,
            Self::HeavyItems => &HeavyItemsStep,
            Self::MovingDateTime => &MovingDateTimeStep,
            Self::Services => &ServicesStep,
            Self::ContactDetails => &ContactDetailsStep,
        }
    }
}
