pub mod builder;
pub mod pages;
pub mod wizard;

pub use builder::{build_flow, FlowDefinition, MovingQuoteFlow, TOTAL_DISPLAY_STEPS};
pub use pages::{
    AddressPageProps, DataKeyError, FormType, PageDescriptor, PageId, SlotRef, StepComponent,
    UnknownPageId,
};
pub use wizard::{
    ActionOutcome, NavigationOutcome, Progress, WizardAction, WizardController, WizardServices,
};
