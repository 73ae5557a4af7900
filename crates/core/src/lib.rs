pub mod audit;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod resolver;
pub mod steps;
pub mod submission;

pub use audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink, SessionId};
pub use calendar::{
    Availability, DatePicker, DateStatus, DateStatusProvider, MonthGrid, MovingDatePolicy,
};
pub use catalog::{ItemCatalog, ServiceCatalog, ServiceId};
pub use domain::{AddressKind, AddressRecord, FloorArea, FormData};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use flows::{
    build_flow, FlowDefinition, MovingQuoteFlow, NavigationOutcome, PageDescriptor, PageId,
    SlotRef, WizardAction, WizardController,
};
pub use resolver::{apply, resolve, SlotValue, SlotView};
pub use steps::{Step, StepView};
pub use submission::{
    InMemoryQuoteSubmitter, JsonFileSubmitter, QuoteRequest, QuoteSubmitter, SubmissionReceipt,
};
