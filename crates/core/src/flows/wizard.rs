use serde::{Deserialize, Serialize};

use crate::audit::{AuditCategory, AuditContext, AuditOutcome, AuditSink, SessionId};
use crate::calendar::{self, DateStatusProvider};
use crate::catalog::ServiceId;
use crate::domain::{AddressKind, CustomerTypeSelection, FormData};
use crate::errors::{ApplicationError, DomainError};
use crate::flows::builder::{build_flow, FlowDefinition, MovingQuoteFlow};
use crate::flows::pages::{PageDescriptor, PageId, SlotRef, StepComponent};
use crate::resolver::{self, ResolverError, SlotValue, SlotView};
use crate::steps::StepView;
use crate::submission::{QuoteRequest, QuoteSubmitter, SubmissionReceipt};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavigationOutcome {
    Moved { from: PageId, to: PageId },
    /// The page's required fields are still empty.
    Blocked { page: PageId, missing_fields: Vec<&'static str> },
    AtBoundary { page: PageId },
}

impl NavigationOutcome {
    pub fn page(&self) -> PageId {
        match self {
            Self::Moved { to, .. } => *to,
            Self::Blocked { page, .. } | Self::AtBoundary { page } => *page,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current_step: u8,
    pub total_steps: u8,
}

/// One user interaction, as recorded in replay scripts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WizardAction {
    Update { value: SlotValue },
    SelectCustomerType { customer_type: String },
    ChooseQuoteType { quote_type: String },
    PickMovingDate { date: String },
    ToggleService { service_id: ServiceId },
    Next,
    Previous,
    AddAnother,
    AddPickupAddress,
    AddDropoffAddress,
    Submit,
}

impl WizardAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Update { .. } => "update",
            Self::SelectCustomerType { .. } => "select_customer_type",
            Self::ChooseQuoteType { .. } => "choose_quote_type",
            Self::PickMovingDate { .. } => "pick_moving_date",
            Self::ToggleService { .. } => "toggle_service",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::AddAnother => "add_another",
            Self::AddPickupAddress => "add_pickup_address",
            Self::AddDropoffAddress => "add_dropoff_address",
            Self::Submit => "submit",
        }
    }

    fn category(&self) -> AuditCategory {
        match self {
            Self::Update { .. }
            | Self::SelectCustomerType { .. }
            | Self::PickMovingDate { .. }
            | Self::ToggleService { .. } => AuditCategory::FormData,
            Self::Submit => AuditCategory::Submission,
            _ => AuditCategory::Navigation,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Updated { page: PageId },
    Navigation(NavigationOutcome),
    Submitted(SubmissionReceipt),
}

/// Collaborators an action may need: the date rules for the calendar and
/// the submission boundary for the final page.
#[derive(Clone, Copy)]
pub struct WizardServices<'a> {
    pub dates: &'a dyn DateStatusProvider,
    pub submitter: &'a dyn QuoteSubmitter,
}

/// Drives one session through the flow. The current position is held as a
/// [`PageId`] and re-resolved against every rebuilt flow.
pub struct WizardController<F = MovingQuoteFlow> {
    definition: F,
    session_id: SessionId,
    form: FormData,
    flow: Vec<PageDescriptor>,
    current: PageId,
}

impl<F> WizardController<F>
where
    F: FlowDefinition,
{
    pub fn new(definition: F) -> Self {
        Self::with_form_data(definition, FormData::new())
    }

    /// Resumes from a previously collected form, starting on the first page.
    pub fn with_form_data(definition: F, mut form: FormData) -> Self {
        form.normalize();
        let flow = build_pages(&definition, &form);
        let current = flow.first().map(|page| page.id).unwrap_or(PageId::CustomerType);
        Self { definition, session_id: SessionId::generate(), form, flow, current }
    }

    pub fn with_session_id(mut self, session_id: SessionId) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn flow(&self) -> &[PageDescriptor] {
        &self.flow
    }

    pub fn form_data(&self) -> &FormData {
        &self.form
    }

    pub fn into_form_data(self) -> FormData {
        self.form
    }

    pub fn current_index(&self) -> usize {
        self.flow.iter().position(|page| page.id == self.current).unwrap_or(0)
    }

    pub fn current_page(&self) -> &PageDescriptor {
        // `build_pages` never yields an empty flow.
        let index = self.current_index();
        &self.flow[index]
    }

    pub fn current_data(&self) -> Option<SlotView<'_>> {
        resolver::resolve(&self.form, self.current_page().slot)
    }

    /// Reads any slot by its data key, e.g. `pickupAddresses[1]`.
    pub fn data_at(&self, data_key: &str) -> Result<Option<SlotView<'_>>, DomainError> {
        let slot: SlotRef = data_key.parse()?;
        Ok(resolver::resolve(&self.form, slot))
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let page = self.current_page();
        self.current_data()
            .map(|data| page.component.step().missing_fields(data))
            .unwrap_or_default()
    }

    pub fn can_advance(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Hidden on the first page.
    pub fn progress(&self) -> Option<Progress> {
        if self.current_index() == 0 {
            return None;
        }
        Some(Progress {
            current_step: self.current_page().display_step,
            total_steps: self.definition.total_display_steps(),
        })
    }

    pub fn render(&self) -> Result<StepView, DomainError> {
        let page = self.current_page();
        let data = self.current_data().ok_or_else(|| self.out_of_range(page.slot))?;
        Ok(page.component.step().render(page, data, self.current_index() > 0))
    }

    /// Replaces the slice bound to the current page.
    pub fn update_current(&mut self, value: SlotValue) -> Result<(), DomainError> {
        let slot = self.current_page().slot;
        let kind = value.kind();
        resolver::apply(&mut self.form, slot, value)?;
        tracing::debug!(
            event_name = "wizard.slot_updated",
            session_id = %self.session_id,
            slot = %slot,
            value_kind = kind,
            "wizard slot updated"
        );
        Ok(())
    }

    pub fn next(&mut self) -> NavigationOutcome {
        let index = self.current_index();
        let from = self.current;
        let missing_fields = self.missing_fields();
        if !missing_fields.is_empty() {
            tracing::debug!(
                event_name = "wizard.next_blocked",
                session_id = %self.session_id,
                page = %from,
                missing = ?missing_fields,
                "wizard next blocked"
            );
            return NavigationOutcome::Blocked { page: from, missing_fields };
        }
        match self.flow.get(index + 1) {
            Some(page) => {
                let to = page.id;
                self.move_to(to);
                NavigationOutcome::Moved { from, to }
            }
            None => NavigationOutcome::AtBoundary { page: from },
        }
    }

    pub fn previous(&mut self) -> NavigationOutcome {
        let from = self.current;
        match self.current_index().checked_sub(1).and_then(|index| self.flow.get(index)) {
            Some(page) => {
                let to = page.id;
                self.move_to(to);
                NavigationOutcome::Moved { from, to }
            }
            None => NavigationOutcome::AtBoundary { page: from },
        }
    }

    pub fn add_pickup_address(&mut self) -> NavigationOutcome {
        self.add_address(AddressKind::Pickup)
    }

    pub fn add_dropoff_address(&mut self) -> NavigationOutcome {
        self.add_address(AddressKind::Dropoff)
    }

    /// The "add another" affordance of an address page.
    pub fn add_another(&mut self) -> Result<NavigationOutcome, DomainError> {
        let page = self.current_page();
        let kind = page
            .props
            .as_ref()
            .filter(|props| props.show_add_another)
            .map(|props| props.address_type)
            .ok_or_else(|| {
                DomainError::InvariantViolation(format!(
                    "page `{}` has no add-another action",
                    page.id
                ))
            })?;
        Ok(self.add_address(kind))
    }

    /// Customer type is a single selection that moves on as soon as it is made.
    pub fn select_customer_type(
        &mut self,
        customer_type: &str,
    ) -> Result<NavigationOutcome, DomainError> {
        self.expect_component(StepComponent::CustomerType, "a customer type")?;
        self.update_current(SlotValue::CustomerType(CustomerTypeSelection {
            customer_type: customer_type.to_owned(),
        }))?;
        Ok(self.next())
    }

    /// Quote type is a single selection that moves on as soon as it is made.
    pub fn choose_quote_type(&mut self, quote_type: &str) -> Result<NavigationOutcome, DomainError> {
        self.expect_component(StepComponent::QuoteType, "a quote type")?;
        let mut inventory = self.form.inventory.clone();
        inventory.quote_type = quote_type.to_owned();
        self.update_current(SlotValue::Inventory(inventory))?;
        Ok(self.next())
    }

    /// Writes the moving date if the date rules allow picking it.
    pub fn pick_moving_date<P>(&mut self, date: &str, dates: &P) -> Result<(), DomainError>
    where
        P: DateStatusProvider + ?Sized,
    {
        let picked = calendar::parse_iso_date(date)?;
        if !dates.date_status(date).is_selectable() {
            return Err(DomainError::DateNotSelectable(date.to_owned()));
        }
        let mut schedule = self.form.schedule.clone();
        schedule.moving_date = calendar::format_date_iso(picked);
        self.update_current(SlotValue::Schedule(schedule))
    }

    pub fn toggle_service(&mut self, service_id: ServiceId) -> Result<bool, DomainError> {
        let mut form = self.form.clone();
        let selected = form.toggle_service(service_id);
        self.update_current(SlotValue::Services(form.services_selected))?;
        Ok(selected)
    }

    /// Hands the whole form to `submitter`. Only the final page submits, and
    /// only once its required fields are filled.
    pub fn submit(
        &self,
        submitter: &dyn QuoteSubmitter,
    ) -> Result<SubmissionReceipt, ApplicationError> {
        let page = self.current_page();
        if !page.is_final() {
            return Err(DomainError::SubmissionNotAllowed { page: page.id }.into());
        }
        let missing_fields = self.missing_fields();
        if !missing_fields.is_empty() {
            return Err(DomainError::MissingRequiredFields {
                page: page.id,
                missing_fields: missing_fields.into_iter().map(str::to_owned).collect(),
            }
            .into());
        }

        let request = QuoteRequest::new(Some(self.session_id.clone()), self.form.clone());
        let receipt = submitter.submit(&request)?;
        tracing::info!(
            event_name = "wizard.submitted",
            session_id = %self.session_id,
            request_id = %receipt.request_id,
            destination = %receipt.destination,
            "quote request submitted"
        );
        Ok(receipt)
    }

    pub fn submit_with_audit<S>(
        &self,
        submitter: &dyn QuoteSubmitter,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<SubmissionReceipt, ApplicationError>
    where
        S: AuditSink,
    {
        let result = self.submit(submitter);
        match &result {
            Ok(receipt) => sink.emit(
                audit
                    .event("wizard.submitted", AuditCategory::Submission, AuditOutcome::Success)
                    .with_metadata("request_id", receipt.request_id.to_string())
                    .with_metadata("destination", receipt.destination.clone()),
            ),
            Err(error) => sink.emit(
                audit
                    .event("wizard.submit_failed", AuditCategory::Submission, outcome_of(error))
                    .with_metadata("error", error.to_string()),
            ),
        }
        result
    }

    pub fn handle(
        &mut self,
        action: WizardAction,
        services: WizardServices<'_>,
    ) -> Result<ActionOutcome, ApplicationError> {
        let page = self.current;
        let outcome = match action {
            WizardAction::Update { value } => {
                self.update_current(value)?;
                ActionOutcome::Updated { page }
            }
            WizardAction::SelectCustomerType { customer_type } => {
                ActionOutcome::Navigation(self.select_customer_type(&customer_type)?)
            }
            WizardAction::ChooseQuoteType { quote_type } => {
                ActionOutcome::Navigation(self.choose_quote_type(&quote_type)?)
            }
            WizardAction::PickMovingDate { date } => {
                self.pick_moving_date(&date, services.dates)?;
                ActionOutcome::Updated { page }
            }
            WizardAction::ToggleService { service_id } => {
                self.toggle_service(service_id)?;
                ActionOutcome::Updated { page }
            }
            WizardAction::Next => ActionOutcome::Navigation(self.next()),
            WizardAction::Previous => ActionOutcome::Navigation(self.previous()),
            WizardAction::AddAnother => ActionOutcome::Navigation(self.add_another()?),
            WizardAction::AddPickupAddress => ActionOutcome::Navigation(self.add_pickup_address()),
            WizardAction::AddDropoffAddress => {
                ActionOutcome::Navigation(self.add_dropoff_address())
            }
            WizardAction::Submit => ActionOutcome::Submitted(self.submit(services.submitter)?),
        };
        Ok(outcome)
    }

    pub fn handle_with_audit<S>(
        &mut self,
        action: WizardAction,
        services: WizardServices<'_>,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<ActionOutcome, ApplicationError>
    where
        S: AuditSink,
    {
        let name = action.name();
        let category = action.category();
        let from = self.current;
        let result = self.handle(action, services);
        match &result {
            Ok(outcome) => {
                let audit_outcome = match outcome {
                    ActionOutcome::Navigation(NavigationOutcome::Blocked { .. }) => {
                        AuditOutcome::Rejected
                    }
                    _ => AuditOutcome::Success,
                };
                sink.emit(
                    audit
                        .event(format!("wizard.{name}"), category, audit_outcome)
                        .with_metadata("from", from.to_string())
                        .with_metadata("to", self.current.to_string()),
                );
            }
            Err(error) => sink.emit(
                audit
                    .event(format!("wizard.{name}"), category, outcome_of(error))
                    .with_metadata("page", from.to_string())
                    .with_metadata("error", error.to_string()),
            ),
        }
        result
    }

    fn add_address(&mut self, kind: AddressKind) -> NavigationOutcome {
        let from = self.current;
        let index = self.form.push_address(kind);
        self.flow = build_pages(&self.definition, &self.form);
        let to = match kind {
            AddressKind::Pickup => PageId::PickupAddress(index),
            AddressKind::Dropoff => PageId::DropoffAddress(index),
        };
        tracing::debug!(
            event_name = "wizard.address_added",
            session_id = %self.session_id,
            address_kind = kind.as_str(),
            count = index + 1,
            "wizard address added"
        );
        if self.flow.iter().any(|page| page.id == to) {
            self.move_to(to);
            NavigationOutcome::Moved { from, to }
        } else {
            NavigationOutcome::AtBoundary { page: from }
        }
    }

    fn move_to(&mut self, to: PageId) {
        tracing::debug!(
            event_name = "wizard.page_changed",
            session_id = %self.session_id,
            from = %self.current,
            to = %to,
            "wizard page changed"
        );
        self.current = to;
    }

    fn expect_component(&self, component: StepComponent, offer: &str) -> Result<(), DomainError> {
        let page = self.current_page();
        if page.component == component {
            return Ok(());
        }
        Err(DomainError::InvariantViolation(format!("page `{}` does not offer {offer}", page.id)))
    }

    fn out_of_range(&self, slot: SlotRef) -> DomainError {
        let len = slot.as_address().map(|(kind, _)| self.form.address_count(kind)).unwrap_or(0);
        DomainError::Resolver(ResolverError::IndexOutOfRange { slot, len })
    }
}

impl Default for WizardController<MovingQuoteFlow> {
    fn default() -> Self {
        Self::new(MovingQuoteFlow)
    }
}

/// Builds the definition's pages, falling back to the standard flow when the
/// definition yields none.
fn build_pages<F: FlowDefinition>(definition: &F, form: &FormData) -> Vec<PageDescriptor> {
    let pickups = form.address_count(AddressKind::Pickup);
    let dropoffs = form.address_count(AddressKind::Dropoff);
    let flow = definition.build(pickups, dropoffs);
    if !flow.is_empty() {
        return flow;
    }
    tracing::warn!(
        event_name = "wizard.empty_flow",
        pickups,
        dropoffs,
        "flow definition produced no pages; using the standard flow"
    );
    build_flow(pickups, dropoffs)
}

fn outcome_of(error: &ApplicationError) -> AuditOutcome {
    match error {
        ApplicationError::Domain(_) => AuditOutcome::Rejected,
        _ => AuditOutcome::Failed,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::audit::{AuditCategory, AuditContext, AuditOutcome, InMemoryAuditSink, SessionId};
    use crate::calendar::{CalendarError, DateStatus, MovingDatePolicy};
    use crate::catalog::ServiceId;
    use crate::domain::{AddressKind, AddressRecord, FormData};
    use crate::errors::{ApplicationError, DomainError};
    use crate::flows::builder::{build_flow, FlowDefinition, MovingQuoteFlow};
    use crate::flows::pages::{DataKeyError, PageDescriptor, PageId, SlotRef};
    use crate::resolver::{ResolverError, SlotValue, SlotView};
    use crate::submission::InMemoryQuoteSubmitter;

    use super::{
        ActionOutcome, NavigationOutcome, Progress, WizardAction, WizardController, WizardServices,
    };

    fn policy() -> MovingDatePolicy {
        MovingDatePolicy::new(
            NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid test date"),
            "+10%",
        )
    }

    fn walk_to_contact(wizard: &mut WizardController) {
        wizard.select_customer_type("private").expect("customer type");
        while wizard.current_page().id != PageId::QuoteType {
            assert!(matches!(wizard.next(), NavigationOutcome::Moved { .. }));
        }
        wizard.choose_quote_type("quick").expect("quote type");
        while wizard.current_page().id != PageId::ContactDetails {
            assert!(matches!(wizard.next(), NavigationOutcome::Moved { .. }));
        }
    }

    fn fill_contact(wizard: &mut WizardController) {
        let mut contact = wizard.form_data().contact.clone();
        contact.first_name = "Aino".to_owned();
        contact.last_name = "Virtanen".to_owned();
        contact.phone = "+358401234567".to_owned();
        contact.email = "aino@example.com".to_owned();
        contact.agree_privacy = true;
        wizard.update_current(SlotValue::Contact(contact)).expect("contact");
    }

    #[test]
    fn starts_on_customer_type_without_progress() {
        let mut wizard: WizardController = WizardController::default();
        assert_eq!(wizard.current_index(), 0);
        assert_eq!(wizard.current_page().id, PageId::CustomerType);
        assert_eq!(wizard.flow().len(), 10);
        assert_eq!(wizard.progress(), None);
        assert_eq!(
            wizard.previous(),
            NavigationOutcome::AtBoundary { page: PageId::CustomerType }
        );
    }

    #[test]
    fn next_is_blocked_until_customer_type_is_chosen() {
        let mut wizard: WizardController = WizardController::default();
        assert_eq!(
            wizard.next(),
            NavigationOutcome::Blocked {
                page: PageId::CustomerType,
                missing_fields: vec!["customerType"],
            }
        );
        assert_eq!(wizard.current_index(), 0);
    }

    #[test]
    fn customer_type_choice_advances_to_first_pickup() {
        let mut wizard: WizardController = WizardController::default();

        let outcome = wizard.select_customer_type("corporate").expect("select");

        assert_eq!(
            outcome,
            NavigationOutcome::Moved { from: PageId::CustomerType, to: PageId::PickupAddress(0) }
        );
        assert_eq!(wizard.current_page().id, PageId::PickupAddress(0));
        assert_eq!(wizard.form_data().customer_type.customer_type, "corporate");
        assert_eq!(wizard.progress(), Some(Progress { current_step: 2, total_steps: 7 }));

        let error = wizard.select_customer_type("private").expect_err("address page");
        assert!(matches!(error, DomainError::InvariantViolation(_)));
        assert_eq!(wizard.form_data().customer_type.customer_type, "corporate");
    }

    #[test]
    fn blank_customer_type_stays_on_the_first_page() {
        let mut wizard: WizardController = WizardController::default();

        let outcome = wizard.select_customer_type("  ").expect("select");

        assert!(matches!(outcome, NavigationOutcome::Blocked { page: PageId::CustomerType, .. }));
        assert_eq!(wizard.current_index(), 0);
    }

    #[test]
    fn adding_pickups_lands_on_each_new_page() {
        let mut wizard: WizardController = WizardController::default();
        wizard.select_customer_type("private").expect("select");
        let dropoffs_before = wizard.form_data().dropoff_addresses().to_vec();

        wizard.add_pickup_address();
        assert_eq!(wizard.current_page().data_key(), "pickupAddresses[1]");
        wizard.add_pickup_address();
        assert_eq!(wizard.current_page().data_key(), "pickupAddresses[2]");

        assert_eq!(wizard.form_data().address_count(AddressKind::Pickup), 3);
        assert_eq!(wizard.form_data().dropoff_addresses(), dropoffs_before.as_slice());
        assert_eq!(wizard.flow().len(), 12);
        assert!(wizard.flow()[1..4].iter().all(|page| page.display_step == 2));
        assert_eq!(wizard.flow()[4].id, PageId::DropoffAddress(0));
        assert_eq!(wizard.current_index(), 3);
    }

    #[test]
    fn adding_from_an_earlier_address_page_targets_the_new_page_by_id() {
        let mut form = FormData::new();
        form.push_address(AddressKind::Pickup);
        let mut wizard = WizardController::with_form_data(MovingQuoteFlow, form);
        wizard.select_customer_type("private").expect("select");
        assert_eq!(wizard.current_page().slot, SlotRef::PickupAddress(0));

        let outcome = wizard.add_another().expect("address page offers add another");

        assert_eq!(outcome.page(), PageId::PickupAddress(2));
        assert_eq!(wizard.current_page().data_key(), "pickupAddresses[2]");
    }

    #[test]
    fn dropoff_add_another_keeps_pickups() {
        let mut wizard: WizardController = WizardController::default();
        wizard.select_customer_type("private").expect("select");
        wizard.next();
        assert_eq!(wizard.current_page().id, PageId::DropoffAddress(0));

        wizard.add_another().expect("add dropoff");

        assert_eq!(wizard.current_page().slot, SlotRef::DropoffAddress(1));
        assert_eq!(wizard.form_data().address_count(AddressKind::Pickup), 1);
        assert_eq!(wizard.form_data().address_count(AddressKind::Dropoff), 2);
    }

    #[test]
    fn add_another_is_rejected_off_address_pages() {
        let mut wizard: WizardController = WizardController::default();
        let error = wizard.add_another().expect_err("customer type page has no add another");
        assert!(matches!(error, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn update_writes_only_the_current_slice() {
        let mut wizard: WizardController = WizardController::default();
        wizard.select_customer_type("private").expect("select");
        let address = AddressRecord { city: "Tampere".to_owned(), ..AddressRecord::default() };

        wizard.update_current(SlotValue::Address(address.clone())).expect("write address");

        assert_eq!(wizard.current_data(), Some(SlotView::Address(&address)));
        assert_eq!(wizard.form_data().dropoff_addresses(), &[AddressRecord::empty()]);
        let error = wizard
            .update_current(SlotValue::Services(Vec::new()))
            .expect_err("address page cannot take services");
        assert!(matches!(error, DomainError::Resolver(ResolverError::SlotMismatch { .. })));
    }

    #[test]
    fn quote_type_choice_advances_to_inventory() {
        let mut wizard: WizardController = WizardController::default();
        wizard.select_customer_type("private").expect("select");
        wizard.next();
        wizard.next();
        assert_eq!(wizard.current_page().id, PageId::QuoteType);
        assert!(!wizard.can_advance());

        let outcome = wizard.choose_quote_type("detailed").expect("choose");

        assert_eq!(outcome, NavigationOutcome::Moved { from: PageId::QuoteType, to: PageId::Inventory });
        assert_eq!(wizard.form_data().inventory.quote_type, "detailed");
        assert!(wizard.choose_quote_type("quick").is_err());
    }

    #[test]
    fn moving_date_respects_date_rules() {
        let mut wizard: WizardController = WizardController::default();
        walk_to_contact(&mut wizard);
        while wizard.current_page().id != PageId::MovingDate {
            wizard.previous();
        }

        let error = wizard.pick_moving_date("2024-01-01", &policy()).expect_err("past date");
        assert_eq!(error, DomainError::DateNotSelectable("2024-01-01".to_owned()));

        wizard.pick_moving_date("2025-11-15", &policy()).expect("weekend date");
        assert_eq!(wizard.form_data().schedule.moving_date, "2025-11-15");
    }

    #[test]
    fn services_toggle_on_the_services_page() {
        let mut wizard: WizardController = WizardController::default();
        walk_to_contact(&mut wizard);
        wizard.previous();
        assert_eq!(wizard.current_page().id, PageId::AdditionalServices);

        assert!(wizard.toggle_service(ServiceId::new("moving-boxes")).expect("toggle on"));
        assert!(!wizard.toggle_service(ServiceId::new("moving-boxes")).expect("toggle off"));
        assert!(wizard.form_data().services_selected.is_empty());
    }

    #[test]
    fn submit_requires_the_final_page_and_its_fields() {
        let submitter = InMemoryQuoteSubmitter::default();
        let mut wizard: WizardController = WizardController::default();

        let early = wizard.submit(&submitter).expect_err("first page cannot submit");
        assert_eq!(
            early,
            ApplicationError::Domain(DomainError::SubmissionNotAllowed { page: PageId::CustomerType })
        );

        walk_to_contact(&mut wizard);
        assert_eq!(wizard.next(), NavigationOutcome::Blocked {
            page: PageId::ContactDetails,
            missing_fields: vec!["firstName", "lastName", "phone", "email", "agreePrivacy"],
        });
        assert!(matches!(
            wizard.submit(&submitter),
            Err(ApplicationError::Domain(DomainError::MissingRequiredFields { .. }))
        ));

        fill_contact(&mut wizard);
        assert_eq!(wizard.next(), NavigationOutcome::AtBoundary { page: PageId::ContactDetails });
        let receipt = wizard.submit(&submitter).expect("submit");

        let requests = submitter.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].request_id, receipt.request_id);
        assert_eq!(&requests[0].form, wizard.form_data());
        assert_eq!(requests[0].session_id.as_ref(), Some(wizard.session_id()));
    }

    #[test]
    fn render_reports_gate_and_previous_affordance() {
        let mut wizard: WizardController = WizardController::default();
        let first = wizard.render().expect("render first page");
        assert!(!first.can_advance);
        assert!(!first.show_previous);

        wizard.select_customer_type("private").expect("select");
        let address = wizard.render().expect("render address page");
        assert!(address.show_previous);
        assert_eq!(address.add_another, Some(AddressKind::Pickup));
        assert_eq!(address.title, "Add pickup address");
    }

    #[test]
    fn scripted_actions_emit_audit_events() {
        let submitter = InMemoryQuoteSubmitter::default();
        let dates = |_: &str| DateStatus::default();
        let services = WizardServices { dates: &dates, submitter: &submitter };
        let sink = InMemoryAuditSink::default();
        let audit = AuditContext::new(Some(SessionId("session-9".to_owned())), "req-9", "replay");
        let mut wizard =
            WizardController::new(MovingQuoteFlow).with_session_id(SessionId("session-9".to_owned()));

        let blocked = wizard
            .handle_with_audit(WizardAction::Next, services, &sink, &audit)
            .expect("blocked next is not an error");
        assert!(matches!(blocked, ActionOutcome::Navigation(NavigationOutcome::Blocked { .. })));
        wizard
            .handle_with_audit(
                WizardAction::SelectCustomerType { customer_type: "private".to_owned() },
                services,
                &sink,
                &audit,
            )
            .expect("select");
        let moved =
            wizard.handle_with_audit(WizardAction::Next, services, &sink, &audit).expect("next");
        assert!(matches!(
            moved,
            ActionOutcome::Navigation(NavigationOutcome::Moved { to: PageId::DropoffAddress(0), .. })
        ));
        let rejected = wizard.handle_with_audit(WizardAction::Submit, services, &sink, &audit);
        assert!(rejected.is_err());

        let events = sink.events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].outcome, AuditOutcome::Rejected);
        assert_eq!(events[1].category, AuditCategory::FormData);
        assert_eq!(events[1].metadata.get("to").map(String::as_str), Some("address-from-0"));
        assert_eq!(events[2].event_type, "wizard.next");
        assert_eq!(events[2].metadata.get("to").map(String::as_str), Some("address-to-0"));
        assert_eq!(events[3].category, AuditCategory::Submission);
        assert_eq!(events[3].outcome, AuditOutcome::Rejected);
    }

    struct EmptyFlow;

    impl FlowDefinition for EmptyFlow {
        fn build(&self, _pickup_count: usize, _dropoff_count: usize) -> Vec<PageDescriptor> {
            Vec::new()
        }
    }

    #[test]
    fn empty_definition_falls_back_to_the_standard_flow() {
        let mut wizard = WizardController::new(EmptyFlow);

        assert_eq!(wizard.current_page().id, PageId::CustomerType);
        assert_eq!(wizard.flow(), build_flow(1, 1).as_slice());
        assert!(wizard.render().is_ok());
        assert!(wizard.submit(&InMemoryQuoteSubmitter::default()).is_err());

        wizard.select_customer_type("private").expect("select");
        let outcome = wizard.add_another().expect("pickup page offers add another");
        assert_eq!(outcome.page(), PageId::PickupAddress(1));
        assert_eq!(wizard.flow().len(), 11);
    }

    #[test]
    fn data_key_reads_any_slot() {
        let mut wizard: WizardController = WizardController::default();
        wizard.select_customer_type("private").expect("select");

        assert!(matches!(
            wizard.data_at("customerType").expect("known key"),
            Some(SlotView::CustomerType(selection)) if selection.customer_type == "private"
        ));
        assert_eq!(wizard.data_at("dropoffAddresses[3]").expect("known key"), None);
        assert_eq!(
            wizard.data_at("pickupAddresses[x]"),
            Err(DomainError::DataKey(DataKeyError::Malformed("pickupAddresses[x]".to_owned())))
        );
    }

    #[test]
    fn malformed_moving_date_is_a_calendar_error() {
        let mut wizard: WizardController = WizardController::default();
        walk_to_contact(&mut wizard);
        while wizard.current_page().id != PageId::MovingDate {
            wizard.previous();
        }

        let error = wizard.pick_moving_date("15.11.2025", &policy()).expect_err("not ISO");

        assert_eq!(error, DomainError::Calendar(CalendarError::InvalidDate("15.11.2025".to_owned())));
        assert!(wizard.form_data().schedule.moving_date.is_empty());
    }

    #[test]
    fn actions_decode_from_replay_json() {
        let actions: Vec<WizardAction> = serde_json::from_str(
            r#"[
                {"action": "select_customer_type", "customer_type": "private"},
                {"action": "next"},
                {"action": "add_another"},
                {"action": "toggle_service", "service_id": "moving-boxes"},
                {"action": "update", "value": {"customer_type": {"customerType": "corporate"}}}
            ]"#,
        )
        .expect("decode actions");

        assert_eq!(actions[1], WizardAction::Next);
        assert_eq!(actions[3], WizardAction::ToggleService { service_id: ServiceId::new("moving-boxes") });
        assert!(matches!(actions[4], WizardAction::Update { value: SlotValue::CustomerType(_) }));
    }
}
