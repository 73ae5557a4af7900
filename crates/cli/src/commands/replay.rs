use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use movequote_core::audit::{AuditContext, InMemoryAuditSink};
use movequote_core::domain::FormData;
use movequote_core::flows::{
    ActionOutcome, MovingQuoteFlow, PageId, Progress, WizardAction, WizardController,
    WizardServices,
};
use movequote_core::submission::{
    InMemoryQuoteSubmitter, JsonFileSubmitter, QuoteSubmitter, SubmissionReceipt,
};
use serde::{Deserialize, Serialize};

use crate::commands::{load_config, CommandResult};

/// A recorded session: an optional starting form and the actions to replay.
#[derive(Debug, Deserialize)]
struct ReplayScript {
    #[serde(default)]
    form: Option<FormData>,
    actions: Vec<WizardAction>,
}

#[derive(Debug, Serialize)]
struct ReplayOutput<'a> {
    session_id: String,
    final_page: PageId,
    progress: Option<Progress>,
    outcomes: Vec<ActionOutcome>,
    audit_events: usize,
    submission: Option<SubmissionReceipt>,
    form: &'a FormData,
}

pub fn run(script_path: &Path, dry_run: bool) -> CommandResult {
    let config = match load_config("replay") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let script = match load_script(script_path) {
        Ok(script) => script,
        Err(error) => {
            return CommandResult::failure("replay", "script_invalid", format!("{error:#}"), 3);
        }
    };

    let submitter: Box<dyn QuoteSubmitter> = if dry_run {
        Box::new(InMemoryQuoteSubmitter::default())
    } else {
        Box::new(JsonFileSubmitter::new(config.submission.output_dir.clone()))
    };
    let policy = config.calendar.date_policy();
    let services = WizardServices { dates: &policy, submitter: submitter.as_ref() };

    let mut wizard = match script.form {
        Some(form) => WizardController::with_form_data(MovingQuoteFlow, form),
        None => WizardController::new(MovingQuoteFlow),
    };
    let sink = InMemoryAuditSink::default();
    let audit = AuditContext::new(
        Some(wizard.session_id().clone()),
        script_path.display().to_string(),
        "cli-replay",
    );

    tracing::info!(
        event_name = "replay.started",
        session_id = %wizard.session_id(),
        actions = script.actions.len(),
        dry_run,
        "replaying wizard script"
    );

    let mut outcomes = Vec::with_capacity(script.actions.len());
    let mut submission = None;
    for (index, action) in script.actions.into_iter().enumerate() {
        let name = action.name();
        match wizard.handle_with_audit(action, services, &sink, &audit) {
            Ok(outcome) => {
                if let ActionOutcome::Submitted(receipt) = &outcome {
                    submission = Some(receipt.clone());
                }
                outcomes.push(outcome);
            }
            Err(error) => {
                let interface = error.clone().into_interface(audit.correlation_id.clone());
                tracing::warn!(
                    event_name = "replay.action_rejected",
                    session_id = %wizard.session_id(),
                    action_index = index,
                    action = name,
                    error = %error,
                    "replay stopped on a rejected action"
                );
                return CommandResult::failure(
                    "replay",
                    "wizard_action",
                    format!(
                        "action {index} `{name}` on page `{}` failed: {error} ({})",
                        wizard.current_page().id,
                        interface.user_message()
                    ),
                    5,
                );
            }
        }
    }

    let output = ReplayOutput {
        session_id: wizard.session_id().to_string(),
        final_page: wizard.current_page().id,
        progress: wizard.progress(),
        outcomes,
        audit_events: sink.events().len(),
        submission,
        form: wizard.form_data(),
    };
    let message = match &output.submission {
        Some(receipt) => format!("quote request {} submitted", receipt.request_id),
        None => format!("replay stopped on page `{}` without submitting", output.final_page),
    };

    CommandResult::success_with_data("replay", message, &output)
}

fn load_script(path: &Path) -> Result<ReplayScript> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read replay script `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("could not parse replay script `{}`", path.display()))
}
