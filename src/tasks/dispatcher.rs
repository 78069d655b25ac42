//! Routing of tasks to extraction and deployment.

use super::payload::{TaskInput, TaskPayload};
use crate::context::ProjectContext;
use crate::deploy::{DeploymentOrchestrator, DeploymentOutcome};
use crate::error::Result;
use crate::events::{self, Event, EventAction};
use crate::extract::{Field, extract_fields};
use crate::process::CommandRunner;
use crate::resolve::{Environment, RequestFields};
use crate::settings::Settings;
use serde_json::json;

/// Reply sent when the token details are incomplete.
pub const CLARIFICATION_PROMPT: &str = "Please provide the token details: Token Name, Token Symbol, Total Supply, and Owner Address (optional).";

/// What a dispatched task produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResponse {
    /// Required fields are missing; the caller should ask again.
    Clarification { missing: Vec<Field> },
    Outcome(DeploymentOutcome),
}

impl DispatchResponse {
    pub fn render(&self) -> String {
        match self {
            DispatchResponse::Clarification { .. } => CLARIFICATION_PROMPT.to_string(),
            DispatchResponse::Outcome(outcome) => outcome.render(),
        }
    }
}

/// Routes task payloads for one project.
pub struct TaskDispatcher<'a, R: CommandRunner> {
    ctx: &'a ProjectContext,
    settings: &'a Settings,
    environment: &'a Environment,
    runner: &'a R,
}

impl<'a, R: CommandRunner> TaskDispatcher<'a, R> {
    pub fn new(
        ctx: &'a ProjectContext,
        settings: &'a Settings,
        environment: &'a Environment,
        runner: &'a R,
    ) -> Self {
        Self {
            ctx,
            settings,
            environment,
            runner,
        }
    }

    pub fn dispatch(&self, payload: TaskPayload) -> Result<DispatchResponse> {
        let capability = payload.capability();
        let description = payload.description().map(str::to_string);

        let args = match payload.into_input() {
            TaskInput::Request(args) => args,
            TaskInput::Empty => {
                return Ok(self.clarify(
                    capability,
                    description,
                    vec![Field::Name, Field::Symbol, Field::Supply],
                ));
            }
            TaskInput::Text(text) => {
                let fields = extract_fields(&text);
                let missing = fields.missing_fields();
                match fields.into_request_fields() {
                    Some(args) => args,
                    None => return Ok(self.clarify(capability, description, missing)),
                }
            }
        };

        self.deploy(capability, &args)
    }

    fn deploy(&self, capability: &'static str, args: &RequestFields) -> Result<DispatchResponse> {
        let outcome =
            DeploymentOrchestrator::new(self.ctx, self.settings, self.environment, self.runner)
                .with_capability(capability)
                .deploy(args)?;
        Ok(DispatchResponse::Outcome(outcome))
    }

    fn clarify(
        &self,
        capability: &'static str,
        description: Option<String>,
        missing: Vec<Field>,
    ) -> DispatchResponse {
        let labels: Vec<&str> = missing.iter().map(Field::label).collect();
        events::record(
            self.ctx,
            Event::new(EventAction::Clarify)
                .with_capability(capability)
                .with_details(json!({
                    "description": description,
                    "missing": labels,
                })),
        );
        DispatchResponse::Clarification { missing }
    }
}
