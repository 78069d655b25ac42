//! The compile-then-deploy pipeline.

use super::outcome::{DeploymentOutcome, DeploymentReport, FailureStage};
use crate::address::{AddressLookup, extract_address};
use crate::context::ProjectContext;
use crate::envfile::{EnvFile, EnvStore};
use crate::error::{Result, TokenforgeError};
use crate::events::{self, Event, EventAction};
use crate::process::{CommandRunner, Invocation, SubprocessResult, truncate_output};
use crate::resolve::{ConfigResolver, DeploymentRequest, Environment, RequestFields};
use crate::settings::Settings;
use serde_json::json;

/// Lines of failure detail kept in the event log.
const EVENT_DETAIL_MAX_LINES: usize = 20;
const EVENT_DETAIL_MAX_CHARS: usize = 2000;

/// Runs one deployment end to end.
///
/// Every call deploys a fresh contract; nothing is cached between calls.
pub struct DeploymentOrchestrator<'a, R: CommandRunner> {
    ctx: &'a ProjectContext,
    settings: &'a Settings,
    environment: &'a Environment,
    runner: &'a R,
    store: EnvStore,
    capability: Option<&'a str>,
}

impl<'a, R: CommandRunner> DeploymentOrchestrator<'a, R> {
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
            store: EnvStore::for_project(ctx),
            capability: None,
        }
    }

    /// Tag recorded events with the capability that triggered the run.
    pub fn with_capability(mut self, capability: &'a str) -> Self {
        self.capability = Some(capability);
        self
    }

    /// Resolve `args`, compile, deploy and read back the contract address.
    ///
    /// Pipeline failures are returned as [`DeploymentOutcome::Failure`]. `Err`
    /// is reserved for problems outside the pipeline, such as a held lock or
    /// an unwritable `.env`.
    pub fn deploy(&self, args: &RequestFields) -> Result<DeploymentOutcome> {
        if let Err(detail) = self.check_secrets()? {
            return Ok(self.fail(FailureStage::ConfigMissing, detail));
        }

        let request = match ConfigResolver::new(&self.store, self.environment)
            .resolve_and_persist(args, true)
        {
            Ok(request) => request,
            Err(TokenforgeError::ConfigMissing(detail)) => {
                return Ok(self.fail(FailureStage::ConfigMissing, detail));
            }
            Err(TokenforgeError::InvalidRequest(detail)) => {
                return Ok(self.fail(FailureStage::InvalidRequest, detail));
            }
            Err(e) => return Err(e),
        };
        self.record(
            EventAction::Resolve,
            json!({
                "name": request.name,
                "symbol": request.symbol,
                "initial_supply": request.initial_supply,
                "owner": request.owner.to_string(),
            }),
        );

        eprintln!("Compiling contracts...");
        let compile = Invocation::new("compile", self.settings.compile_command.clone())
            .with_env(request.toolchain_env());
        if let Err(detail) = self.run_stage(EventAction::Compile, &compile) {
            return Ok(self.fail(FailureStage::Compile, detail));
        }

        eprintln!("Deploying token to {}...", self.settings.network_label);
        let deploy = Invocation::new("deploy", self.settings.deploy_command_line())
            .with_env(request.toolchain_env());
        let deployed = match self.run_stage(EventAction::Deploy, &deploy) {
            Ok(result) => result,
            Err(detail) => return Ok(self.fail(FailureStage::Deploy, detail)),
        };

        let report = self.report(request, extract_address(&deployed.stdout));
        self.record(
            EventAction::Deployed,
            json!({
                "name": report.request.name,
                "symbol": report.request.symbol,
                "initial_supply": report.request.initial_supply,
                "address": report.address.address(),
                "network": self.settings.network,
            }),
        );

        Ok(DeploymentOutcome::Success(report))
    }

    /// Check the signing key and RPC endpoint.
    ///
    /// The outer `Result` carries IO errors; the inner one the failure detail.
    fn check_secrets(&self) -> Result<std::result::Result<(), String>> {
        let file = self.store.snapshot()?;

        let signing_key = self.secret(&file, &self.settings.signing_key_var);
        if signing_key.is_none_or(|key| key == self.settings.signing_key_placeholder) {
            return Ok(Err(format!(
                "Please set your {} in the .env file before deploying a token.",
                self.settings.signing_key_var
            )));
        }

        if self.secret(&file, &self.settings.rpc_url_var).is_none() {
            return Ok(Err(format!(
                "Please set your {} in the .env file before deploying a token.",
                self.settings.rpc_url_var
            )));
        }

        Ok(Ok(()))
    }

    /// Process environment first, then the `.env` file.
    fn secret<'f>(&'f self, file: &'f EnvFile, key: &str) -> Option<&'f str> {
        self.environment
            .get(key)
            .or_else(|| file.get(key).filter(|v| !v.is_empty()))
    }

    /// Run one subprocess stage and record it. `Err` carries the failure detail.
    fn run_stage(
        &self,
        action: EventAction,
        invocation: &Invocation,
    ) -> std::result::Result<SubprocessResult, String> {
        let result = match self.runner.run(invocation) {
            Ok(result) => result,
            Err(e) => {
                self.record(action, json!({ "error": e.to_string() }));
                return Err(e.to_string());
            }
        };

        let failed = result.failed(self.settings.stderr_policy);
        self.record(
            action,
            json!({
                "exit_code": result.exit_code,
                "timed_out": result.timed_out,
                "duration_ms": u64::try_from(result.duration.as_millis()).unwrap_or(u64::MAX),
                "failed": failed,
            }),
        );

        if failed {
            Err(result.failure_detail())
        } else {
            Ok(result)
        }
    }

    fn report(&self, request: DeploymentRequest, address: AddressLookup) -> DeploymentReport {
        let explorer_url = address
            .address()
            .map(|addr| self.settings.explorer_link(addr));
        DeploymentReport {
            request,
            address,
            network_label: self.settings.network_label.clone(),
            explorer_url,
        }
    }

    fn fail(&self, stage: FailureStage, detail: String) -> DeploymentOutcome {
        self.record(
            EventAction::Failed,
            json!({
                "stage": stage.to_string(),
                "detail": truncate_output(&detail, EVENT_DETAIL_MAX_LINES, EVENT_DETAIL_MAX_CHARS),
            }),
        );
        DeploymentOutcome::failure(stage, detail)
    }

    fn record(&self, action: EventAction, details: serde_json::Value) {
        let mut event = Event::new(action).with_details(details);
        if let Some(capability) = self.capability {
            event = event.with_capability(capability);
        }
        events::record(self.ctx, event);
    }
}
