use super::*;
use crate::address::AddressLookup;
use crate::context::ProjectContext;
use crate::error::TokenforgeError;
use crate::events::{Event, EventAction};
use crate::process::SubprocessResult;
use crate::resolve::{Environment, Owner, RequestFields};
use crate::settings::{Settings, StderrPolicy};
use crate::test_support::{ScriptedRunner, SECRETS_ENV, create_test_project, deployed_output};
use std::fs;

const ADDRESS_A: &str = "0x1111111111111111111111111111111111111111";
const ADDRESS_B: &str = "0x2222222222222222222222222222222222222222";

fn acme_args() -> RequestFields {
    RequestFields {
        name: Some("Acme".to_string()),
        symbol: Some("ACM".to_string()),
        initial_supply: Some(5000),
        owner_address: None,
    }
}

fn deploy_with(
    ctx: &ProjectContext,
    settings: &Settings,
    runner: &ScriptedRunner,
    args: &RequestFields,
) -> DeploymentOutcome {
    let environment = Environment::default();
    DeploymentOrchestrator::new(ctx, settings, &environment, runner)
        .deploy(args)
        .unwrap()
}

fn recorded_actions(ctx: &ProjectContext) -> Vec<EventAction> {
    fs::read_to_string(ctx.events_file())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str::<Event>(line).unwrap().action)
        .collect()
}

#[test]
fn test_successful_deployment_reports_address() {
    let (_temp_dir, ctx) = create_test_project(SECRETS_ENV);
    let runner = ScriptedRunner::new().respond("deploy", deployed_output(ADDRESS_A));

    let outcome = deploy_with(&ctx, &Settings::default(), &runner, &acme_args());

    let DeploymentOutcome::Success(report) = &outcome else {
        panic!("expected success, got {:?}", outcome);
    };
    assert_eq!(report.address, AddressLookup::Found(ADDRESS_A.to_string()));
    assert_eq!(report.request.name, "Acme");
    assert_eq!(report.request.owner, Owner::Deployer);
    assert_eq!(
        report.explorer_url.as_deref(),
        Some("https://www.oklink.com/amoy/address/0x1111111111111111111111111111111111111111")
    );

    let rendered = outcome.render();
    assert!(rendered.starts_with("Token deployment successful!"));
    assert!(rendered.contains("- Initial Supply: 5000"));
    assert!(rendered.contains("- Contract Address: 0x1111111111111111111111111111111111111111"));
    assert!(rendered.contains("- Network: Polygon Amoy Testnet"));
}

#[test]
fn test_runs_compile_then_deploy_with_network_selector() {
    let (_temp_dir, ctx) = create_test_project(SECRETS_ENV);
    let runner = ScriptedRunner::new().respond("deploy", deployed_output(ADDRESS_A));

    deploy_with(&ctx, &Settings::default(), &runner, &acme_args());

    let calls = runner.calls();
    assert_eq!(runner.stages(), vec!["compile", "deploy"]);
    assert_eq!(calls[0].command, "npx hardhat compile");
    assert_eq!(
        calls[1].command,
        "npx hardhat run scripts/deploy.js --network polygonAmoy"
    );
    assert!(
        calls[1]
            .env
            .contains(&("TOKEN_SYMBOL".to_string(), "ACM".to_string()))
    );
}

#[test]
fn test_explicit_owner_is_passed_to_deploy() {
    let (_temp_dir, ctx) = create_test_project(SECRETS_ENV);
    let runner = ScriptedRunner::new().respond("deploy", deployed_output(ADDRESS_A));
    let args = RequestFields {
        owner_address: Some(ADDRESS_B.to_string()),
        ..acme_args()
    };

    let outcome = deploy_with(&ctx, &Settings::default(), &runner, &args);

    assert!(outcome.is_success());
    assert!(
        runner.calls()[1]
            .env
            .contains(&("OWNER_ADDRESS".to_string(), ADDRESS_B.to_string()))
    );
}

#[test]
fn test_compile_failure_never_runs_deploy() {
    let (_temp_dir, ctx) = create_test_project(SECRETS_ENV);
    let runner = ScriptedRunner::new().respond(
        "compile",
        SubprocessResult::exited("", "Error HH600: Compilation failed\n", 1),
    );

    let outcome = deploy_with(&ctx, &Settings::default(), &runner, &acme_args());

    assert_eq!(
        outcome,
        DeploymentOutcome::failure(FailureStage::Compile, "Error HH600: Compilation failed")
    );
    assert_eq!(runner.stages(), vec!["compile"]);
    assert_eq!(
        recorded_actions(&ctx),
        vec![EventAction::Resolve, EventAction::Compile, EventAction::Failed]
    );
}

#[test]
fn test_deploy_failure_carries_stderr() {
    let (_temp_dir, ctx) = create_test_project(SECRETS_ENV);
    let runner = ScriptedRunner::new().respond(
        "deploy",
        SubprocessResult::exited("", "ProviderError: insufficient funds for gas\n", 1),
    );

    let outcome = deploy_with(&ctx, &Settings::default(), &runner, &acme_args());

    let err = outcome.into_result().unwrap_err();
    assert!(matches!(err, TokenforgeError::DeployFailure(_)));
    assert!(err.to_string().contains("insufficient funds"));
}

#[test]
fn test_stderr_warning_fails_only_under_strict_policy() {
    let warning = || SubprocessResult::exited("", "Warning: SPDX license identifier not provided\n", 0);

    let (_temp_dir, ctx) = create_test_project(SECRETS_ENV);
    let runner = ScriptedRunner::new().respond("compile", warning());
    let outcome = deploy_with(&ctx, &Settings::default(), &runner, &acme_args());
    assert!(matches!(
        outcome,
        DeploymentOutcome::Failure {
            stage: FailureStage::Compile,
            ..
        }
    ));

    let lenient = Settings {
        stderr_policy: StderrPolicy::ExitCodeOnly,
        ..Settings::default()
    };
    let runner = ScriptedRunner::new()
        .respond("compile", warning())
        .respond("deploy", deployed_output(ADDRESS_A));
    let outcome = deploy_with(&ctx, &lenient, &runner, &acme_args());
    assert!(outcome.is_success());
}

#[test]
fn test_runner_error_is_a_stage_failure() {
    let (_temp_dir, ctx) = create_test_project(SECRETS_ENV);
    let runner = ScriptedRunner::new().refuse("compile", "failed to execute compile command 'npx'");

    let outcome = deploy_with(&ctx, &Settings::default(), &runner, &acme_args());

    assert_eq!(
        outcome,
        DeploymentOutcome::failure(
            FailureStage::Compile,
            "failed to execute compile command 'npx'"
        )
    );
}

#[test]
fn test_missing_address_is_degraded_success() {
    let (_temp_dir, ctx) = create_test_project(SECRETS_ENV);
    let runner = ScriptedRunner::new().respond(
        "deploy",
        SubprocessResult::exited("Deployment finished\n", "", 0),
    );

    let outcome = deploy_with(&ctx, &Settings::default(), &runner, &acme_args());

    let DeploymentOutcome::Success(report) = &outcome else {
        panic!("expected success, got {:?}", outcome);
    };
    assert_eq!(report.address, AddressLookup::NotFound);
    assert!(report.explorer_url.is_none());
    assert!(
        outcome
            .render()
            .contains("- Contract Address: Address not found in output")
    );
}

#[test]
fn test_two_deploys_are_independent() {
    let (_temp_dir, ctx) = create_test_project(SECRETS_ENV);
    let runner = ScriptedRunner::new()
        .respond("deploy", deployed_output(ADDRESS_A))
        .respond("deploy", deployed_output(ADDRESS_B));
    let settings = Settings::default();

    let first = deploy_with(&ctx, &settings, &runner, &acme_args());
    let second = deploy_with(&ctx, &settings, &runner, &acme_args());

    let (DeploymentOutcome::Success(a), DeploymentOutcome::Success(b)) = (first, second) else {
        panic!("expected two successes");
    };
    assert_eq!(a.address.address(), Some(ADDRESS_A));
    assert_eq!(b.address.address(), Some(ADDRESS_B));
    assert_eq!(runner.stages(), vec!["compile", "deploy", "compile", "deploy"]);
}

#[test]
fn test_missing_signing_key_runs_nothing() {
    let (_temp_dir, ctx) = create_test_project("POLYGON_AMOY_RPC_URL=https://rpc.example\n");
    let runner = ScriptedRunner::new();

    let outcome = deploy_with(&ctx, &Settings::default(), &runner, &acme_args());

    let DeploymentOutcome::Failure { stage, detail } = &outcome else {
        panic!("expected failure, got {:?}", outcome);
    };
    assert_eq!(*stage, FailureStage::ConfigMissing);
    assert!(detail.contains("PRIVATE_KEY"));
    assert!(runner.calls().is_empty());
    assert!(matches!(
        outcome.into_result().unwrap_err(),
        TokenforgeError::ConfigMissing(_)
    ));
}

#[test]
fn test_placeholder_signing_key_counts_as_missing() {
    let (_temp_dir, ctx) = create_test_project(
        "PRIVATE_KEY=your_wallet_private_key_here\nPOLYGON_AMOY_RPC_URL=https://rpc.example\n",
    );
    let runner = ScriptedRunner::new();

    let outcome = deploy_with(&ctx, &Settings::default(), &runner, &acme_args());

    assert!(matches!(
        outcome,
        DeploymentOutcome::Failure {
            stage: FailureStage::ConfigMissing,
            ..
        }
    ));
    assert!(runner.calls().is_empty());
}

#[test]
fn test_missing_rpc_url_runs_nothing() {
    let (_temp_dir, ctx) = create_test_project("PRIVATE_KEY=0xabc\n");
    let runner = ScriptedRunner::new();

    let outcome = deploy_with(&ctx, &Settings::default(), &runner, &acme_args());

    let DeploymentOutcome::Failure { detail, .. } = outcome else {
        panic!("expected failure");
    };
    assert!(detail.contains("POLYGON_AMOY_RPC_URL"));
    assert!(runner.calls().is_empty());
}

#[test]
fn test_secrets_from_process_environment() {
    let (_temp_dir, ctx) = create_test_project("");
    let runner = ScriptedRunner::new().respond("deploy", deployed_output(ADDRESS_A));
    let environment = Environment::from_pairs([
        ("PRIVATE_KEY", "0xabc"),
        ("POLYGON_AMOY_RPC_URL", "https://rpc.example"),
    ]);
    let settings = Settings::default();

    let outcome = DeploymentOrchestrator::new(&ctx, &settings, &environment, &runner)
        .deploy(&acme_args())
        .unwrap();

    assert!(outcome.is_success());
}

#[test]
fn test_malformed_owner_is_invalid_request() {
    let (_temp_dir, ctx) = create_test_project(SECRETS_ENV);
    let runner = ScriptedRunner::new();
    let args = RequestFields {
        owner_address: Some("0xabc".to_string()),
        ..acme_args()
    };

    let outcome = deploy_with(&ctx, &Settings::default(), &runner, &args);

    assert!(matches!(
        outcome,
        DeploymentOutcome::Failure {
            stage: FailureStage::InvalidRequest,
            ..
        }
    ));
    assert!(runner.calls().is_empty());
}

#[test]
fn test_resolved_defaults_are_written_back() {
    let (_temp_dir, ctx) = create_test_project(SECRETS_ENV);
    let runner = ScriptedRunner::new();

    deploy_with(&ctx, &Settings::default(), &runner, &acme_args());

    let content = fs::read_to_string(ctx.env_file_path()).unwrap();
    assert!(content.starts_with(SECRETS_ENV));
    assert!(content.ends_with("TOKEN_NAME=Acme\nTOKEN_SYMBOL=ACM\nINITIAL_SUPPLY=5000\n"));
}

#[test]
fn test_events_are_tagged_with_capability() {
    let (_temp_dir, ctx) = create_test_project(SECRETS_ENV);
    let runner = ScriptedRunner::new().respond("deploy", deployed_output(ADDRESS_A));
    let environment = Environment::default();
    let settings = Settings::default();

    DeploymentOrchestrator::new(&ctx, &settings, &environment, &runner)
        .with_capability("createToken")
        .deploy(&acme_args())
        .unwrap();

    let content = fs::read_to_string(ctx.events_file()).unwrap();
    let events: Vec<Event> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(
        events.iter().map(|e| e.action).collect::<Vec<_>>(),
        vec![
            EventAction::Resolve,
            EventAction::Compile,
            EventAction::Deploy,
            EventAction::Deployed
        ]
    );
    assert!(
        events
            .iter()
            .all(|e| e.capability.as_deref() == Some("createToken"))
    );
    assert!(!content.contains("0x59c6995e"));
}
