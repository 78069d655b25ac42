//! Inbound task shapes and their adapters.

use crate::resolve::RequestFields;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured arguments of the `createToken` capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenArgs {
    #[serde(default, alias = "name")]
    pub token_name: Option<String>,
    #[serde(default, alias = "symbol")]
    pub token_symbol: Option<String>,
    #[serde(default)]
    pub initial_supply: Option<u64>,
    #[serde(default)]
    pub owner_address: Option<String>,
}

/// Arguments of the `handleTask` capability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleTaskArgs {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub human_response: Option<String>,
    /// Opaque extra details; carried but not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_details: Option<Value>,
}

/// Arguments of the `processTask` capability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessTaskArgs {
    #[serde(default)]
    pub task: Option<NestedTask>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedTask {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub human_assistance_requests: Vec<AssistanceRequest>,
}

/// One question put to a human and the reply, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistanceRequest {
    /// Free-form; any JSON value is accepted.
    #[serde(default)]
    pub question: Value,
    #[serde(default)]
    pub human_response: Option<String>,
}

/// A task in one of the accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskPayload {
    DirectArgs(CreateTokenArgs),
    HumanResponse(HandleTaskArgs),
    NestedRequests(ProcessTaskArgs),
}

/// Common form every payload is reduced to before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskInput {
    /// Structured arguments, ready for resolution.
    Request(RequestFields),
    /// Free text to run through field extraction.
    Text(String),
    /// Nothing to work with yet.
    Empty,
}

impl TaskPayload {
    /// Capability name the payload arrived through.
    pub fn capability(&self) -> &'static str {
        match self {
            TaskPayload::DirectArgs(_) => "createToken",
            TaskPayload::HumanResponse(_) => "handleTask",
            TaskPayload::NestedRequests(_) => "processTask",
        }
    }

    /// Task description, when the shape carries one.
    pub fn description(&self) -> Option<&str> {
        match self {
            TaskPayload::DirectArgs(_) => None,
            TaskPayload::HumanResponse(args) => args.description.as_deref(),
            TaskPayload::NestedRequests(args) => {
                args.task.as_ref().and_then(|t| t.description.as_deref())
            }
        }
    }

    pub fn into_input(self) -> TaskInput {
        match self {
            TaskPayload::DirectArgs(args) => direct_input(args),
            TaskPayload::HumanResponse(args) => text_input(args.human_response),
            TaskPayload::NestedRequests(args) => nested_input(args),
        }
    }
}

/// Arguments with every field absent carry nothing to deploy.
fn direct_input(args: CreateTokenArgs) -> TaskInput {
    let fields = RequestFields {
        name: args.token_name,
        symbol: args.token_symbol,
        initial_supply: args.initial_supply,
        owner_address: args.owner_address,
    }
    .normalized();

    if fields == RequestFields::default() {
        TaskInput::Empty
    } else {
        TaskInput::Request(fields)
    }
}

fn text_input(text: Option<String>) -> TaskInput {
    match text {
        Some(text) if !text.trim().is_empty() => TaskInput::Text(text),
        _ => TaskInput::Empty,
    }
}

/// Only the first assistance request is consulted.
fn nested_input(args: ProcessTaskArgs) -> TaskInput {
    let first_response = args
        .task
        .and_then(|task| task.human_assistance_requests.into_iter().next())
        .and_then(|request| request.human_response);
    text_input(first_response)
}
