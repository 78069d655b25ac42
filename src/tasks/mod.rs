//! Task intake.
//!
//! Tasks arrive in three shapes:
//!
//! - `createToken`: structured token arguments
//! - `handleTask`: a description plus an optional free-text human response
//! - `processTask`: a nested task whose first human-assistance request holds
//!   the response
//!
//! Each shape is adapted into a [`TaskInput`]. Free text goes through field
//! extraction; when name, symbol or supply cannot be recovered the caller gets
//! [`CLARIFICATION_PROMPT`] back and nothing is deployed.

mod dispatcher;
mod payload;


pub use dispatcher::{CLARIFICATION_PROMPT, DispatchResponse, TaskDispatcher};
pub use payload::{
    AssistanceRequest, CreateTokenArgs, HandleTaskArgs, NestedTask, ProcessTaskArgs, TaskInput,
    TaskPayload,
};
