//! Implementation of the `handle-task` and `process-task` commands.

use super::read_input;
use crate::cli::{HandleTaskArgs, ProcessTaskArgs};
use crate::error::{Result, TokenforgeError};
use crate::tasks::{self, TaskPayload};

/// Build the `handleTask` payload, reading the response file if one was given.
pub fn handle_payload(args: HandleTaskArgs) -> Result<TaskPayload> {
    let human_response = match &args.human_response_file {
        Some(path) => Some(read_input(Some(path))?),
        None => args.human_response,
    };

    eprintln!("Handling task: {}", args.description);

    Ok(TaskPayload::HumanResponse(tasks::HandleTaskArgs {
        description: Some(args.description),
        human_response,
        task_details: None,
    }))
}

/// Build the `processTask` payload from JSON on disk or stdin.
pub fn process_payload(args: ProcessTaskArgs) -> Result<TaskPayload> {
    let json = read_input(args.payload.as_deref())?;
    parse_process_payload(&json)
}

fn parse_process_payload(json: &str) -> Result<TaskPayload> {
    let payload: tasks::ProcessTaskArgs = serde_json::from_str(json).map_err(|e| {
        TokenforgeError::UserError(format!(
            "invalid task payload: {}\n\
             Expected JSON of the form {{\"task\": {{\"humanAssistanceRequests\": [...]}}}}.",
            e
        ))
    })?;
    Ok(TaskPayload::NestedRequests(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskInput;
    use tempfile::TempDir;

    #[test]
    fn test_handle_payload_reads_response_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reply.txt");
        std::fs::write(&path, "Token Name: Acme\nToken Symbol: ACM\n").unwrap();

        let payload = handle_payload(HandleTaskArgs {
            description: "Create a token".to_string(),
            human_response: None,
            human_response_file: Some(path),
        })
        .unwrap();

        assert_eq!(payload.description(), Some("Create a token"));
        assert_eq!(
            payload.into_input(),
            TaskInput::Text("Token Name: Acme\nToken Symbol: ACM\n".to_string())
        );
    }

    #[test]
    fn test_handle_payload_without_response_is_empty() {
        let payload = handle_payload(HandleTaskArgs {
            description: "Create a token".to_string(),
            human_response: None,
            human_response_file: None,
        })
        .unwrap();

        assert_eq!(payload.into_input(), TaskInput::Empty);
    }

    #[test]
    fn test_parse_process_payload() {
        let payload = parse_process_payload(
            r#"{"task": {"humanAssistanceRequests": [{"question": 1, "humanResponse": "Token Name: Acme"}]}}"#,
        )
        .unwrap();

        assert_eq!(payload.capability(), "processTask");
        assert_eq!(
            payload.into_input(),
            TaskInput::Text("Token Name: Acme".to_string())
        );
    }

    #[test]
    fn test_parse_process_payload_rejects_bad_json() {
        let err = parse_process_payload("{not json").unwrap_err();
        assert!(matches!(err, TokenforgeError::UserError(_)));
        assert!(err.to_string().contains("invalid task payload"));
    }
}
