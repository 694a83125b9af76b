//! Tests for `TaskRequest` and `NotificationPayload`.

use super::{ApiError, NotificationPayload, TaskRequest};
use crate::github::PublishedSite;
use serde_json::{Value, json};

const SECRET: &str = "s3cret";

fn valid_body() -> Value {
    json!({
        "secret": SECRET,
        "email": "student@example.com",
        "task": "captcha-solver-42",
        "round": 2,
        "nonce": "ab12",
        "brief": "Create a captcha solver",
        "evaluation_url": "https://eval.example.com/notify",
        "attachments": [{"name": "sample.png", "url": "data:image/png;base64,iVBORw=="}],
    })
}

fn with(field: &str, value: Value) -> Value {
    let mut body = valid_body();
    body[field] = value;
    body
}

fn without(field: &str) -> Value {
    let mut body = valid_body();
    body.as_object_mut().unwrap().remove(field);
    body
}

fn bad_request_field(result: Result<TaskRequest, ApiError>) -> String {
    match result {
        Err(ApiError::BadRequest(message)) => message,
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[test]
fn parses_complete_request() {
    let request = TaskRequest::parse(&valid_body(), SECRET).unwrap();

    assert_eq!(request.email.as_deref(), Some("student@example.com"));
    assert_eq!(request.task, "captcha-solver-42");
    assert_eq!(request.round, 2);
    assert_eq!(request.nonce, json!("ab12"));
    assert_eq!(request.brief, "Create a captcha solver");
    assert_eq!(request.evaluation_url.as_str(), "https://eval.example.com/notify");
    assert_eq!(request.attachments.len(), 1);
}

mod secret {
    use super::*;

    #[test]
    fn wrong_secret_is_unauthorized() {
        let result = TaskRequest::parse(&with("secret", json!("nope")), SECRET);
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn missing_secret_is_unauthorized() {
        let result = TaskRequest::parse(&without("secret"), SECRET);
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn secret_is_checked_before_fields() {
        let body = json!({ "secret": "wrong" });
        assert!(matches!(
            TaskRequest::parse(&body, SECRET),
            Err(ApiError::Unauthorized)
        ));
    }
}

mod fields {
    use super::*;

    #[test]
    fn task_must_be_a_non_empty_string() {
        for value in [json!(null), json!(7), json!("")] {
            let message = bad_request_field(TaskRequest::parse(&with("task", value), SECRET));
            assert_eq!(message, "Missing or invalid 'task'");
        }
        let message = bad_request_field(TaskRequest::parse(&without("task"), SECRET));
        assert!(message.contains("'task'"));
    }

    #[test]
    fn task_is_checked_before_evaluation_url() {
        let mut body = without("task");
        body.as_object_mut().unwrap().remove("evaluation_url");

        let message = bad_request_field(TaskRequest::parse(&body, SECRET));
        assert!(message.contains("'task'"));
    }

    #[test]
    fn evaluation_url_must_parse_as_http() {
        for value in [json!(null), json!(""), json!("not a url"), json!("ftp://x/y")] {
            let message =
                bad_request_field(TaskRequest::parse(&with("evaluation_url", value), SECRET));
            assert_eq!(message, "Missing or invalid 'evaluation_url'");
        }
    }

    #[test]
    fn round_accepts_integers_and_numeric_strings() {
        let from_string = TaskRequest::parse(&with("round", json!(" 3 ")), SECRET).unwrap();
        assert_eq!(from_string.round, 3);

        let defaulted = TaskRequest::parse(&without("round"), SECRET).unwrap();
        assert_eq!(defaulted.round, 1);
    }

    #[test]
    fn round_rejects_other_values() {
        for value in [json!(-1), json!(1.5), json!("two"), json!([1])] {
            let message = bad_request_field(TaskRequest::parse(&with("round", value), SECRET));
            assert_eq!(message, "Missing or invalid 'round'");
        }
    }

    #[test]
    fn optional_fields_default() {
        let mut body = valid_body();
        let object = body.as_object_mut().unwrap();
        for field in ["email", "nonce", "brief", "attachments"] {
            object.remove(field);
        }

        let request = TaskRequest::parse(&body, SECRET).unwrap();

        assert_eq!(request.email, None);
        assert_eq!(request.nonce, Value::Null);
        assert_eq!(request.brief, "");
        assert!(request.attachments.is_empty());
    }

    #[test]
    fn malformed_attachments_are_ignored() {
        let request =
            TaskRequest::parse(&with("attachments", json!("not a list")), SECRET).unwrap();
        assert!(request.attachments.is_empty());
    }
}

#[test]
fn payload_echoes_request_and_site() {
    let request = TaskRequest::parse(&valid_body(), SECRET).unwrap();
    let site = PublishedSite {
        repo: "llm-task-captcha-solver-42".to_string(),
        commit_sha: "abc123".to_string(),
        repo_url: "https://github.com/octocat/llm-task-captcha-solver-42".to_string(),
        pages_url: "https://octocat.github.io/llm-task-captcha-solver-42/".to_string(),
    };

    let json = NotificationPayload::new(&request, &site).to_json().unwrap();

    assert_eq!(
        json,
        json!({
            "email": "student@example.com",
            "task": "captcha-solver-42",
            "round": 2,
            "nonce": "ab12",
            "repo_url": "https://github.com/octocat/llm-task-captcha-solver-42",
            "commit_sha": "abc123",
            "pages_url": "https://octocat.github.io/llm-task-captcha-solver-42/",
        })
    );
}

#[test]
fn payload_keeps_missing_email_as_null() {
    let request = TaskRequest::parse(&without("email"), SECRET).unwrap();
    let site = PublishedSite {
        repo: "r".to_string(),
        commit_sha: "c".to_string(),
        repo_url: "u".to_string(),
        pages_url: "p".to_string(),
    };

    let json = NotificationPayload::new(&request, &site).to_json().unwrap();

    assert_eq!(json["email"], Value::Null);
}
