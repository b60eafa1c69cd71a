use serde_json::Value;
use tracing::{debug, error};

use crate::error::{BotError, Result};
use crate::types::{Homework, HomeworkStatus};

/// Key holding the list of submissions in an API answer.
pub const HOMEWORKS_KEY: &str = "homeworks";

/// Key holding the server timestamp to use as the next `from_date`.
pub const CURRENT_DATE_KEY: &str = "current_date";

const STATUS_FIELD: &str = "status";
const NAME_FIELD: &str = "homework_name";

/// Validate the shape of an API answer and return its submissions list.
///
/// Checks, in order: the answer is an object, it has a `homeworks` key, the
/// value under it is a list, and the first entry (if any) is an object.
/// An empty list is valid.
pub fn check_response(response: &Value) -> Result<&[Value]> {
    let object = response.as_object().ok_or(BotError::ResponseNotObject)?;

    let Some(homeworks) = object.get(HOMEWORKS_KEY) else {
        error!("Answer has no \"{HOMEWORKS_KEY}\" key");
        return Err(BotError::MissingKey(HOMEWORKS_KEY));
    };

    let homeworks = homeworks
        .as_array()
        .ok_or(BotError::NotAList(HOMEWORKS_KEY))?;

    if let Some(first) = homeworks.first() {
        if !first.is_object() {
            return Err(BotError::HomeworkNotObject);
        }
    }

    Ok(homeworks.as_slice())
}

/// Server-reported timestamp of the answer, if present and integral.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get(CURRENT_DATE_KEY).and_then(Value::as_i64)
}

/// Extract the name and status of a single submission record.
pub fn parse_homework(homework: &Value) -> Result<Homework> {
    let object = homework.as_object().ok_or(BotError::HomeworkNotObject)?;

    let Some(status) = object.get(STATUS_FIELD) else {
        error!("Homework has no \"{STATUS_FIELD}\" field");
        return Err(BotError::MissingField(STATUS_FIELD));
    };
    let Some(name) = object.get(NAME_FIELD) else {
        error!("Homework has no \"{NAME_FIELD}\" field");
        return Err(BotError::MissingField(NAME_FIELD));
    };

    // A non-string status is just another value outside the verdict table.
    let status = match status.as_str() {
        Some(status) => status.parse::<HomeworkStatus>(),
        None => Err(BotError::UnexpectedStatus(status.to_string())),
    }
    .inspect_err(|_| error!("Unexpected homework status {status}"))?;

    let Some(name) = name.as_str() else {
        error!("Homework \"{NAME_FIELD}\" is not a string: {name}");
        return Err(BotError::FieldNotString(NAME_FIELD));
    };

    Ok(Homework {
        name: name.to_string(),
        status,
    })
}

/// Render the notification text for a submission.
pub fn format_message(homework: &Homework) -> String {
    format!(
        "Изменился статус проверки работы \"{}\". {}",
        homework.name,
        homework.status.verdict()
    )
}

/// Build the notification for a single submission record.
pub fn parse_status(homework: &Value) -> Result<String> {
    parse_homework(homework).map(|hw| format_message(&hw))
}

/// Validate an answer and build the notification for its latest submission.
///
/// Only the first entry is considered. Returns `None` when the list is empty.
pub fn latest_message(response: &Value) -> Result<Option<String>> {
    let homeworks = check_response(response)?;
    match homeworks.first() {
        Some(homework) => {
            debug!("Answer contains {} homework(s)", homeworks.len());
            parse_status(homework).map(Some)
        }
        None => {
            debug!("No new statuses");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const APPROVED_PROJ1: &str = "Изменился статус проверки работы \"proj1\". \
                                  Работа проверена: ревьюеру всё понравилось. Ура!";

    // ── check_response ─────────────────────────────────────────────

    #[test]
    fn response_must_be_object() {
        let err = check_response(&json!([{"homeworks": []}])).unwrap_err();
        assert!(matches!(err, BotError::ResponseNotObject));
        let err = check_response(&json!("homeworks")).unwrap_err();
        assert!(matches!(err, BotError::ResponseNotObject));
    }

    #[test]
    fn response_missing_homeworks_key() {
        let err = check_response(&json!({"current_date": 1000})).unwrap_err();
        assert!(matches!(err, BotError::MissingKey("homeworks")));
        let err = check_response(&json!({})).unwrap_err();
        assert!(matches!(err, BotError::MissingKey("homeworks")));
    }

    #[test]
    fn response_homeworks_not_a_list() {
        for value in [json!({}), json!("proj1"), json!(42), json!(null)] {
            let err = check_response(&json!({ "homeworks": value })).unwrap_err();
            assert!(matches!(err, BotError::NotAList("homeworks")));
        }
    }

    #[test]
    fn response_first_homework_not_object() {
        let err = check_response(&json!({"homeworks": ["proj1"]})).unwrap_err();
        assert!(matches!(err, BotError::HomeworkNotObject));
    }

    #[test]
    fn response_empty_list_is_valid() {
        let answer = json!({"homeworks": [], "current_date": 1000});
        assert!(check_response(&answer).unwrap().is_empty());
    }

    #[test]
    fn response_returns_all_entries() {
        let answer = json!({"homeworks": [{"status": "approved"}, {"status": "rejected"}]});
        assert_eq!(check_response(&answer).unwrap().len(), 2);
    }

    // ── current_date ───────────────────────────────────────────────

    #[test]
    fn current_date_present() {
        assert_eq!(current_date(&json!({"current_date": 1000})), Some(1000));
    }

    #[test]
    fn current_date_missing_or_not_integer() {
        assert_eq!(current_date(&json!({"homeworks": []})), None);
        assert_eq!(current_date(&json!({"current_date": "1000"})), None);
        assert_eq!(current_date(&json!({"current_date": 10.5})), None);
    }

    // ── parse_status ───────────────────────────────────────────────

    #[test]
    fn status_approved_message() {
        let hw = json!({"status": "approved", "homework_name": "proj1"});
        assert_eq!(parse_status(&hw).unwrap(), APPROVED_PROJ1);
    }

    #[test]
    fn every_known_status_contains_name_and_verdict() {
        for status in [
            HomeworkStatus::Approved,
            HomeworkStatus::Reviewing,
            HomeworkStatus::Rejected,
        ] {
            let hw = json!({"status": status.as_str(), "homework_name": "user__hw05.zip"});
            let message = parse_status(&hw).unwrap();
            assert!(message.contains("\"user__hw05.zip\""), "{message}");
            assert!(message.ends_with(status.verdict()), "{message}");
        }
    }

    #[test]
    fn status_unknown_code() {
        let hw = json!({"status": "unknown_code", "homework_name": "x"});
        let err = parse_status(&hw).unwrap_err();
        assert!(matches!(err, BotError::UnexpectedStatus(ref s) if s == "unknown_code"));
    }

    #[test]
    fn status_missing_status_field() {
        let err = parse_status(&json!({"homework_name": "x"})).unwrap_err();
        assert!(matches!(err, BotError::MissingField("status")));
    }

    #[test]
    fn status_missing_name_field() {
        let err = parse_status(&json!({"status": "approved"})).unwrap_err();
        assert!(matches!(err, BotError::MissingField("homework_name")));
    }

    #[test]
    fn status_checked_before_name() {
        let err = parse_status(&json!({})).unwrap_err();
        assert!(matches!(err, BotError::MissingField("status")));
    }

    #[test]
    fn status_not_a_string_is_unexpected_status() {
        let err = parse_status(&json!({"status": 5, "homework_name": "x"})).unwrap_err();
        assert!(matches!(err, BotError::UnexpectedStatus(ref s) if s == "5"));
        let err = parse_status(&json!({"status": null, "homework_name": "x"})).unwrap_err();
        assert!(matches!(err, BotError::UnexpectedStatus(ref s) if s == "null"));
    }

    #[test]
    fn name_not_a_string_is_not_reported_missing() {
        let err = parse_status(&json!({"status": "approved", "homework_name": 7})).unwrap_err();
        assert!(matches!(err, BotError::FieldNotString("homework_name")));
        assert!(!err.to_string().contains("Нет ключа"), "{err}");
    }

    #[test]
    fn parse_homework_fields() {
        let hw = json!({"status": "reviewing", "homework_name": "proj2", "id": 7});
        let parsed = parse_homework(&hw).unwrap();
        assert_eq!(parsed.name, "proj2");
        assert_eq!(parsed.status, HomeworkStatus::Reviewing);
    }

    // ── latest_message ─────────────────────────────────────────────

    #[test]
    fn latest_message_uses_first_entry_only() {
        let answer = json!({
            "homeworks": [
                {"status": "approved", "homework_name": "proj1"},
                {"status": "bogus", "homework_name": "ignored"}
            ],
            "current_date": 1000
        });
        assert_eq!(latest_message(&answer).unwrap().as_deref(), Some(APPROVED_PROJ1));
    }

    #[test]
    fn latest_message_empty_list() {
        let answer = json!({"homeworks": [], "current_date": 1000});
        assert_eq!(latest_message(&answer).unwrap(), None);
    }

    #[test]
    fn latest_message_propagates_shape_errors() {
        let err = latest_message(&json!({"homework": []})).unwrap_err();
        assert!(matches!(err, BotError::MissingKey("homeworks")));
    }
}
