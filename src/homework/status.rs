use serde_json::Value;
use tracing::info;

use crate::error::{BotError, BotResult};
use crate::homework::verdicts::HomeworkStatus;

/// Turn one homework record into the chat notification for its status.
pub fn parse_status(homework: &Value) -> BotResult<String> {
    let name = homework
        .get("homework_name")
        .ok_or(BotError::MissingField("homework_name"))?;
    let status = homework
        .get("status")
        .ok_or(BotError::MissingField("status"))?;

    let name = match name {
        Value::String(s) => s.as_str(),
        _ => {
            return Err(BotError::MalformedResponse(
                "homework_name должен быть строкой".to_string(),
            ))
        }
    };

    let status = match status {
        Value::String(s) => s
            .parse::<HomeworkStatus>()
            .map_err(|_| BotError::UnknownStatus(s.clone()))?,
        other => return Err(BotError::UnknownStatus(other.to_string())),
    };

    info!("Homework '{}' has status '{}'", name, status);

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}
