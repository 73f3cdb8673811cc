use serde_json::Value;
use tracing::info;

use crate::error::{BotError, BotResult};

/// A payload that passed `check_response`, borrowing from the raw JSON.
#[derive(Debug, PartialEq)]
pub struct ValidResponse<'a> {
    /// Newest first, as the API orders them. May be empty.
    pub homeworks: &'a [Value],
    /// Server time to use as the next `from_date`.
    pub current_date: i64,
}

/// Check an API payload against the documented shape and pull out the
/// homework list and the server's `current_date`.
pub fn check_response(response: &Value) -> BotResult<ValidResponse<'_>> {
    let object = response.as_object().ok_or_else(|| {
        BotError::MalformedResponse(format!(
            "ожидался объект, получен {}",
            json_type(response)
        ))
    })?;

    let homeworks = object
        .get("homeworks")
        .ok_or(BotError::MissingField("homeworks"))?;
    let current_date = object
        .get("current_date")
        .ok_or(BotError::MissingField("current_date"))?;

    let homeworks = homeworks.as_array().ok_or_else(|| {
        BotError::MalformedResponse(format!(
            "homeworks должен быть списком, получен {}",
            json_type(homeworks)
        ))
    })?;

    let current_date = current_date.as_i64().ok_or_else(|| {
        BotError::MalformedResponse(format!(
            "current_date должен быть целым числом, получен {}",
            json_type(current_date)
        ))
    })?;

    info!(
        "API response matches the documented shape ({} homeworks)",
        homeworks.len()
    );

    Ok(ValidResponse {
        homeworks,
        current_date,
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
