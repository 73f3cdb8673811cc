use thiserror::Error;

/// Every failure the bot can run into.
///
/// Display texts end up in the chat as failure notifications, so they are
/// written for the student reading them.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Ошибка при запросе к основному API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API домашки возвращает код {0}, отличный от 200")]
    UnexpectedStatusCode(u16),

    #[error("Пользователь не авторизован, возможно введен неверный токен")]
    Authentication,

    #[error("Ответ API не соответствует документации: {0}")]
    MalformedResponse(String),

    #[error("В ответе нет данных {0}")]
    MissingField(&'static str),

    #[error("В списке вердиктов отсутствует полученный статус: {0}")]
    UnknownStatus(String),

    #[error("Сбой при отправке сообщения в Telegram: {0}")]
    Delivery(String),

    #[error("Отсутствуют обязательные переменные окружения: {}", .0.join(", "))]
    ConfigurationMissing(Vec<&'static str>),
}

pub type BotResult<T> = std::result::Result<T, BotError>;
