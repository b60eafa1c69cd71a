//! Error kinds surfaced by the bot.
//!
//! `Display` output is embedded into the failure notification sent to the
//! user, so the messages are written in the same language as the verdicts.

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Отсутствуют обязательные переменные окружения: {}", .0.join(", "))]
    MissingTokens(Vec<&'static str>),

    #[error("Нет доступа к эндпоинту {endpoint}: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("Эндпоинт {endpoint} вернул статус {status}")]
    BadStatus { endpoint: String, status: u16 },

    #[error("Ответ API не является корректным JSON: {0}")]
    Decode(String),

    #[error("Ответ API не является словарём")]
    ResponseNotObject,

    #[error("Отсутствует ключ \"{0}\" в ответе API")]
    MissingKey(&'static str),

    #[error("Под ключом \"{0}\" находится не список")]
    NotAList(&'static str),

    #[error("Домашняя работа не является словарём")]
    HomeworkNotObject,

    #[error("Нет ключа \"{0}\" у домашней работы")]
    MissingField(&'static str),

    #[error("Поле \"{0}\" у домашней работы не является строкой")]
    FieldNotString(&'static str),

    #[error("Неожиданный статус домашней работы: {0}")]
    UnexpectedStatus(String),

    #[error("Ошибка отправки сообщения: {0}")]
    SendFailed(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
