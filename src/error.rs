use thiserror::Error;

/// Типы ошибок, которые могут возникнуть при работе с субтитрами
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// Ошибка ввода/вывода
    Io,
    /// Ошибка воспроизведения
    Playback,
    /// Неверные параметры
    InvalidParameters,
    /// Ошибка, уже записанная в лог
    Logged,
}

/// Ошибки, которые могут возникнуть при загрузке и воспроизведении субтитров.
///
/// Некорректные данные в файле ошибкой не считаются: такие блоки
/// парсер просто пропускает.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Ошибка ввода/вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка воспроизведения: {0}")]
    Playback(String),

    #[error("Неверные параметры: {0}")]
    InvalidParameters(String),

    #[error("{0}")]
    LoggedError(String),
}

impl Error {
    /// Создает новую ошибку указанного типа с сообщением
    pub fn new(error_type: ErrorType, message: &str) -> Self {
        match error_type {
            ErrorType::Io => Self::Io(std::io::Error::new(std::io::ErrorKind::Other, message)),
            ErrorType::Playback => Self::Playback(message.to_string()),
            ErrorType::InvalidParameters => Self::InvalidParameters(message.to_string()),
            ErrorType::Logged => Self::LoggedError(message.to_string()),
        }
    }

    /// Возвращает тип ошибки
    pub fn error_type(&self) -> ErrorType {
        match self {
            Self::Io(_) => ErrorType::Io,
            Self::Playback(_) => ErrorType::Playback,
            Self::InvalidParameters(_) => ErrorType::InvalidParameters,
            Self::LoggedError(_) => ErrorType::Logged,
        }
    }

    /// Логирует ошибку
    pub fn log(&self) {
        crate::logging::log_error::<(), _>(self, "Произошла ошибка").ok();
    }
}

/// Результат с обработкой ошибок
pub type Result<T> = std::result::Result<T, Error>;
