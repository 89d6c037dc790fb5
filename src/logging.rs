use log::{debug, error, info, trace, warn, LevelFilter, Log};
use env_logger::Builder;
use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Простой логгер для тестов, печатает записи в stdout
#[derive(Clone)]
pub struct TestLogger {
    level: LevelFilter,
}

impl TestLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for TestLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            println!(
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Переменная окружения с дополнительными фильтрами логирования
pub const LOG_FILTER_ENV: &str = "RUST_LOG";

/// Собирает логгер: `level` задает базовый уровень, директивы из
/// `env_filters` (формат `RUST_LOG`) применяются поверх него
pub fn build_logger(level: LevelFilter, env_filters: Option<&str>) -> Builder {
    let mut builder = Builder::new();

    builder.filter_level(level);
    if let Some(filters) = env_filters.map(str::trim).filter(|f| !f.is_empty()) {
        builder.parse_filters(filters);
    }
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] {} - {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    builder
}

/// Настраивает логирование для библиотеки с учетом `RUST_LOG`
pub fn setup_logging(level: LevelFilter) {
    let env_filters = std::env::var(LOG_FILTER_ENV).ok();
    let logger = build_logger(level, env_filters.as_deref()).build();
    let max_level = logger.filter();

    // Повторная инициализация (например, второй плеер) не считается ошибкой
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(max_level);
    }

    info!(
        "Логирование настроено с уровнем: {} (фильтры {}: {})",
        level,
        LOG_FILTER_ENV,
        env_filters.as_deref().unwrap_or("-")
    );
}

/// Настраивает логирование для тестов
pub fn setup_test_logging(level: LevelFilter) {
    INIT.call_once(|| {
        let logger = TestLogger::new(level);
        if log::set_boxed_logger(Box::new(logger)).is_ok() {
            log::set_max_level(level);
        }
    });
}

/// Логирует ошибку и возвращает её
pub fn log_error<T, E: std::fmt::Display>(err: E, message: &str) -> Result<T, crate::error::Error> {
    let error_message = format!("{}: {}", message, err);
    error!("{}", error_message);
    Err(crate::error::Error::LoggedError(error_message))
}

/// Логирует предупреждение
pub fn log_warning(message: &str) {
    warn!("{}", message);
}

/// Логирует информационное сообщение
pub fn log_info(message: &str) {
    info!("{}", message);
}

/// Логирует отладочное сообщение
pub fn log_debug(message: &str) {
    debug!("{}", message);
}

/// Логирует трассировочное сообщение
pub fn log_trace(message: &str) {
    trace!("{}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_log_error_returns_logged_error() {
        let result: Result<(), Error> = log_error("disk on fire", "Не удалось прочитать файл");

        match result {
            Err(Error::LoggedError(msg)) => {
                assert_eq!(msg, "Не удалось прочитать файл: disk on fire");
            }
            other => panic!("Expected LoggedError, got {:?}", other),
        }
    }

    #[test]
    fn test_build_logger_uses_base_level() {
        assert_eq!(build_logger(LevelFilter::Warn, None).build().filter(), LevelFilter::Warn);
        assert_eq!(build_logger(LevelFilter::Debug, Some("   ")).build().filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_build_logger_applies_env_filters() {
        let logger = build_logger(LevelFilter::Info, Some("subroll::playback=trace")).build();
        assert_eq!(logger.filter(), LevelFilter::Trace);

        let playback = log::Metadata::builder()
            .level(log::Level::Trace)
            .target("subroll::playback::driver")
            .build();
        let parser = log::Metadata::builder()
            .level(log::Level::Debug)
            .target("subroll::srt::parser")
            .build();
        assert!(logger.enabled(&playback));
        assert!(!logger.enabled(&parser));
    }

    #[test]
    fn test_test_logger_respects_level() {
        let logger = TestLogger::new(LevelFilter::Info);
        let debug_meta = log::Metadata::builder().level(log::Level::Debug).build();
        let warn_meta = log::Metadata::builder().level(log::Level::Warn).build();

        assert!(!logger.enabled(&debug_meta));
        assert!(logger.enabled(&warn_meta));
    }
}
