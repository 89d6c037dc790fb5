use std::path::Path;

/// Имя, которое показывается, если имя файла определить не удалось
pub const UNKNOWN_FILE_NAME: &str = "Unknown";

/// Форматирует позицию для отображения: `mm:ss`, либо `h:mm:ss` от часа и больше
pub fn format_clock(time_ms: u64) -> String {
    let total_seconds = time_ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Оставшееся время со знаком минус: `-mm:ss`
pub fn format_remaining(position_ms: u64, duration_ms: u64) -> String {
    format!("-{}", format_clock(duration_ms.saturating_sub(position_ms)))
}

/// Форматирует время в виде SRT метки `HH:MM:SS,mmm`
pub fn format_timestamp(time_ms: u64) -> String {
    let hours = time_ms / 3_600_000;
    let minutes = (time_ms % 3_600_000) / 60_000;
    let seconds = (time_ms % 60_000) / 1000;
    let millis = time_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Имя файла для заголовка: последний компонент пути
pub fn display_name<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_FILE_NAME.to_string())
}
