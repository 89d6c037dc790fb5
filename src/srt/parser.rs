use crate::error::{Error, Result};
use crate::logging::log_debug;
use crate::srt::models::{Segment, SegmentTrack, UNKNOWN_SEQUENCE};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Строка с временными метками целиком: `HH:MM:SS,mmm --> HH:MM:SS,mmm`
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2}),([0-9]{3})\s*-->\s*([0-9]{2}):([0-9]{2}):([0-9]{2}),([0-9]{3})$")
        .expect("timestamp regex is valid")
});

/// Разделитель блоков: одна или несколько пустых строк
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\n+").expect("block separator regex is valid"));

/// Любой тег разметки (`<i>`, `</font>`, ...)
static MARKUP_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<.*?>").expect("markup regex is valid"));

const TIMESTAMP_SEPARATOR: &str = "-->";
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Парсер SRT файлов
pub struct SrtParser;

impl SrtParser {
    /// Парсит SRT файл и возвращает последовательность субтитров
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SegmentTrack> {
        let file = File::open(path).map_err(Error::Io)?;
        Self::parse_reader(BufReader::new(file))
    }

    /// Парсит SRT из любого источника, реализующего Read.
    /// Ошибкой считается только невозможность прочитать источник.
    pub fn parse_reader<R: Read>(mut reader: R) -> Result<SegmentTrack> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(Error::Io)?;
        Ok(Self::parse_bytes(&bytes))
    }

    /// Декодирует байты как UTF-8 (с заменой невалидных последовательностей)
    /// и парсит результат
    pub fn parse_bytes(bytes: &[u8]) -> SegmentTrack {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        Self::parse_str(&String::from_utf8_lossy(bytes))
    }

    /// Парсит SRT из строки. Никогда не завершается ошибкой:
    /// некорректные блоки пропускаются.
    pub fn parse_str(content: &str) -> SegmentTrack {
        let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

        let mut segments = Vec::new();
        let mut skipped = 0usize;

        for block in BLOCK_SEPARATOR_REGEX.split(normalized.trim()) {
            if block.trim().is_empty() {
                continue;
            }

            match Self::parse_block(block) {
                Some(segment) => segments.push(segment),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            log_debug(&format!("Пропущено некорректных блоков SRT: {}", skipped));
        }

        let track = SegmentTrack::from_segments(segments);
        log_debug(&format!(
            "Распознано субтитров: {}, длительность: {} мс",
            track.len(),
            track.duration_ms()
        ));

        track
    }

    /// Разбирает один блок. `None` означает, что блок отброшен.
    fn parse_block(block: &str) -> Option<Segment> {
        let lines: Vec<&str> = block.split('\n').collect();

        let timestamp_index = lines.iter().position(|l| l.contains(TIMESTAMP_SEPARATOR))?;
        let captures = TIMESTAMP_REGEX.captures(lines[timestamp_index])?;

        let sequence_number = timestamp_index
            .checked_sub(1)
            .and_then(|i| lines[i].trim().parse::<i32>().ok())
            .unwrap_or(UNKNOWN_SEQUENCE);

        let joined = lines[timestamp_index + 1..].join("\n");
        let text = MARKUP_TAG_REGEX.replace_all(&joined, "").trim().to_string();
        if text.is_empty() {
            return None;
        }

        let start_ms = Self::parse_timestamp(&captures, 1)?;
        let end_ms = Self::parse_timestamp(&captures, 5)?;
        // Интервал, который заканчивается раньше начала, никогда не станет активным
        if end_ms < start_ms {
            return None;
        }

        Some(Segment::new(sequence_number, start_ms, end_ms, text))
    }

    /// Собирает время в миллисекундах из четырех групп, начиная с `first`.
    /// Компоненты не проверяются на диапазон: `00:75:00,000` дает 75 минут.
    fn parse_timestamp(captures: &Captures<'_>, first: usize) -> Option<u64> {
        let component = |offset: usize| -> Option<u64> {
            captures.get(first + offset)?.as_str().parse::<u64>().ok()
        };

        Some(to_milliseconds(
            component(0)?,
            component(1)?,
            component(2)?,
            component(3)?,
        ))
    }
}

/// `h*3600000 + m*60000 + s*1000 + ms`
pub fn to_milliseconds(hours: u64, minutes: u64, seconds: u64, milliseconds: u64) -> u64 {
    hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + milliseconds
}
