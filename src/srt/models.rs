use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::time::format_timestamp;

/// Номер блока, который не удалось прочитать из файла
pub const UNKNOWN_SEQUENCE: i32 = -1;

/// Один субтитр: интервал времени и текст
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Порядковый номер из файла, либо `UNKNOWN_SEQUENCE`
    pub sequence_number: i32,
    /// Время начала в миллисекундах
    pub start_ms: u64,
    /// Время окончания в миллисекундах
    pub end_ms: u64,
    /// Текст субтитра без разметки
    pub text: String,
}

impl Segment {
    /// Создает новый субтитр
    pub fn new(sequence_number: i32, start_ms: u64, end_ms: u64, text: String) -> Self {
        Self {
            sequence_number,
            start_ms,
            end_ms,
            text,
        }
    }

    /// Номер из файла, если он был распознан
    pub fn sequence(&self) -> Option<i32> {
        (self.sequence_number != UNKNOWN_SEQUENCE).then_some(self.sequence_number)
    }

    /// Проверяет, попадает ли момент времени в интервал `[start_ms, end_ms]`
    pub fn is_active_at(&self, time_ms: u64) -> bool {
        self.start_ms <= time_ms && time_ms <= self.end_ms
    }

    /// Длительность субтитра в миллисекундах
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} --> {} {:?}",
            self.sequence_number,
            format_timestamp(self.start_ms),
            format_timestamp(self.end_ms),
            self.text
        )
    }
}

/// Упорядоченная по времени начала последовательность субтитров.
/// Сериализуется как список; при десериализации проходит через `from_segments`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Segment>", into = "Vec<Segment>")]
pub struct SegmentTrack {
    segments: Vec<Segment>,
}

impl SegmentTrack {
    /// Создает новую пустую последовательность
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Создает последовательность из произвольного набора субтитров.
    /// Субтитры с пустым текстом или с концом раньше начала отбрасываются,
    /// остальные сортируются по времени начала с сохранением исходного
    /// порядка при равенстве.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let mut track = Self {
            segments: segments
                .into_iter()
                .filter(|s| !s.text.is_empty() && s.start_ms <= s.end_ms)
                .collect(),
        };
        track.sort();
        track
    }

    /// Количество субтитров
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Проверяет, пуста ли последовательность
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Возвращает итератор по субтитрам
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Субтитр по индексу
    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Все субтитры в виде среза
    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    /// Общая длительность: время окончания последнего субтитра
    pub fn duration_ms(&self) -> u64 {
        self.segments.last().map_or(0, |s| s.end_ms)
    }

    /// Индекс первого субтитра, активного в момент `time_ms`.
    /// При пересечении интервалов побеждает первый в порядке сортировки.
    pub fn active_index_at(&self, time_ms: u64) -> Option<usize> {
        // Все кандидаты начинаются не позже time_ms и лежат в префиксе
        let candidates = self.segments.partition_point(|s| s.start_ms <= time_ms);
        self.segments[..candidates]
            .iter()
            .position(|s| s.end_ms >= time_ms)
    }

    /// Индекс первого субтитра, который начнется строго после `time_ms`
    pub fn upcoming_index_after(&self, time_ms: u64) -> Option<usize> {
        let index = self.segments.partition_point(|s| s.start_ms <= time_ms);
        (index < self.segments.len()).then_some(index)
    }

    fn sort(&mut self) {
        // sort_by_key стабилен
        self.segments.sort_by_key(|s| s.start_ms);
    }
}

impl From<Vec<Segment>> for SegmentTrack {
    fn from(segments: Vec<Segment>) -> Self {
        Self::from_segments(segments)
    }
}

impl From<SegmentTrack> for Vec<Segment> {
    fn from(track: SegmentTrack) -> Self {
        track.segments
    }
}

impl std::ops::Index<usize> for SegmentTrack {
    type Output = Segment;

    fn index(&self, index: usize) -> &Self::Output {
        &self.segments[index]
    }
}

impl<'a> IntoIterator for &'a SegmentTrack {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
