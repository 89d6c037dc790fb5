//! Поиск по тексту субтитров.
//!
//! Хранит запрос, найденные индексы и текущий результат; переходы
//! по результатам зациклены. Отрисовка строки поиска сюда не входит.

use crate::logging::log_debug;
use crate::srt::SegmentTrack;

/// Состояние поиска по загруженной последовательности
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleSearch {
    query: String,
    results: Vec<usize>,
    current: usize,
}

impl SubtitleSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Устанавливает запрос и пересчитывает результаты.
    /// Сравнение без учета регистра; пустой запрос очищает результаты.
    pub fn set_query(&mut self, track: &SegmentTrack, query: &str) -> usize {
        self.query = query.to_string();
        self.current = 0;

        let needle = query.trim().to_lowercase();
        self.results = if needle.is_empty() {
            Vec::new()
        } else {
            track
                .iter()
                .enumerate()
                .filter(|(_, s)| s.text.to_lowercase().contains(&needle))
                .map(|(i, _)| i)
                .collect()
        };

        log_debug(&format!(
            "Поиск {:?}: найдено {} совпадений",
            query,
            self.results.len()
        ));
        self.results.len()
    }

    /// Сбрасывает поиск
    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.current = 0;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Индексы найденных субтитров в порядке последовательности
    pub fn results(&self) -> &[usize] {
        &self.results
    }

    /// Индекс субтитра для текущего результата
    pub fn current(&self) -> Option<usize> {
        self.results.get(self.current).copied()
    }

    /// Переходит к следующему результату (после последнего идет первый)
    pub fn next(&mut self) -> Option<usize> {
        if self.results.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.results.len();
        self.current()
    }

    /// Переходит к предыдущему результату (перед первым идет последний)
    pub fn previous(&mut self) -> Option<usize> {
        if self.results.is_empty() {
            return None;
        }
        self.current = self
            .current
            .checked_sub(1)
            .unwrap_or(self.results.len() - 1);
        self.current()
    }

    /// Счетчик для строки поиска: (текущий, всего)
    pub fn counter(&self) -> (usize, usize) {
        (self.current, self.results.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srt::Segment;

    fn track() -> SegmentTrack {
        SegmentTrack::from_segments(
            ["Hello there", "General Kenobi", "hello again", "bye"]
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let start = i as u64 * 1000;
                    Segment::new(i as i32 + 1, start, start + 500, t.to_string())
                })
                .collect(),
        )
    }

    #[test]
    fn test_case_insensitive_match() {
        let mut search = SubtitleSearch::new();
        assert_eq!(search.set_query(&track(), "HELLO"), 2);
        assert_eq!(search.results(), &[0, 2]);
        assert_eq!(search.current(), Some(0));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut search = SubtitleSearch::new();
        search.set_query(&track(), "hello");

        assert_eq!(search.next(), Some(2));
        assert_eq!(search.next(), Some(0));
        assert_eq!(search.previous(), Some(2));
        assert_eq!(search.counter(), (1, 2));
    }

    #[test]
    fn test_blank_query_and_no_matches() {
        let mut search = SubtitleSearch::new();
        assert_eq!(search.set_query(&track(), "   "), 0);
        assert_eq!(search.next(), None);
        assert_eq!(search.previous(), None);
        assert_eq!(search.current(), None);

        assert_eq!(search.set_query(&track(), "nothing"), 0);
        assert_eq!(search.counter(), (0, 0));

        search.set_query(&track(), "bye");
        search.clear();
        assert_eq!(search.query(), "");
        assert!(search.results().is_empty());
    }
}
