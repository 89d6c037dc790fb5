use crate::srt::{Segment, SegmentTrack};

/// Определяет активный субтитр и его соседей.
///
/// Помнит последний показанный субтитр: если момент времени попадает
/// в паузу между субтитрами, последний активный остается "последним
/// показанным" и служит центром для поиска соседей, пока не станет
/// активным новый субтитр или не будет загружена новая последовательность.
#[derive(Debug, Clone, Default)]
pub struct SegmentResolver {
    track: SegmentTrack,
    active_index: Option<usize>,
    last_shown_index: Option<usize>,
}

impl SegmentResolver {
    pub fn new(track: SegmentTrack) -> Self {
        Self {
            track,
            active_index: None,
            last_shown_index: None,
        }
    }

    /// Заменяет последовательность и сбрасывает память о показанном субтитре
    pub fn load(&mut self, track: SegmentTrack) {
        self.track = track;
        self.active_index = None;
        self.last_shown_index = None;
    }

    pub fn track(&self) -> &SegmentTrack {
        &self.track
    }

    pub fn duration_ms(&self) -> u64 {
        self.track.duration_ms()
    }

    /// Возвращает первый субтитр, содержащий `time_ms`, и обновляет
    /// память о последнем показанном субтитре
    pub fn resolve_active(&mut self, time_ms: u64) -> Option<&Segment> {
        self.active_index = self.track.active_index_at(time_ms);
        if self.active_index.is_some() {
            self.last_shown_index = self.active_index;
        }
        self.active_index.and_then(|i| self.track.get(i))
    }

    /// Соседи субтитра с указанным индексом: (предыдущий, следующий)
    pub fn resolve_neighbors(&self, index: usize) -> (Option<&Segment>, Option<&Segment>) {
        if index >= self.track.len() {
            return (None, None);
        }
        let previous = index.checked_sub(1).and_then(|i| self.track.get(i));
        let next = self.track.get(index + 1);
        (previous, next)
    }

    /// Активный субтитр по результату последнего `resolve_active`
    pub fn active(&self) -> Option<&Segment> {
        self.active_index.and_then(|i| self.track.get(i))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// Последний субтитр, который был активным
    pub fn last_shown(&self) -> Option<&Segment> {
        self.last_shown_index.and_then(|i| self.track.get(i))
    }

    pub fn last_shown_index(&self) -> Option<usize> {
        self.last_shown_index
    }

    /// Индекс, относительно которого считаются соседи:
    /// активный субтитр, а в паузе между субтитрами последний показанный
    pub fn center_index(&self) -> Option<usize> {
        self.active_index.or(self.last_shown_index)
    }
}
