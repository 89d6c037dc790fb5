use serde::{Deserialize, Serialize};

use crate::srt::Segment;

/// Состояние воспроизведения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    Paused,
    Playing,
}

/// Все, что нужно для отрисовки одного кадра "ленты" субтитров
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Субтитр, активный в текущей позиции
    pub active: Option<Segment>,
    /// Последний активный субтитр; в паузах показывается приглушенно
    pub last_shown: Option<Segment>,
    pub previous: Option<Segment>,
    pub next: Option<Segment>,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub is_playing: bool,
}

impl RenderFrame {
    /// Субтитр для центральной строки: активный, иначе последний показанный
    pub fn center(&self) -> Option<&Segment> {
        self.active.as_ref().or(self.last_shown.as_ref())
    }

    /// Показывается ли в центре устаревший субтитр
    pub fn is_stale(&self) -> bool {
        self.active.is_none() && self.last_shown.is_some()
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.is_playing {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Paused
        }
    }
}
