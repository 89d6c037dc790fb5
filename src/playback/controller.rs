use crate::events::FrameNotifier;
use crate::logging::{log_debug, log_trace};
use crate::playback::clock::{Clock, MonotonicClock};
use crate::playback::frame::{PlaybackStatus, RenderFrame};
use crate::playback::resolver::SegmentResolver;
use crate::srt::{Segment, SegmentTrack};

/// Опорная пара, зафиксированная в момент запуска воспроизведения
#[derive(Debug, Clone, Copy)]
struct PlayAnchor {
    /// Позиция на шкале в момент запуска
    start_position_ms: u64,
    /// Показание часов в момент запуска
    start_wall_ms: u64,
    /// Идентификатор сеанса воспроизведения
    session: u64,
}

/// Виртуальные часы воспроизведения поверх последовательности субтитров.
///
/// Позиция во время воспроизведения каждый раз вычисляется заново из
/// опорной пары `(позиция, время часов)`, а не накапливается шагами,
/// поэтому не дрейфует при неравномерных тиках.
/// Все операции тотальны: выход за границы шкалы обрезается.
pub struct PlaybackController<C: Clock = MonotonicClock> {
    resolver: SegmentResolver,
    clock: C,
    position_ms: u64,
    anchor: Option<PlayAnchor>,
    next_session: u64,
    /// `Some(было ли воспроизведение)` пока пользователь тянет ползунок
    scrub_resume: Option<bool>,
    notifier: FrameNotifier,
}

impl PlaybackController<MonotonicClock> {
    /// Создает контроллер с системными монотонными часами
    pub fn with_system_clock() -> Self {
        Self::new(MonotonicClock::new())
    }
}

impl<C: Clock> PlaybackController<C> {
    /// Создает пустой контроллер на паузе в позиции 0
    pub fn new(clock: C) -> Self {
        Self {
            resolver: SegmentResolver::default(),
            clock,
            position_ms: 0,
            anchor: None,
            next_session: 0,
            scrub_resume: None,
            notifier: FrameNotifier::new(),
        }
    }

    /// Устанавливает уведомитель, получающий кадр после каждого изменения
    pub fn with_notifier(mut self, notifier: FrameNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Заменяет уведомитель
    pub fn set_notifier(&mut self, notifier: FrameNotifier) {
        self.notifier = notifier;
    }

    pub fn notifier(&self) -> &FrameNotifier {
        &self.notifier
    }

    /// Заменяет последовательность целиком: позиция 0, пауза,
    /// память о последнем показанном субтитре сброшена
    pub fn load_segments(&mut self, track: SegmentTrack) {
        log_debug(&format!(
            "Загрузка субтитров: {} шт., длительность {} мс",
            track.len(),
            track.duration_ms()
        ));

        self.anchor = None;
        self.scrub_resume = None;
        self.resolver.load(track);
        self.set_position(0);
        self.publish();
    }

    /// Запускает воспроизведение. Возвращает `false`, если позиция уже
    /// в конце шкалы и запускать нечего.
    pub fn play(&mut self) -> bool {
        if self.anchor.is_some() {
            return true;
        }
        if self.position_ms >= self.duration_ms() {
            log_debug("Воспроизведение не запущено: достигнут конец шкалы");
            return false;
        }

        let session = self.next_session;
        self.next_session += 1;
        self.anchor = Some(PlayAnchor {
            start_position_ms: self.position_ms,
            start_wall_ms: self.clock.now_ms(),
            session,
        });

        log_debug(&format!(
            "Воспроизведение запущено с позиции {} мс (сеанс {})",
            self.position_ms, session
        ));
        self.publish();
        true
    }

    /// Останавливает воспроизведение, зафиксировав прошедшее время
    pub fn pause(&mut self) {
        if self.stop() {
            self.publish();
        }
    }

    /// Переключает воспроизведение. Возвращает новое значение `is_playing`.
    pub fn toggle(&mut self) -> bool {
        if self.is_playing() {
            self.pause();
            false
        } else {
            self.play()
        }
    }

    /// Один тик часов. Пересчитывает позицию из опорной пары и сам
    /// ставит паузу в конце шкалы. Возвращает, продолжается ли воспроизведение.
    pub fn tick(&mut self) -> bool {
        let Some(anchor) = self.anchor else {
            return false;
        };

        let position = self.anchored_position(anchor);
        self.set_position(position);
        log_trace(&format!("Тик: позиция {} мс", position));

        if position >= self.duration_ms() {
            self.anchor = None;
            log_debug("Достигнут конец шкалы, воспроизведение остановлено");
        }

        self.publish();
        self.anchor.is_some()
    }

    /// Сдвигает позицию на `offset_ms` (может быть отрицательным) и ставит паузу
    pub fn seek(&mut self, offset_ms: i64) {
        self.stop();
        self.scrub_resume = None;
        let target = i128::from(self.position_ms) + i128::from(offset_ms);
        let position = self.clamp(target);
        self.set_position(position);
        log_debug(&format!("Перемотка на {} мс -> {} мс", offset_ms, position));
        self.publish();
    }

    /// Устанавливает абсолютную позицию и ставит паузу
    pub fn seek_absolute(&mut self, time_ms: i64) {
        self.stop();
        self.scrub_resume = None;
        let position = self.clamp(i128::from(time_ms));
        self.set_position(position);
        log_debug(&format!("Переход к позиции {} мс", position));
        self.publish();
    }

    /// Начало перетаскивания ползунка: тики останавливаются, но запоминается,
    /// шло ли воспроизведение
    pub fn begin_scrub(&mut self) {
        if self.scrub_resume.is_none() {
            let was_playing = self.is_playing();
            self.scrub_resume = Some(was_playing);
        }
        if self.stop() {
            self.publish();
        }
    }

    /// Перемещение ползунка
    pub fn scrub_to(&mut self, time_ms: u64) {
        if self.scrub_resume.is_none() {
            self.begin_scrub();
        }
        self.stop();
        let position = self.clamp(i128::from(time_ms));
        self.set_position(position);
        self.publish();
    }

    /// Конец перетаскивания: воспроизведение продолжается, если шло до него
    pub fn end_scrub(&mut self) {
        if self.scrub_resume.take() == Some(true) {
            self.play();
        }
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrub_resume.is_some()
    }

    /// Выбор субтитра пользователем (прокрутка ленты). Учитывается только
    /// на паузе; позиция переходит на начало субтитра.
    pub fn select_segment(&mut self, index: usize) -> bool {
        if self.is_playing() {
            return false;
        }
        let Some(start_ms) = self.resolver.track().get(index).map(|s| s.start_ms) else {
            return false;
        };
        self.seek_absolute(i64::try_from(start_ms).unwrap_or(i64::MAX));
        true
    }

    /// Переход к следующему или предыдущему субтитру относительно центра (на паузе)
    pub fn step_segment(&mut self, forward: bool) -> bool {
        let target = match (self.resolver.center_index(), forward) {
            (Some(center), true) => Some(center + 1),
            (Some(center), false) => center.checked_sub(1),
            (None, true) => self.resolver.track().upcoming_index_after(self.position_ms),
            (None, false) => None,
        };
        target.map_or(false, |index| self.select_segment(index))
    }

    /// Активный субтитр для произвольного момента. Только поиск:
    /// позиция и память о последнем показанном субтитре не меняются.
    pub fn resolve_active(&self, time_ms: u64) -> Option<&Segment> {
        let track = self.resolver.track();
        track.active_index_at(time_ms).and_then(|i| track.get(i))
    }

    /// Соседи субтитра с индексом `index`
    pub fn resolve_neighbors(&self, index: usize) -> (Option<&Segment>, Option<&Segment>) {
        self.resolver.resolve_neighbors(index)
    }

    /// Кадр для отрисовки в текущем состоянии
    pub fn frame(&self) -> RenderFrame {
        let track = self.resolver.track();
        let (previous, next) = match self.resolver.center_index() {
            Some(center) => self.resolver.resolve_neighbors(center),
            None => (
                None,
                track
                    .upcoming_index_after(self.position_ms)
                    .and_then(|i| track.get(i)),
            ),
        };

        RenderFrame {
            active: self.resolver.active().cloned(),
            last_shown: self.resolver.last_shown().cloned(),
            previous: previous.cloned(),
            next: next.cloned(),
            position_ms: self.position_ms,
            duration_ms: self.duration_ms(),
            is_playing: self.is_playing(),
        }
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.resolver.duration_ms()
    }

    pub fn is_playing(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.is_playing() {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Paused
        }
    }

    /// Идентификатор текущего сеанса воспроизведения, если оно идет
    pub fn session(&self) -> Option<u64> {
        self.anchor.map(|a| a.session)
    }

    pub fn track(&self) -> &SegmentTrack {
        self.resolver.track()
    }

    pub fn resolver(&self) -> &SegmentResolver {
        &self.resolver
    }

    pub fn active(&self) -> Option<&Segment> {
        self.resolver.active()
    }

    pub fn last_shown(&self) -> Option<&Segment> {
        self.resolver.last_shown()
    }

    /// Снимает опорную пару, зафиксировав позицию. Возвращает, шло ли воспроизведение.
    fn stop(&mut self) -> bool {
        let Some(anchor) = self.anchor.take() else {
            return false;
        };
        let position = self.anchored_position(anchor);
        self.set_position(position);
        log_debug(&format!(
            "Воспроизведение остановлено на {} мс (сеанс {})",
            position, anchor.session
        ));
        true
    }

    fn anchored_position(&self, anchor: PlayAnchor) -> u64 {
        let elapsed = self.clock.now_ms().saturating_sub(anchor.start_wall_ms);
        anchor
            .start_position_ms
            .saturating_add(elapsed)
            .min(self.duration_ms())
    }

    fn clamp(&self, target: i128) -> u64 {
        target.clamp(0, i128::from(self.duration_ms())) as u64
    }

    fn set_position(&mut self, position_ms: u64) {
        self.position_ms = position_ms;
        self.resolver.resolve_active(position_ms);
    }

    fn publish(&self) {
        self.notifier.publish(self.frame());
    }
}
