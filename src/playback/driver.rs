use crate::error::{Error, Result};
use crate::logging::{log_debug, log_trace};
use crate::playback::clock::{Clock, TokioClock};
use crate::playback::controller::PlaybackController;
use crate::playback::frame::RenderFrame;
use crate::srt::SegmentTrack;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Интервал тиков по умолчанию (~60 кадров в секунду)
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Периодически продвигает контроллер, пока идет воспроизведение.
///
/// Один фоновый таск tokio на сеанс воспроизведения. Тик применяется
/// только если сеанс еще актуален, и проверка делается под тем же
/// мьютексом, что и `pause`/`seek`: после их возврата ни один устаревший
/// тик уже не изменит позицию.
///
/// Кадры публикуются под тем же мьютексом, поэтому подписчик
/// (`FrameCallback`) не должен вызывать методы драйвера.
pub struct PlaybackDriver<C: Clock + 'static = TokioClock> {
    controller: Arc<Mutex<PlaybackController<C>>>,
    tick_interval: Duration,
    task: Option<JoinHandle<()>>,
    /// Сеанс, для которого запущен текущий таск
    task_session: Option<u64>,
}

impl PlaybackDriver<TokioClock> {
    /// Создает драйвер с часами tokio
    pub fn with_tokio_clock(tick_interval: Duration) -> Self {
        Self::new(PlaybackController::new(TokioClock::new()), tick_interval)
    }
}

impl<C: Clock + 'static> PlaybackDriver<C> {
    pub fn new(controller: PlaybackController<C>, tick_interval: Duration) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            // tokio::time::interval не принимает нулевой период
            tick_interval: tick_interval.max(Duration::from_millis(1)),
            task: None,
            task_session: None,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Заменяет последовательность; воспроизведение останавливается
    pub fn load_segments(&mut self, track: SegmentTrack) {
        self.lock().load_segments(track);
        self.cancel_task();
    }

    /// Запускает воспроизведение и цикл тиков.
    /// Должен вызываться внутри рантайма tokio.
    pub fn play(&mut self) -> Result<bool> {
        let handle = Handle::try_current().map_err(|e| {
            Error::Playback(format!("Нет активного рантайма tokio: {}", e))
        })?;

        let session = {
            let mut controller = self.lock();
            if !controller.play() {
                return Ok(false);
            }
            controller.session()
        };
        let Some(session) = session else {
            return Ok(false);
        };

        if self.task_session == Some(session) && !self.is_idle() {
            return Ok(true);
        }

        self.cancel_task();
        self.task = Some(handle.spawn(Self::tick_loop(
            Arc::clone(&self.controller),
            self.tick_interval,
            session,
        )));
        self.task_session = Some(session);
        log_debug(&format!(
            "Цикл тиков запущен: сеанс {}, интервал {:?}",
            session, self.tick_interval
        ));
        Ok(true)
    }

    /// Останавливает воспроизведение; цикл тиков снимается до возврата
    pub fn pause(&mut self) {
        self.lock().pause();
        self.cancel_task();
    }

    /// Переключает воспроизведение
    pub fn toggle(&mut self) -> Result<bool> {
        if self.is_playing() {
            self.pause();
            Ok(false)
        } else {
            self.play()
        }
    }

    /// Относительная перемотка, останавливает воспроизведение
    pub fn seek(&mut self, offset_ms: i64) {
        self.lock().seek(offset_ms);
        self.cancel_task();
    }

    /// Абсолютная перемотка, останавливает воспроизведение
    pub fn seek_absolute(&mut self, time_ms: i64) {
        self.lock().seek_absolute(time_ms);
        self.cancel_task();
    }

    pub fn begin_scrub(&mut self) {
        self.lock().begin_scrub();
        self.cancel_task();
    }

    pub fn scrub_to(&mut self, time_ms: u64) {
        self.lock().scrub_to(time_ms);
        self.cancel_task();
    }

    /// Завершает перетаскивание и при необходимости возобновляет тики.
    /// Возвращает, идет ли воспроизведение после этого.
    pub fn end_scrub(&mut self) -> Result<bool> {
        let resumed = {
            let mut controller = self.lock();
            controller.end_scrub();
            controller.is_playing()
        };
        if !resumed {
            return Ok(false);
        }

        match self.play() {
            Ok(playing) => Ok(playing),
            Err(e) => {
                self.lock().pause();
                Err(e)
            }
        }
    }

    pub fn select_segment(&mut self, index: usize) -> bool {
        self.lock().select_segment(index)
    }

    pub fn step_segment(&mut self, forward: bool) -> bool {
        self.lock().step_segment(forward)
    }

    pub fn is_playing(&self) -> bool {
        self.lock().is_playing()
    }

    pub fn position_ms(&self) -> u64 {
        self.lock().position_ms()
    }

    pub fn duration_ms(&self) -> u64 {
        self.lock().duration_ms()
    }

    pub fn frame(&self) -> RenderFrame {
        self.lock().frame()
    }

    /// Выполняет замыкание с доступом к контроллеру
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut PlaybackController<C>) -> R) -> R {
        let mut controller = self.lock();
        f(&mut *controller)
    }

    /// Завершился ли цикл тиков (или не запускался)
    pub fn is_idle(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }

    async fn tick_loop(
        controller: Arc<Mutex<PlaybackController<C>>>,
        tick_interval: Duration,
        session: u64,
    ) {
        let mut interval = tokio::time::interval(tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Первый тик interval срабатывает сразу
        interval.tick().await;

        loop {
            interval.tick().await;

            let mut guard = controller.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.session() != Some(session) {
                log_trace(&format!("Сеанс {} устарел, цикл тиков завершен", session));
                break;
            }
            if !guard.tick() {
                log_debug(&format!("Сеанс {} завершен", session));
                break;
            }
        }
    }

    fn cancel_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.task_session = None;
    }

    fn lock(&self) -> MutexGuard<'_, PlaybackController<C>> {
        self.controller.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock + 'static> Drop for PlaybackDriver<C> {
    fn drop(&mut self) {
        self.cancel_task();
    }
}
