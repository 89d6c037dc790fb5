pub mod error;
pub mod events;
pub mod logging;
pub mod playback;
pub mod search;
pub mod srt;
pub mod utils;

pub use error::{Error, ErrorType, Result};
pub use events::{FrameCallback, FrameNotifier};
pub use logging::{
    setup_logging, setup_test_logging, log_error, log_warning, log_info, log_debug, log_trace
};
pub use playback::{
    Clock, ManualClock, MonotonicClock, TokioClock,
    PlaybackController, PlaybackDriver, PlaybackStatus, RenderFrame, SegmentResolver
};
pub use search::SubtitleSearch;
pub use srt::{Segment, SegmentTrack, SrtParser};

use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Настройки плеера субтитров
#[derive(Debug, Clone)]
pub struct PlayerOptions {
    /// Интервал тиков во время воспроизведения, мс
    pub tick_interval_ms: u64,

    /// Шаг короткой перемотки, мс
    pub seek_step_ms: u64,

    /// Шаг длинной перемотки, мс
    pub long_seek_step_ms: u64,

    /// Уровень логирования
    pub log_level: log::LevelFilter,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            tick_interval_ms: playback::DEFAULT_TICK_INTERVAL.as_millis() as u64,
            seek_step_ms: 1000,
            long_seek_step_ms: 5000,
            log_level: log::LevelFilter::Info,
        }
    }
}

impl PlayerOptions {
    /// Проверяет настройки
    pub fn validate(&self) -> Result<()> {
        if !(1..=1000).contains(&self.tick_interval_ms) {
            return Err(Error::InvalidParameters(format!(
                "tick_interval_ms должен быть в диапазоне 1..=1000, получено {}",
                self.tick_interval_ms
            )));
        }
        if self.seek_step_ms == 0 || self.long_seek_step_ms == 0 {
            return Err(Error::InvalidParameters(
                "Шаг перемотки должен быть больше нуля".to_string(),
            ));
        }
        Ok(())
    }

    /// Устанавливает интервал тиков
    pub fn with_tick_interval(mut self, tick_interval_ms: u64) -> Self {
        self.tick_interval_ms = tick_interval_ms;
        self
    }

    /// Устанавливает шаги перемотки
    pub fn with_seek_steps(mut self, seek_step_ms: u64, long_seek_step_ms: u64) -> Self {
        self.seek_step_ms = seek_step_ms;
        self.long_seek_step_ms = long_seek_step_ms;
        self
    }

    /// Устанавливает уровень логирования
    pub fn with_log_level(mut self, log_level: log::LevelFilter) -> Self {
        self.log_level = log_level;
        self
    }
}

/// Основной интерфейс: загрузка файла, воспроизведение, поиск.
///
/// Методы воспроизведения должны вызываться внутри рантайма tokio.
pub struct SubtitlePlayer {
    options: PlayerOptions,
    driver: PlaybackDriver<TokioClock>,
    notifier: FrameNotifier,
    search: SubtitleSearch,
    file_name: Option<String>,
    error_message: Option<String>,
}

impl SubtitlePlayer {
    /// Создает новый плеер с заданными настройками
    pub fn new(options: PlayerOptions) -> Result<Self> {
        options.validate()?;

        #[cfg(test)]
        {
            setup_test_logging(options.log_level);
        }
        #[cfg(not(test))]
        {
            setup_logging(options.log_level);
        }

        log_info(&format!("Создан плеер субтитров с настройками: {:?}", options));

        let notifier = FrameNotifier::new();
        let controller = PlaybackController::new(TokioClock::new()).with_notifier(notifier.clone());
        let driver = PlaybackDriver::new(controller, Duration::from_millis(options.tick_interval_ms));

        Ok(Self {
            options,
            driver,
            notifier,
            search: SubtitleSearch::new(),
            file_name: None,
            error_message: None,
        })
    }

    /// Устанавливает функцию обратного вызова, получающую каждый кадр.
    /// Функция вызывается под мьютексом контроллера и не должна обращаться
    /// к плееру; см. `FrameCallback`.
    pub fn with_observer(mut self, callback: FrameCallback) -> Self {
        log_debug("Установлена функция обратного вызова для кадров");
        let notifier = FrameNotifier::with_callback(callback);
        self.driver.with_controller(|c| c.set_notifier(notifier.clone()));
        self.notifier = notifier;
        self
    }

    /// Загружает SRT файл. При ошибке чтения состояние плеера не меняется.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        log_info(&format!("Загрузка файла субтитров: {}", path.display()));

        match SrtParser::parse_file(path) {
            Ok(track) => Ok(self.load_track(utils::display_name(path), track)),
            Err(e) => Err(self.fail_load(e)),
        }
    }

    /// Загружает субтитры из произвольного источника
    pub fn load_reader<R: Read>(&mut self, name: &str, reader: R) -> Result<usize> {
        match SrtParser::parse_reader(reader) {
            Ok(track) => Ok(self.load_track(name.to_string(), track)),
            Err(e) => Err(self.fail_load(e)),
        }
    }

    /// Загружает субтитры из уже декодированного текста
    pub fn load_str(&mut self, name: &str, content: &str) -> usize {
        self.load_track(name.to_string(), SrtParser::parse_str(content))
    }

    /// Заменяет загруженную последовательность
    pub fn load_track(&mut self, name: String, track: SegmentTrack) -> usize {
        let count = track.len();
        if track.is_empty() {
            log_warning(&format!("В файле {} не найдено ни одного субтитра", name));
        }

        self.driver.load_segments(track);
        self.search.clear();
        self.file_name = Some(name);
        self.error_message = None;
        count
    }

    pub fn play(&mut self) -> Result<bool> {
        self.driver.play()
    }

    pub fn pause(&mut self) {
        self.driver.pause();
    }

    pub fn toggle(&mut self) -> Result<bool> {
        self.driver.toggle()
    }

    pub fn seek(&mut self, offset_ms: i64) {
        self.driver.seek(offset_ms);
    }

    pub fn seek_absolute(&mut self, time_ms: i64) {
        self.driver.seek_absolute(time_ms);
    }

    /// Короткая перемотка вперед или назад
    pub fn step(&mut self, forward: bool) {
        self.seek(Self::signed(self.options.seek_step_ms, forward));
    }

    /// Длинная перемотка вперед или назад
    pub fn long_step(&mut self, forward: bool) {
        self.seek(Self::signed(self.options.long_seek_step_ms, forward));
    }

    pub fn begin_scrub(&mut self) {
        self.driver.begin_scrub();
    }

    pub fn scrub_to(&mut self, time_ms: u64) {
        self.driver.scrub_to(time_ms);
    }

    pub fn end_scrub(&mut self) -> Result<bool> {
        self.driver.end_scrub()
    }

    /// Выбор субтитра в ленте (только на паузе)
    pub fn select_segment(&mut self, index: usize) -> bool {
        self.driver.select_segment(index)
    }

    /// Переход к соседнему субтитру (только на паузе)
    pub fn step_segment(&mut self, forward: bool) -> bool {
        self.driver.step_segment(forward)
    }

    /// Ищет текст и переходит к первому совпадению
    pub fn search(&mut self, query: &str) -> usize {
        let found = self.driver.with_controller(|c| self.search.set_query(c.track(), query));
        if let Some(index) = self.search.current() {
            self.go_to_segment(index);
        }
        found
    }

    /// Переходит к следующему совпадению
    pub fn next_result(&mut self) -> Option<usize> {
        let index = self.search.next()?;
        self.go_to_segment(index);
        Some(index)
    }

    /// Переходит к предыдущему совпадению
    pub fn previous_result(&mut self) -> Option<usize> {
        let index = self.search.previous()?;
        self.go_to_segment(index);
        Some(index)
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    pub fn search_state(&self) -> &SubtitleSearch {
        &self.search
    }

    /// Текущий кадр для отрисовки
    pub fn frame(&self) -> RenderFrame {
        self.driver.frame()
    }

    /// Последний кадр, разосланный подписчику
    pub fn last_published_frame(&self) -> Option<RenderFrame> {
        self.notifier.last_frame()
    }

    pub fn position_ms(&self) -> u64 {
        self.driver.position_ms()
    }

    pub fn duration_ms(&self) -> u64 {
        self.driver.duration_ms()
    }

    pub fn is_playing(&self) -> bool {
        self.driver.is_playing()
    }

    /// Позиция для отображения (`mm:ss` или `h:mm:ss`)
    pub fn position_label(&self) -> String {
        utils::format_clock(self.position_ms())
    }

    /// Оставшееся время для отображения (`-mm:ss`)
    pub fn remaining_label(&self) -> String {
        utils::format_remaining(self.position_ms(), self.duration_ms())
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Сообщение о последней неудачной загрузке
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    fn go_to_segment(&mut self, index: usize) {
        let start = self
            .driver
            .with_controller(|c| c.track().get(index).map(|s| s.start_ms));
        if let Some(start) = start {
            self.seek_absolute(i64::try_from(start).unwrap_or(i64::MAX));
        }
    }

    fn fail_load(&mut self, e: Error) -> Error {
        e.log();
        self.error_message = Some(format!("Не удалось прочитать файл: {}", e));
        e
    }

    fn signed(step_ms: u64, forward: bool) -> i64 {
        let step = i64::try_from(step_ms).unwrap_or(i64::MAX);
        if forward {
            step
        } else {
            -step
        }
    }
}
