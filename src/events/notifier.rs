use crate::playback::RenderFrame;
use std::sync::{Arc, Mutex, PoisonError};

/// Тип для функций обратного вызова, получающих новый кадр.
///
/// Вызывается синхронно, пока владелец контроллера держит его мьютекс
/// (в `PlaybackDriver` в том числе из фонового таска тиков). Функция должна
/// быстро возвращаться и не обращаться к драйверу или плееру: повторный
/// захват мьютекса из нее приведет к взаимной блокировке. Для тяжелой
/// работы кадр стоит переслать в канал.
pub type FrameCallback = Box<dyn Fn(&RenderFrame) + Send + Sync + 'static>;

/// Рассылает кадры подписчику и хранит последний опубликованный кадр
#[derive(Clone, Default)]
pub struct FrameNotifier {
    /// Последний опубликованный кадр
    last_frame: Arc<Mutex<Option<RenderFrame>>>,
    /// Количество опубликованных кадров
    published: Arc<Mutex<u64>>,
    /// Функция обратного вызова
    callback: Option<Arc<FrameCallback>>,
}

impl FrameNotifier {
    /// Создает уведомитель без подписчика
    pub fn new() -> Self {
        Self::default()
    }

    /// Создает уведомитель с функцией обратного вызова
    pub fn with_callback(callback: FrameCallback) -> Self {
        Self {
            callback: Some(Arc::new(callback)),
            ..Self::default()
        }
    }

    /// Устанавливает функцию обратного вызова
    pub fn set_callback(&mut self, callback: FrameCallback) {
        self.callback = Some(Arc::new(callback));
    }

    /// Публикует кадр
    pub fn publish(&self, frame: RenderFrame) {
        if let Some(callback) = &self.callback {
            callback(&frame);
        }

        *self.published.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        *self.last_frame.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame);
    }

    /// Возвращает последний опубликованный кадр
    pub fn last_frame(&self) -> Option<RenderFrame> {
        self.last_frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Сколько кадров было опубликовано
    pub fn published_count(&self) -> u64 {
        *self.published.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for FrameNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameNotifier")
            .field("published", &self.published_count())
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}
