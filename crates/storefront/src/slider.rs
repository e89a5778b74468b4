//! Auto-advancing slide carousel.
//!
//! A [`SliderController`] tracks the active slide and drives an autoplay
//! timer. Each slide stays up for its own duration if it declares one,
//! otherwise for the slider's default interval. Hovering pauses autoplay,
//! leaving resumes it, and clicking an indicator dot jumps there and restarts
//! the timer.
//!
//! The timer is an [`AutoplayTimer`] wrapping a tokio task. It is always
//! cancelled before a new one is issued, so at most one is live per slider.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Applies slide activation to the page.
pub trait SlideDisplay: Send + Sync {
    /// Mark slide `index` and its indicator dot active or inactive.
    fn set_slide_active(&self, index: usize, active: bool);
}

/// One slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slide {
    /// Per-slide display time overriding the slider default.
    pub duration: Option<Duration>,
}

impl Slide {
    #[must_use]
    pub const fn new() -> Self {
        Self { duration: None }
    }

    #[must_use]
    pub const fn with_duration(duration: Duration) -> Self {
        Self {
            duration: Some(duration),
        }
    }

    /// Build a slide from its duration attribute (milliseconds).
    ///
    /// Leading digits are read the way markup authors expect (`"5000ms"` is
    /// 5000). A missing, non-numeric, or zero value falls back to the default.
    #[must_use]
    pub fn from_duration_attribute(attribute: Option<&str>) -> Self {
        let duration = attribute
            .map(|raw| {
                raw.trim()
                    .chars()
                    .take_while(char::is_ascii_digit)
                    .collect::<String>()
            })
            .and_then(|digits| digits.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);
        Self { duration }
    }
}

/// Slider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderConfig {
    pub name: String,
    /// Display time for slides without their own duration.
    pub interval: Duration,
}

impl SliderConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, interval: Duration) -> Self {
        Self {
            name: name.into(),
            interval,
        }
    }

    /// The story carousel.
    #[must_use]
    pub fn story() -> Self {
        Self::new("story", Duration::from_millis(2000))
    }

    /// The hero banner carousel.
    #[must_use]
    pub fn hero() -> Self {
        Self::new("hero", Duration::from_millis(2600))
    }
}

/// A cancellable one-owner timer task.
///
/// Cancelling is idempotent, and dropping the timer cancels it.
#[derive(Debug)]
pub struct AutoplayTimer {
    handle: Option<JoinHandle<()>>,
}

impl AutoplayTimer {
    fn spawn<F>(task: F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(task)),
        }
    }

    /// Stop the timer. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for AutoplayTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct SliderState {
    active: usize,
    timer: Option<AutoplayTimer>,
}

struct SliderInner {
    config: SliderConfig,
    slides: Vec<Slide>,
    display: Arc<dyn SlideDisplay>,
    state: Mutex<SliderState>,
}

impl SliderInner {
    fn state(&self) -> MutexGuard<'_, SliderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn duration_of(&self, index: usize) -> Duration {
        self.slides
            .get(index)
            .and_then(|slide| slide.duration)
            .unwrap_or(self.config.interval)
    }

    fn activate(&self, state: &mut SliderState, next: usize) {
        self.display.set_slide_active(state.active, false);
        state.active = next;
        self.display.set_slide_active(next, true);
    }

    fn advance(&self) {
        let mut state = self.state();
        let next = (state.active + 1) % self.slides.len();
        self.activate(&mut state, next);
        debug!(slider = %self.config.name, active = next, "Slide advanced");
    }
}

/// Controller for one carousel.
///
/// Requires a tokio runtime for autoplay.
#[derive(Clone)]
pub struct SliderController {
    inner: Arc<SliderInner>,
}

impl std::fmt::Debug for SliderController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliderController")
            .field("config", &self.inner.config)
            .field("slides", &self.inner.slides.len())
            .field("active", &self.active_index())
            .finish()
    }
}

impl SliderController {
    /// Create a slider showing the first slide, without starting autoplay.
    ///
    /// Returns `None` when there are no slides.
    #[must_use]
    pub fn new(
        config: SliderConfig,
        slides: Vec<Slide>,
        display: Arc<dyn SlideDisplay>,
    ) -> Option<Self> {
        if slides.is_empty() {
            return None;
        }
        display.set_slide_active(0, true);
        Some(Self {
            inner: Arc::new(SliderInner {
                config,
                slides,
                display,
                state: Mutex::new(SliderState {
                    active: 0,
                    timer: None,
                }),
            }),
        })
    }

    /// Create a slider and start autoplay immediately.
    #[must_use]
    pub fn start(
        config: SliderConfig,
        slides: Vec<Slide>,
        display: Arc<dyn SlideDisplay>,
    ) -> Option<Self> {
        let slider = Self::new(config, slides, display)?;
        slider.start_autoplay();
        Some(slider)
    }

    /// Index of the slide currently shown.
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.inner.state().active
    }

    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.inner.slides.len()
    }

    /// Whether an autoplay timer is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.inner
            .state()
            .timer
            .as_ref()
            .is_some_and(AutoplayTimer::is_active)
    }

    /// Show slide `index`. Out-of-range indices are ignored.
    pub fn set_active(&self, index: usize) {
        if index >= self.inner.slides.len() {
            warn!(slider = %self.inner.config.name, index, "Slide index out of range");
            return;
        }
        let mut state = self.inner.state();
        self.inner.activate(&mut state, index);
    }

    /// (Re)start autoplay from the current slide.
    pub fn start_autoplay(&self) {
        let mut state = self.inner.state();
        if let Some(mut timer) = state.timer.take() {
            timer.cancel();
        }
        state.timer = Some(spawn_autoplay(Arc::downgrade(&self.inner)));
    }

    /// Stop autoplay. Safe to call when already stopped.
    pub fn stop_autoplay(&self) {
        if let Some(mut timer) = self.inner.state().timer.take() {
            timer.cancel();
        }
    }

    /// Pointer entered the slider: pause.
    pub fn pointer_enter(&self) {
        self.stop_autoplay();
    }

    /// Pointer left the slider: resume with a fresh timer.
    pub fn pointer_leave(&self) {
        self.start_autoplay();
    }

    /// Indicator dot clicked: jump to its slide and restart the timer.
    pub fn dot_clicked(&self, index: usize) {
        if index >= self.inner.slides.len() {
            warn!(slider = %self.inner.config.name, index, "Dot index out of range");
            return;
        }
        self.set_active(index);
        self.start_autoplay();
    }
}

/// Sleep for the active slide's duration, advance, repeat.
///
/// Holds only a weak reference so a dropped controller ends the task.
fn spawn_autoplay(inner: Weak<SliderInner>) -> AutoplayTimer {
    AutoplayTimer::spawn(async move {
        loop {
            let delay = match inner.upgrade() {
                Some(slider) => {
                    let active = slider.state().active;
                    slider.duration_of(active)
                }
                None => break,
            };
            tokio::time::sleep(delay).await;
            match inner.upgrade() {
                Some(slider) => slider.advance(),
                None => break,
            }
        }
    })
}
