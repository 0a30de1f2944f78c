use crate::engine::engine::LoadReport;
use crate::foundation::error::TweenError;

type Hook<A> = Option<Box<dyn FnMut(A)>>;

/// Optional lifecycle hooks. Each is invoked synchronously from the engine method that
/// triggers it.
#[derive(Default)]
pub struct EngineCallbacks {
    pub(crate) on_ready: Option<Box<dyn FnMut(&LoadReport)>>,
    pub(crate) on_start: Hook<()>,
    pub(crate) on_complete: Hook<()>,
    pub(crate) on_error: Option<Box<dyn FnMut(&TweenError)>>,
    pub(crate) on_frame: Hook<f64>,
}

impl std::fmt::Debug for EngineCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCallbacks")
            .field("on_ready", &self.on_ready.is_some())
            .field("on_start", &self.on_start.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_frame", &self.on_frame.is_some())
            .finish()
    }
}

impl EngineCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// After a scene loads successfully.
    pub fn on_ready(mut self, f: impl FnMut(&LoadReport) + 'static) -> Self {
        self.on_ready = Some(Box::new(f));
        self
    }

    /// When playback starts from stopped or completed (not on resume).
    pub fn on_start(mut self, mut f: impl FnMut() + 'static) -> Self {
        self.on_start = Some(Box::new(move |()| f()));
        self
    }

    /// When a non-looping timeline reaches its end.
    pub fn on_complete(mut self, mut f: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(move |()| f()));
        self
    }

    /// When a load fails or a frame cannot be drawn.
    pub fn on_error(mut self, f: impl FnMut(&TweenError) + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// After every rendered frame, with the scene time in milliseconds.
    pub fn on_frame(mut self, f: impl FnMut(f64) + 'static) -> Self {
        self.on_frame = Some(Box::new(f));
        self
    }

    pub(crate) fn ready(&mut self, report: &LoadReport) {
        if let Some(f) = self.on_ready.as_mut() {
            f(report);
        }
    }

    pub(crate) fn start(&mut self) {
        if let Some(f) = self.on_start.as_mut() {
            f(());
        }
    }

    pub(crate) fn complete(&mut self) {
        if let Some(f) = self.on_complete.as_mut() {
            f(());
        }
    }

    pub(crate) fn error(&mut self, err: &TweenError) {
        if let Some(f) = self.on_error.as_mut() {
            f(err);
        }
    }

    pub(crate) fn frame(&mut self, time_ms: f64) {
        if let Some(f) = self.on_frame.as_mut() {
            f(time_ms);
        }
    }
}
