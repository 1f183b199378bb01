//! Recording mock surface for dispatcher integration tests.

use std::sync::Mutex;

use async_trait::async_trait;
use canvas_commands::{
    fit_width, CanvasSurface, ControllerError, ControllerResult, NavigationTarget, Snapshot,
};
use serde_json::Value;
use url::Url;

/// A call observed by the mock surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Show,
    Hide,
    Navigate(Option<String>),
    Eval(String),
    Snapshot(Option<u32>),
    A2uiPush(Value),
    A2uiReset,
}

/// In-memory surface with a fixed natural size and a recorded call log.
pub struct MockSurface {
    pub calls: Mutex<Vec<Call>>,
    pub natural_size: (u32, u32),
    pub scaffold: Url,
    /// When set, eval returns this error instead of the default result.
    pub eval_error: Option<String>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            natural_size: (1280, 720),
            scaffold: Url::parse("file:///opt/canvas/bundle/scaffold.html").expect("scaffold url"),
            eval_error: None,
        }
    }

    pub fn failing_eval(message: &str) -> Self {
        Self {
            eval_error: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("lock").push(call);
    }
}

#[async_trait]
impl CanvasSurface for MockSurface {
    async fn show(&self) -> ControllerResult<()> {
        self.record(Call::Show);
        Ok(())
    }

    async fn hide(&self) -> ControllerResult<()> {
        self.record(Call::Hide);
        Ok(())
    }

    async fn navigate(&self, url: Option<String>) -> ControllerResult<String> {
        self.record(Call::Navigate(url.clone()));
        let target = NavigationTarget::resolve(url.as_deref(), &self.scaffold)?;
        Ok(target.into_url(&self.scaffold).to_string())
    }

    async fn eval(&self, script: String) -> ControllerResult<String> {
        self.record(Call::Eval(script));
        if let Some(message) = &self.eval_error {
            return Err(ControllerError::Evaluation(message.clone()));
        }
        Ok("ok".to_string())
    }

    async fn snapshot(&self, max_width: Option<u32>) -> ControllerResult<Snapshot> {
        self.record(Call::Snapshot(max_width));
        let (width, height) = fit_width(self.natural_size.0, self.natural_size.1, max_width);
        Ok(Snapshot {
            width,
            height,
            data: "aGVsbG8=".to_string(),
        })
    }

    async fn a2ui_push(&self, message: Value) -> ControllerResult<()> {
        self.record(Call::A2uiPush(message));
        Ok(())
    }

    async fn a2ui_reset(&self) -> ControllerResult<()> {
        self.record(Call::A2uiReset);
        Ok(())
    }
}
