use crate::source::{DemoHeader, EventHandler, GameState, ReplaySource};
use crate::trace::{ReplayState, Step};

/// A replay built in memory from [`Step`]s, with optional injected failures.
#[derive(Debug, Clone, Default)]
pub struct ScriptedReplay {
    header: DemoHeader,
    steps: Vec<Step>,
    header_error: Option<String>,
    stream_error: Option<String>,
    state: ReplayState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedError(pub String);

impl std::fmt::Display for ScriptedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ScriptedError {}

impl ScriptedReplay {
    pub fn new(header: DemoHeader) -> Self {
        Self {
            header,
            ..Default::default()
        }
    }

    pub fn push(&mut self, step: Step) -> &mut Self {
        self.steps.push(step);
        self
    }

    pub fn extend<I>(&mut self, steps: I) -> &mut Self
    where
        I: IntoIterator<Item = Step>,
    {
        self.steps.extend(steps);
        self
    }

    /// Makes the header step fail.
    pub fn fail_header(&mut self, message: impl Into<String>) -> &mut Self {
        self.header_error = Some(message.into());
        self
    }

    /// Makes the stream fail after every step has been dispatched.
    pub fn fail_stream(&mut self, message: impl Into<String>) -> &mut Self {
        self.stream_error = Some(message.into());
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl ReplaySource for ScriptedReplay {
    type Error = ScriptedError;

    fn parse_header(&mut self) -> Result<DemoHeader, Self::Error> {
        if let Some(msg) = &self.header_error {
            return Err(ScriptedError(msg.clone()));
        }

        self.state = ReplayState::new(self.header.clone());
        Ok(self.header.clone())
    }

    fn parse_to_end(&mut self, handler: &mut dyn EventHandler) -> Result<(), Self::Error> {
        for step in self.steps.iter() {
            self.state.apply(step, handler);
        }

        if let Some(msg) = &self.stream_error {
            return Err(ScriptedError(msg.clone()));
        }

        self.state.close_frame(handler);
        Ok(())
    }

    fn game_state(&self) -> &dyn GameState {
        &self.state
    }
}
