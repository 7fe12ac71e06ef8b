//! Generation lifecycle.
//!
//! `Session` is a reducer: every [`SessionEvent`] mutates the state and
//! returns the [`Effect`]s the caller has to carry out. The session never does
//! I/O itself.

use crate::core::consumer::ArtifactUpdate;
use crate::core::error::{GenerationError, Result};
use crate::core::types::{Cycle, CycleId, CycleKind, GenerationRequest, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Initial,
    Creating,
    Created,
    Updating,
    Updated,
}

impl Status {
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Creating | Self::Updating)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Creating => "creating",
            Self::Created => "created",
            Self::Updating => "updating",
            Self::Updated => "updated",
        }
    }

    /// Text shown over the result area while a stream is open.
    #[must_use]
    pub const fn progress_label(self) -> Option<&'static str> {
        match self {
            Self::Creating => Some("Building your app..."),
            Self::Updating => Some("Updating your app..."),
            _ => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CycleKind {
    const fn running(self) -> Status {
        match self {
            Self::Create => Status::Creating,
            Self::Update => Status::Updating,
        }
    }

    const fn finished(self) -> Status {
        match self {
            Self::Create => Status::Created,
            Self::Update => Status::Updated,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Submit { prompt: String },
    StreamOpened { cycle: CycleId },
    Published { cycle: CycleId, update: ArtifactUpdate },
    Completed { cycle: CycleId },
    Failed { cycle: CycleId, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The result area should appear. Emitted once per session.
    RevealOutput,
    StartGeneration(Cycle),
    ArtifactChanged { revision: u64 },
    LoadingChanged(bool),
    Failed(String),
}

#[derive(Debug, Clone)]
struct ActiveCycle {
    id: CycleId,
    kind: CycleKind,
    prompt: String,
    resume: Status,
}

#[derive(Debug, Clone)]
pub struct Session {
    model: String,
    status: Status,
    prompt: String,
    artifact: String,
    language: Option<String>,
    revision: u64,
    messages: Vec<Message>,
    active: Option<ActiveCycle>,
    revealed: bool,
    last_error: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            status: Status::Initial,
            prompt: String::new(),
            artifact: String::new(),
            language: None,
            revision: 0,
            messages: Vec::new(),
            active: None,
            revealed: false,
            last_error: None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Whether prompt editing and submission are currently accepted.
    #[must_use]
    pub const fn input_enabled(&self) -> bool {
        !self.is_loading()
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn active_cycle(&self) -> Option<CycleId> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn apply(&mut self, event: SessionEvent) -> Result<Vec<Effect>> {
        match event {
            SessionEvent::Submit { prompt } => self.begin(prompt).map(|(_, effects)| effects),
            SessionEvent::StreamOpened { cycle } => Ok(self.stream_opened(cycle)),
            SessionEvent::Published { cycle, update } => Ok(self.published(cycle, &update)),
            SessionEvent::Completed { cycle } => Ok(self.completed(cycle)),
            SessionEvent::Failed { cycle, error } => Ok(self.failed(cycle, error)),
        }
    }

    /// Same transition as applying `Submit`, but also hands back the cycle
    /// for callers that drive it inline.
    pub fn begin(&mut self, prompt: String) -> Result<(Cycle, Vec<Effect>)> {
        if self.is_loading() {
            tracing::debug!(status = %self.status, "Rejected submission while loading");
            return Err(GenerationError::Busy);
        }

        let kind = if self.status == Status::Initial {
            CycleKind::Create
        } else {
            CycleKind::Update
        };

        let cycle = Cycle {
            id: CycleId::new(),
            kind,
            request: GenerationRequest::single_prompt(&self.model, &prompt),
        };

        self.active = Some(ActiveCycle {
            id: cycle.id,
            kind,
            prompt: prompt.clone(),
            resume: self.status,
        });
        self.prompt = prompt;
        self.last_error = None;
        self.status = kind.running();

        tracing::info!(cycle = %cycle.id, status = %self.status, "Generation cycle started");

        let mut effects = Vec::with_capacity(3);
        if !self.revealed {
            self.revealed = true;
            effects.push(Effect::RevealOutput);
        }
        effects.push(Effect::LoadingChanged(true));
        effects.push(Effect::StartGeneration(cycle.clone()));
        Ok((cycle, effects))
    }

    fn stream_opened(&mut self, cycle: CycleId) -> Vec<Effect> {
        if !self.is_current(cycle) {
            return Vec::new();
        }

        self.artifact.clear();
        self.language = None;
        self.revision += 1;
        vec![Effect::ArtifactChanged {
            revision: self.revision,
        }]
    }

    fn published(&mut self, cycle: CycleId, update: &ArtifactUpdate) -> Vec<Effect> {
        if !self.is_current(cycle) {
            return Vec::new();
        }

        if update.language().is_some() {
            self.language = update.language().map(String::from);
        }

        if self.artifact == update.artifact() {
            return Vec::new();
        }

        update.artifact().clone_into(&mut self.artifact);
        self.revision += 1;
        vec![Effect::ArtifactChanged {
            revision: self.revision,
        }]
    }

    fn completed(&mut self, cycle: CycleId) -> Vec<Effect> {
        let Some(active) = self.take_current(cycle) else {
            return Vec::new();
        };

        self.messages.push(Message::user(active.prompt));
        self.status = active.kind.finished();
        tracing::info!(cycle = %active.id, status = %self.status, "Generation cycle finished");

        vec![Effect::LoadingChanged(false)]
    }

    fn failed(&mut self, cycle: CycleId, error: String) -> Vec<Effect> {
        let Some(active) = self.take_current(cycle) else {
            return Vec::new();
        };

        self.status = active.resume;
        tracing::warn!(
            cycle = %active.id,
            status = %self.status,
            error = %error,
            "Generation cycle failed"
        );
        self.last_error = Some(error.clone());

        vec![Effect::LoadingChanged(false), Effect::Failed(error)]
    }

    fn is_current(&self, cycle: CycleId) -> bool {
        let current = self.active.as_ref().is_some_and(|a| a.id == cycle);
        if !current {
            tracing::warn!(cycle = %cycle, "Ignoring event for stale generation cycle");
        }
        current
    }

    fn take_current(&mut self, cycle: CycleId) -> Option<ActiveCycle> {
        if self.is_current(cycle) {
            self.active.take()
        } else {
            None
        }
    }
}
