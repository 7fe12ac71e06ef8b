use crate::backend::GenerationBackend;
use crate::backend::error::BackendError;
use crate::core::consumer::{ArtifactUpdate, StreamConsumer, StreamOutcome};
use crate::core::error::Result;
use crate::core::session::{Session, SessionEvent};
use crate::core::types::Cycle;

/// Runs one cycle against `backend`, reporting progress as session events.
///
/// Emits `StreamOpened`, one `Published` per chunk, then exactly one of
/// `Completed` or `Failed`. Pre-stream failures skip `StreamOpened`.
pub async fn drive_cycle<B, F>(
    backend: &B,
    cycle: &Cycle,
    mut emit: F,
) -> std::result::Result<StreamOutcome, BackendError>
where
    B: GenerationBackend + ?Sized,
    F: FnMut(SessionEvent),
{
    let id = cycle.id;

    let stream = match backend.open(&cycle.request).await {
        Ok(stream) => stream,
        Err(e) => {
            emit(SessionEvent::Failed {
                cycle: id,
                error: e.to_string(),
            });
            return Err(e);
        }
    };

    emit(SessionEvent::StreamOpened { cycle: id });

    let result = StreamConsumer::new()
        .consume(stream, |update| {
            emit(SessionEvent::Published { cycle: id, update });
        })
        .await;

    match &result {
        Ok(outcome) => {
            tracing::debug!(
                cycle = %id,
                chunks = outcome.chunks,
                bytes = outcome.raw.len(),
                "Stream drained"
            );
            emit(SessionEvent::Completed { cycle: id });
        }
        Err(e) => emit(SessionEvent::Failed {
            cycle: id,
            error: e.to_string(),
        }),
    }

    result
}

/// Headless driver: owns a session and a backend and runs cycles inline.
pub struct Generator<B> {
    backend: B,
    session: Session,
}

impl<B: GenerationBackend> Generator<B> {
    pub fn new(backend: B) -> Self {
        let session = Session::new(backend.model());
        Self { backend, session }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Submits `prompt` and drives the stream to its end.
    ///
    /// `on_update` sees every publication after the session applied it.
    pub async fn submit<F>(&mut self, prompt: &str, mut on_update: F) -> Result<StreamOutcome>
    where
        F: FnMut(&ArtifactUpdate, &Session),
    {
        let (cycle, _effects) = self.session.begin(prompt.to_string())?;

        let Self { backend, session } = self;
        let outcome = drive_cycle(&*backend, &cycle, |event| {
            let update = match &event {
                SessionEvent::Published { update, .. } => Some(update.clone()),
                _ => None,
            };
            if let Err(e) = session.apply(event) {
                tracing::warn!(error = %e, "Session rejected generation event");
                return;
            }
            if let Some(update) = update {
                on_update(&update, &*session);
            }
        })
        .await?;

        Ok(outcome)
    }
}

impl<B: GenerationBackend> std::fmt::Debug for Generator<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("backend", &self.backend.name())
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ScriptedBackend, ScriptedReply};
    use crate::core::session::{Effect, Status};
    use crate::core::types::{GenerationRequest, Message};

    #[tokio::test]
    async fn calculator_end_to_end() {
        let backend = ScriptedBackend::new().with_reply(ScriptedReply::chunks([
            "```tsx\nfunction Calc() ",
            "{ return <div/> }\n```",
        ]));
        let mut generator = Generator::new(backend);

        let mut seen = Vec::new();
        let outcome = generator
            .submit("Build me a calculator", |update, session| {
                assert!(session.is_loading());
                assert_eq!(session.artifact(), update.artifact());
                seen.push(update.artifact().to_string());
            })
            .await
            .expect("generation succeeds");

        assert_eq!(
            seen,
            vec![
                "```tsx\nfunction Calc()".to_string(),
                "function Calc() { return <div/> }".to_string(),
            ]
        );
        assert_eq!(outcome.artifact, "function Calc() { return <div/> }");

        let session = generator.session();
        assert_eq!(session.status(), Status::Created);
        assert_eq!(session.artifact(), "function Calc() { return <div/> }");
        assert_eq!(
            session.messages(),
            &[Message::user("Build me a calculator")]
        );

        let history = generator.backend().request_history();
        assert_eq!(
            history,
            vec![GenerationRequest::single_prompt(
                "scripted-model",
                "Build me a calculator"
            )]
        );
    }

    #[tokio::test]
    async fn http_500_leaves_session_usable() {
        let backend = ScriptedBackend::new()
            .with_reply(ScriptedReply::chunks(["```js\nlet v = 1;\n```"]))
            .with_reply(ScriptedReply::status(500, "Internal Server Error"));
        let mut generator = Generator::new(backend);

        generator
            .submit("first", |_, _| {})
            .await
            .expect("first succeeds");
        let revision = generator.session().revision();

        let mut published = 0;
        let err = generator
            .submit("second", |_, _| published += 1)
            .await
            .expect_err("second fails");

        assert!(matches!(
            err.backend(),
            Some(BackendError::Transport { status: 500, .. })
        ));
        assert_eq!(published, 0);

        let session = generator.session();
        assert_eq!(session.status(), Status::Created);
        assert!(session.input_enabled());
        assert_eq!(session.artifact(), "let v = 1;");
        assert_eq!(session.revision(), revision);
        assert_eq!(session.messages().len(), 1);
        assert!(session.last_error().is_some_and(|e| e.contains("500")));
    }

    #[tokio::test]
    async fn mid_stream_failure_keeps_partial_artifact() {
        let backend = ScriptedBackend::new().with_reply(ScriptedReply::interrupted(
            ["```ts\nconst partial"],
            "connection reset",
        ));
        let mut generator = Generator::new(backend);

        let err = generator
            .submit("p", |_, _| {})
            .await
            .expect_err("stream fails");

        assert!(matches!(err.backend(), Some(BackendError::StreamRead(_))));
        let session = generator.session();
        assert_eq!(session.status(), Status::Initial);
        assert_eq!(session.artifact(), "```ts\nconst partial");
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn missing_body_fails_before_stream() {
        let backend = ScriptedBackend::new().with_reply(ScriptedReply::MissingBody);
        let mut generator = Generator::new(backend);

        let err = generator
            .submit("p", |_, _| {})
            .await
            .expect_err("no body");
        assert!(matches!(err.backend(), Some(BackendError::MissingBody)));
        assert_eq!(generator.session().revision(), 0);
    }

    #[tokio::test]
    async fn second_cycle_is_an_update() {
        let backend = ScriptedBackend::new()
            .with_reply(ScriptedReply::chunks(["```\none\n```"]))
            .with_reply(ScriptedReply::chunks(["```\ntwo\n```"]));
        let mut generator = Generator::new(backend);

        generator.submit("one", |_, _| {}).await.expect("first");
        generator
            .submit("two", |_, session| {
                assert_eq!(session.status(), Status::Updating);
            })
            .await
            .expect("second");

        let session = generator.session();
        assert_eq!(session.status(), Status::Updated);
        assert_eq!(session.artifact(), "two");
        assert_eq!(
            session.messages(),
            &[Message::user("one"), Message::user("two")]
        );
    }

    #[tokio::test]
    async fn drive_cycle_event_order() {
        let backend = ScriptedBackend::new().with_reply(ScriptedReply::chunks(["a", "b"]));
        let mut session = Session::new("m");
        let effects = session
            .apply(SessionEvent::Submit { prompt: "p".into() })
            .expect("submit");
        let Some(Effect::StartGeneration(cycle)) = effects.last().cloned() else {
            panic!("expected StartGeneration");
        };

        let mut kinds = Vec::new();
        drive_cycle(&backend, &cycle, |event| {
            kinds.push(match event {
                SessionEvent::StreamOpened { .. } => "opened",
                SessionEvent::Published { .. } => "published",
                SessionEvent::Completed { .. } => "completed",
                SessionEvent::Failed { .. } => "failed",
                SessionEvent::Submit { .. } => "submit",
            });
        })
        .await
        .expect("drive succeeds");

        assert_eq!(kinds, vec!["opened", "published", "published", "completed"]);
    }
}
