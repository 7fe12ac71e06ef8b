mod accumulator;
pub mod consumer;
pub mod error;
pub mod extract;
pub mod generator;
pub mod session;
pub mod sync;
pub mod types;

pub use consumer::{ArtifactUpdate, StreamConsumer, StreamOutcome};
pub use error::{GenerationError, Result};
pub use extract::{extract, fence_language};
pub use generator::{Generator, drive_cycle};
pub use session::{Effect, Session, SessionEvent, Status};
pub use sync::{AutoScroll, ScrollRegion};
pub use types::{Cycle, CycleId, CycleKind, GenerationRequest, Message, Role};
