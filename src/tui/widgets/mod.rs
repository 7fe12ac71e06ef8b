pub mod code_view;
pub mod input;

pub use code_view::{CodeViewer, Follow, HighlightCache, ScrollState};
pub use input::{InputAction, InputWidget};
