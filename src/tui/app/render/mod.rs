mod body;
mod header;
mod status;

pub use body::render_body;
pub use header::render_header;
pub use status::{StatusInfo, render_status};
