//! Document models

mod content;
mod contributor;
mod document;
mod status;

pub use content::*;
pub use contributor::*;
pub use document::*;
pub use status::*;
