//! Terminal presentation: the progress spinner and the answer formatter.

pub mod format;
pub mod spinner;

pub use format::Formatter;
pub use spinner::ProgressSession;
