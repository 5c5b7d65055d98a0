pub mod queue;
pub mod triage;

pub use queue::*;
pub use triage::*;
