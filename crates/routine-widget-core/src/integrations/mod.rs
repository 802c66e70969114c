//! External collaborators: where reports are filed and where events come from.

pub mod notion;
pub mod traits;

pub use traits::{EventSource, RoutineStore};
