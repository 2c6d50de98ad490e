//! Action entry points: kinds, cancel tables, the per-character state
//! machine and invocation options.

mod error;
pub mod frames;
pub mod kind;
pub mod params;
pub mod state;

pub use error::ActionError;
pub use frames::{ActionInfo, FrameTable};
pub use kind::{ActionKind, AnimationState};
pub use params::Params;
pub use state::ActionStateMachine;
