mod session;
mod workflow;

pub use session::{Attempted, QuizStep, TrainingSession};
pub use workflow::{DEFAULT_PERSIST_TIMEOUT, TrainingLoopService};
