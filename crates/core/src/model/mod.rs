mod identity;
mod question;
mod result;
mod section;

pub use identity::{Identity, IdentityError, Organization};
pub use question::{OptionIndex, Question, QuestionError, QuestionSet};
pub use result::{PASS_THRESHOLD_PERCENT, QuizResult, QuizResultError, is_passing, percentage};
pub use section::SectionId;
