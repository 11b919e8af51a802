pub mod exam_runner;
pub mod exam_session;

pub use exam_runner::{ExamRunner, ExamState};
pub use exam_session::{AdvanceOutcome, ExamSession, TickOutcome};
