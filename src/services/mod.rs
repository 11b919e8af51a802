pub mod question_generator;
pub mod question_parser;

pub use question_generator::{build_prompt, QuestionGenerator};
pub use question_parser::parse_questions;
