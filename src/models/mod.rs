pub mod badge;
pub mod exam_config;
pub mod question;

pub use badge::{percentage, Badge, BadgeStyle};
pub use exam_config::{clamp_question_count, Difficulty, ExamConfig};
pub use question::{OptionLetter, Question};
