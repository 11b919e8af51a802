use std::time::Duration;

use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};

/// 题目数量下限
pub const MIN_QUESTIONS: u32 = 3;
/// 题目数量上限
pub const MAX_QUESTIONS: u32 = 15;

/// 难度枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 简单
    #[default]
    Easy,
    /// 中等
    Medium,
    /// 困难
    Hard,
}

/// 输入别名 -> 难度
static DIFFICULTY_ALIASES: phf::Map<&'static str, Difficulty> = phf_map! {
    "easy" => Difficulty::Easy,
    "e" => Difficulty::Easy,
    "1" => Difficulty::Easy,
    "medium" => Difficulty::Medium,
    "m" => Difficulty::Medium,
    "2" => Difficulty::Medium,
    "hard" => Difficulty::Hard,
    "h" => Difficulty::Hard,
    "3" => Difficulty::Hard,
};

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// 提示词和界面里使用的名称
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// 每道题的作答时间（秒）
    pub fn seconds_per_question(self) -> u32 {
        match self {
            Difficulty::Easy => 60,
            Difficulty::Medium => 45,
            Difficulty::Hard => 30,
        }
    }

    pub fn time_limit(self) -> Duration {
        Duration::from_secs(u64::from(self.seconds_per_question()))
    }

    /// 从用户输入解析难度（忽略大小写和首尾空白）
    pub fn parse(s: &str) -> Option<Self> {
        DIFFICULTY_ALIASES
            .get(s.trim().to_lowercase().as_str())
            .copied()
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConfigError::UnknownDifficulty(s.to_string()))
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 把任意输入夹到 [MIN_QUESTIONS, MAX_QUESTIONS]
///
/// 非数字输入视为下限
pub fn clamp_question_count(input: &str) -> u32 {
    input
        .trim()
        .parse::<i64>()
        .ok()
        .map(|n| n.clamp(i64::from(MIN_QUESTIONS), i64::from(MAX_QUESTIONS)) as u32)
        .unwrap_or(MIN_QUESTIONS)
}

/// 试卷配置（表单内容）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamConfig {
    pub topic: String,
    pub difficulty: Difficulty,
    pub question_count: u32,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            topic: String::new(),
            difficulty: Difficulty::Easy,
            question_count: 5,
        }
    }
}

impl ExamConfig {
    pub fn new(topic: impl Into<String>, difficulty: Difficulty, question_count: u32) -> Self {
        Self {
            topic: topic.into(),
            difficulty,
            question_count,
        }
    }

    /// 提交前的校验
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.question_count) {
            return Err(ValidationError::QuestionCountOutOfRange {
                count: self.question_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_durations() {
        assert_eq!(Difficulty::Easy.seconds_per_question(), 60);
        assert_eq!(Difficulty::Medium.seconds_per_question(), 45);
        assert_eq!(Difficulty::Hard.seconds_per_question(), 30);
        assert_eq!(Difficulty::Hard.time_limit(), Duration::from_secs(30));
    }

    #[test]
    fn test_difficulty_parse_aliases() {
        assert_eq!(Difficulty::parse(" Medium "), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("h"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("1"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("extreme"), None);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_clamp_question_count() {
        assert_eq!(clamp_question_count("7"), 7);
        assert_eq!(clamp_question_count("1"), 3);
        assert_eq!(clamp_question_count("99"), 15);
        assert_eq!(clamp_question_count("-4"), 3);
        assert_eq!(clamp_question_count("abc"), 3);
        assert_eq!(clamp_question_count(""), 3);
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            ExamConfig::new("   ", Difficulty::Easy, 5).validate(),
            Err(ValidationError::EmptyTopic)
        );
        assert_eq!(
            ExamConfig::new("Biology", Difficulty::Easy, 2).validate(),
            Err(ValidationError::QuestionCountOutOfRange { count: 2 })
        );
        assert_eq!(
            ExamConfig::new("Biology", Difficulty::Easy, 16).validate(),
            Err(ValidationError::QuestionCountOutOfRange { count: 16 })
        );
        assert!(ExamConfig::new("Biology", Difficulty::Hard, 15).validate().is_ok());
        assert!(ExamConfig::new("Biology", Difficulty::Hard, 3).validate().is_ok());
    }
}
