use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 选项字母
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OptionLetter::A => "A",
            OptionLetter::B => "B",
            OptionLetter::C => "C",
            OptionLetter::D => "D",
        }
    }

    /// 从用户输入解析（忽略大小写）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "A" | "a" => Some(OptionLetter::A),
            "B" | "b" => Some(OptionLetter::B),
            "C" | "c" => Some(OptionLetter::C),
            "D" | "d" => Some(OptionLetter::D),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一道解析后的选择题
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Question {
    /// 题干
    pub text: String,
    /// 只包含解析到的选项，缺失的字母不出现
    pub options: BTreeMap<OptionLetter, String>,
    /// `Answer:` 行的原始内容，没有该行时为空字符串
    pub correct_answer: String,
}

impl Question {
    /// 选项文本，空文本视为不存在
    pub fn option(&self, letter: OptionLetter) -> Option<&str> {
        self.options
            .get(&letter)
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }

    /// 按 A→D 顺序返回有文本的选项
    pub fn present_options(&self) -> impl Iterator<Item = (OptionLetter, &str)> {
        self.options
            .iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(letter, text)| (*letter, text.as_str()))
    }

    /// 判断所选答案是否正确，未作答永远不正确
    pub fn is_correct(&self, selected: Option<OptionLetter>) -> bool {
        selected.is_some_and(|letter| self.correct_answer == letter.as_str())
    }
}
