//! 题目解析 - 业务能力层
//!
//! 把 LLM 返回的纯文本切成题目：
//!
//! ```text
//! Q: 题干
//! A: 选项
//! B: 选项
//! C: 选项
//! D: 选项
//! Answer: 正确字母
//! ```
//!
//! 只做文本切分，不做任何校验；缺失的选项或答案保持缺失，交给展示层跳过

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::question::{OptionLetter, Question};

/// 题目块分隔标记
pub const QUESTION_MARKER: &str = "Q:";

/// 行首前缀：`A:` ~ `D:` 或 `Answer:`
static LINE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<letter>[ABCD])|Answer):(?P<value>.*)$").expect("静态正则无效")
});

/// 解析整段响应文本
///
/// 第一个 `Q:` 之前的内容（前言）被丢弃，之后每段对应一道题，保持原顺序
pub fn parse_questions(raw_text: &str) -> Vec<Question> {
    let questions: Vec<Question> = raw_text
        .split(QUESTION_MARKER)
        .skip(1)
        .filter_map(parse_block)
        .collect();

    debug!("解析得到 {} 道题目", questions.len());
    questions
}

/// 解析单个题目块
///
/// 块内没有任何非空行时返回 `None`
fn parse_block(block: &str) -> Option<Question> {
    let mut lines = block.lines().filter(|line| !line.trim().is_empty());
    let text = lines.next()?.trim().to_string();

    let mut question = Question {
        text,
        ..Default::default()
    };

    for line in lines {
        let Some(caps) = LINE_PREFIX.captures(line) else {
            continue;
        };
        let value = caps["value"].trim().to_string();
        match caps.name("letter").and_then(|m| OptionLetter::parse(m.as_str())) {
            Some(letter) => {
                question.options.insert(letter, value);
            }
            None => question.correct_answer = value,
        }
    }

    Some(question)
}
