//! 终端输入命令
//!
//! 同一行输入在不同状态下含义不同，所以解析时需要知道当前状态

use crate::models::exam_config::Difficulty;
use crate::models::question::OptionLetter;
use crate::workflow::ExamState;

/// 用户命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // --- 表单 ---
    SetTopic(String),
    SetDifficulty(Difficulty),
    /// 原始输入，由状态机负责夹紧
    SetCount(String),
    Generate,
    // --- 作答 ---
    Select(OptionLetter),
    Next,
    // --- 完成后 ---
    NewExam,
    Retry,
    // --- 任何时候 ---
    Help,
    Quit,
    /// 无法识别的输入，附带提示
    Unknown(String),
}

/// 按当前状态解析一行输入
pub fn parse_command(state: ExamState, line: &str) -> Command {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let head = head.to_lowercase();

    match head.as_str() {
        "quit" | "exit" | "q" => return Command::Quit,
        "help" | "?" | "h" if rest.is_empty() => return Command::Help,
        _ => {}
    }

    match state {
        ExamState::Configuring => match head.as_str() {
            "topic" | "t" => Command::SetTopic(rest.to_string()),
            "difficulty" | "d" => match Difficulty::parse(rest) {
                Some(difficulty) => Command::SetDifficulty(difficulty),
                None => Command::Unknown("难度只能是 easy / medium / hard".to_string()),
            },
            "count" | "n" => Command::SetCount(rest.to_string()),
            "generate" | "g" => Command::Generate,
            _ => Command::Unknown(format!("无法识别的命令: {}", line)),
        },
        ExamState::Generating => match head.as_str() {
            "generate" | "g" => Command::Generate,
            _ => Command::Unknown("题目生成中，请稍候".to_string()),
        },
        ExamState::InProgress => {
            if rest.is_empty() {
                if let Some(letter) = OptionLetter::parse(&head) {
                    return Command::Select(letter);
                }
            }
            match head.as_str() {
                "next" | "n" | "finish" | "f" => Command::Next,
                _ => Command::Unknown("输入 A-D 选择答案，next 进入下一题".to_string()),
            }
        }
        ExamState::Completed => match head.as_str() {
            "new" => Command::NewExam,
            "retry" | "r" => Command::Retry,
            _ => Command::Unknown("输入 new 新建试卷，retry 重新作答".to_string()),
        },
    }
}
