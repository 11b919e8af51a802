//! 终端界面渲染
//!
//! 只把状态拼成文本，不做任何状态修改

use crossterm::style::{Color, Stylize};

use crate::models::exam_config::{Difficulty, ExamConfig, MAX_QUESTIONS, MIN_QUESTIONS};
use crate::workflow::ExamSession;

/// 剩余时间不超过该值时高亮
pub const LOW_TIME_THRESHOLD: u32 = 10;

/// 秒数格式化为 `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// 表单界面
pub fn render_form(config: &ExamConfig, error: Option<&str>, generating: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", "Generate your MCQ Exam".bold()));
    out.push_str(&format!(
        "  Topic:      {}\n",
        if config.topic.is_empty() {
            "(E.g. Python, World History, Biology)"
        } else {
            config.topic.as_str()
        }
    ));
    let levels: Vec<String> = Difficulty::ALL
        .iter()
        .map(|d| {
            if *d == config.difficulty {
                format!("[{}]", d)
            } else {
                d.to_string()
            }
        })
        .collect();
    out.push_str(&format!("  Difficulty: {}\n", levels.join(" ")));
    out.push_str(&format!(
        "  Number of Questions ({}-{}): {}\n",
        MIN_QUESTIONS, MAX_QUESTIONS, config.question_count
    ));
    if generating {
        out.push_str("  Generating Questions...\n");
    } else {
        out.push_str("  命令: topic <主题> | difficulty <easy|medium|hard> | count <数量> | generate\n");
    }
    if let Some(error) = error {
        out.push_str(&format!("{}\n", error.with(Color::Red)));
    }
    out
}

/// 当前题目界面
pub fn render_question(session: &ExamSession) -> String {
    let question = session.current_question();
    let mut out = String::new();

    let heading = format!(
        "Question {} of {}",
        session.current_index() + 1,
        session.total()
    );
    out.push_str(&format!(
        "\n{}    {}\n\n",
        heading.bold(),
        render_timer(session.time_left())
    ));
    out.push_str(&format!("{}\n\n", question.text));

    for (letter, text) in question.present_options() {
        let marker = if session.selected() == Some(letter) {
            ">"
        } else {
            " "
        };
        out.push_str(&format!(" {} {}: {}\n", marker, letter, text));
    }

    let action = if session.is_last_question() {
        "Finish Exam"
    } else {
        "Next Question"
    };
    out.push_str(&format!("\n  输入字母选择答案，next = {}\n", action));
    out
}

/// 计时显示
pub fn render_timer(time_left: u32) -> String {
    let color = if time_left <= LOW_TIME_THRESHOLD {
        Color::Red
    } else {
        Color::Blue
    };
    format!("Time: {}", format_time(time_left))
        .with(color)
        .to_string()
}

/// 完成界面
pub fn render_completed(session: &ExamSession) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", "Exam Completed!".bold()));
    if let Some(badge) = session.badge() {
        out.push_str(&format!("  {}\n", badge.name().with(badge.style().color())));
    }
    out.push_str(&format!(
        "  Your score: {} out of {}\n  ({}%)\n",
        session.score(),
        session.total(),
        session.percentage()
    ));
    out.push_str("  new = Create New Exam | retry = Retry This Exam\n");
    out
}

/// 帮助信息
pub fn render_help() -> String {
    [
        "表单:   topic <主题> | difficulty <easy|medium|hard> | count <3-15> | generate",
        "作答:   A / B / C / D 选择答案 | next 下一题",
        "完成后: new 新建试卷 | retry 重新作答",
        "任何时候: help | quit",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{OptionLetter, Question};
    use std::collections::BTreeMap;

    fn session() -> ExamSession {
        let mut options = BTreeMap::new();
        options.insert(OptionLetter::A, "Paris".to_string());
        options.insert(OptionLetter::C, "Rome".to_string());
        let q = Question {
            text: "Capital of France?".to_string(),
            options,
            correct_answer: "A".to_string(),
        };
        ExamSession::new(vec![q.clone(), q], Difficulty::Easy).unwrap()
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(60), "1:00");
        assert_eq!(format_time(45), "0:45");
        assert_eq!(format_time(9), "0:09");
        assert_eq!(format_time(0), "0:00");
    }

    #[test]
    fn test_render_timer_highlight() {
        assert_eq!(render_timer(10), "Time: 0:10".with(Color::Red).to_string());
        assert_eq!(render_timer(11), "Time: 0:11".with(Color::Blue).to_string());
        assert!(render_timer(45).contains("Time: 0:45"));
    }

    #[test]
    fn test_render_question_skips_absent_options() {
        let mut s = session();
        s.select(OptionLetter::C);
        let out = render_question(&s);
        assert!(out.contains("Question 1 of 2"));
        assert!(out.contains("Time: 1:00"));
        assert!(out.contains("A: Paris"));
        assert!(out.contains("> C: Rome"));
        assert!(!out.contains("B:"));
        assert!(out.contains("Next Question"));
    }

    #[test]
    fn test_render_question_hides_blank_option() {
        let questions = crate::services::parse_questions("Q: Pick\nA:\nB: real\nAnswer: B\n");
        let mut s = ExamSession::new(questions, Difficulty::Easy).unwrap();
        assert!(!s.select(OptionLetter::A));
        let out = render_question(&s);
        assert!(!out.contains("A:"));
        assert!(out.contains("B: real"));
    }

    #[test]
    fn test_render_last_question_and_completed() {
        let mut s = session();
        s.select(OptionLetter::A);
        s.advance();
        assert!(render_question(&s).contains("Finish Exam"));

        s.advance();
        let out = render_completed(&s);
        assert!(out.contains("Your score: 1 out of 2"));
        assert!(out.contains("(50%)"));
        assert!(out.contains("Average"));
    }

    #[test]
    fn test_render_form_shows_error() {
        let out = render_form(&ExamConfig::default(), Some("Please enter a topic."), false);
        assert!(out.contains("[easy]"));
        assert!(out.contains("Number of Questions (3-15): 5"));
        assert!(out.contains("Please enter a topic."));
    }
}
