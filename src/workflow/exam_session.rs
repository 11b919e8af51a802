//! 考试会话
//!
//! 一次作答过程的全部内存状态：题目、当前题号、所选答案、得分、剩余时间

use chrono::{DateTime, Local};
use tracing::debug;

use crate::error::GenerationError;
use crate::models::badge::{percentage, Badge};
use crate::models::exam_config::Difficulty;
use crate::models::question::{OptionLetter, Question};

/// 推进一题后的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// 进入下一题（0-based）
    NextQuestion { index: usize },
    /// 全部答完
    Completed {
        score: usize,
        total: usize,
        percentage: u32,
        badge: Badge,
    },
}

/// 计时一秒后的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 还有剩余时间
    Running { time_left: u32 },
    /// 时间到，已按未作答推进
    Expired(AdvanceOutcome),
}

/// 考试会话
#[derive(Debug, Clone)]
pub struct ExamSession {
    questions: Vec<Question>,
    current_index: usize,
    selected: Option<OptionLetter>,
    score: usize,
    time_left: u32,
    time_limit: u32,
    badge: Option<Badge>,
    /// 每开始一道题（包括重新作答）加一，计时器用它判断是否需要重启
    question_serial: u64,
    started_at: DateTime<Local>,
}

impl ExamSession {
    /// 创建会话，题目不能为空
    pub fn new(questions: Vec<Question>, difficulty: Difficulty) -> Result<Self, GenerationError> {
        if questions.is_empty() {
            return Err(GenerationError::NoQuestions);
        }
        let time_limit = difficulty.seconds_per_question();
        Ok(Self {
            questions,
            current_index: 0,
            selected: None,
            score: 0,
            time_left: time_limit,
            time_limit,
            badge: None,
            question_serial: 1,
            started_at: Local::now(),
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    pub fn selected(&self) -> Option<OptionLetter> {
        self.selected
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    pub fn is_completed(&self) -> bool {
        self.badge.is_some()
    }

    pub fn badge(&self) -> Option<Badge> {
        self.badge
    }

    pub fn question_serial(&self) -> u64 {
        self.question_serial
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// 得分率
    pub fn percentage(&self) -> u32 {
        percentage(self.score, self.questions.len())
    }

    /// 选择答案，可以覆盖之前的选择
    ///
    /// 当前题目没有该选项或会话已结束时返回 `false`
    pub fn select(&mut self, letter: OptionLetter) -> bool {
        if self.is_completed() || self.current_question().option(letter).is_none() {
            return false;
        }
        self.selected = Some(letter);
        true
    }

    /// 判分并进入下一题或结束
    ///
    /// 会话已结束时返回 `None`
    pub fn advance(&mut self) -> Option<AdvanceOutcome> {
        if self.is_completed() {
            return None;
        }

        if self.current_question().is_correct(self.selected) {
            self.score += 1;
        }
        debug!(
            "第 {} 题作答: {:?}，当前得分 {}",
            self.current_index + 1,
            self.selected,
            self.score
        );

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.start_question();
            Some(AdvanceOutcome::NextQuestion {
                index: self.current_index,
            })
        } else {
            Some(self.finish())
        }
    }

    /// 倒计时走一秒，归零时按未选/已选答案推进
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.is_completed() {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left > 0 {
            return Some(TickOutcome::Running {
                time_left: self.time_left,
            });
        }
        self.advance().map(TickOutcome::Expired)
    }

    /// 用同一套题重新作答
    pub fn restart(&mut self) {
        self.current_index = 0;
        self.score = 0;
        self.badge = None;
        self.started_at = Local::now();
        self.start_question();
    }

    fn start_question(&mut self) {
        self.selected = None;
        self.time_left = self.time_limit;
        self.question_serial += 1;
    }

    fn finish(&mut self) -> AdvanceOutcome {
        let percentage = self.percentage();
        let badge = Badge::for_percentage(percentage);
        self.badge = Some(badge);
        self.selected = None;
        AdvanceOutcome::Completed {
            score: self.score,
            total: self.questions.len(),
            percentage,
            badge,
        }
    }
}
