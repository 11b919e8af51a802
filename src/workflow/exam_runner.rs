//! 考试流程状态机 - 流程层
//!
//! 状态流转：
//!
//! ```text
//! Configuring ──提交──▶ Generating ──成功──▶ InProgress ──答完──▶ Completed
//!      ▲                    │                    ▲                  │
//!      └──────失败──────────┘                    └──────retry───────┤
//!      ▲                                                            │
//!      └───────────────────────────new exam─────────────────────────┘
//! ```
//!
//! 不持有计时器和网络客户端，只负责状态和数据；计时由编排层按
//! [`ExamSession::question_serial`] 同步

use tracing::{info, warn};

use crate::error::{AppError, AppResult, GenerationError};
use crate::models::exam_config::{clamp_question_count, Difficulty, ExamConfig};
use crate::models::question::{OptionLetter, Question};
use crate::services::QuestionGenerator;
use crate::utils::logging::log_exam_completed;
use crate::workflow::exam_session::{AdvanceOutcome, ExamSession, TickOutcome};

/// 页面状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamState {
    /// 编辑表单
    Configuring,
    /// 请求进行中
    Generating,
    /// 作答中
    InProgress,
    /// 已完成
    Completed,
}

/// 考试流程
#[derive(Debug)]
pub struct ExamRunner {
    config: ExamConfig,
    state: ExamState,
    session: Option<ExamSession>,
    error: Option<String>,
}

impl ExamRunner {
    pub fn new(config: ExamConfig) -> Self {
        Self {
            config,
            state: ExamState::Configuring,
            session: None,
            error: None,
        }
    }

    pub fn state(&self) -> ExamState {
        self.state
    }

    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&ExamSession> {
        self.session.as_ref()
    }

    /// 最近一次校验或生成失败的消息
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ========== 表单编辑 ==========

    pub fn set_topic(&mut self, topic: impl Into<String>) -> AppResult<()> {
        self.ensure_state(ExamState::Configuring, "只能在填写表单时修改主题")?;
        self.config.topic = topic.into();
        Ok(())
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> AppResult<()> {
        self.ensure_state(ExamState::Configuring, "只能在填写表单时修改难度")?;
        self.config.difficulty = difficulty;
        Ok(())
    }

    /// 设置题目数量，输入会被夹到合法范围内
    pub fn set_question_count(&mut self, input: &str) -> AppResult<u32> {
        self.ensure_state(ExamState::Configuring, "只能在填写表单时修改题目数量")?;
        self.config.question_count = clamp_question_count(input);
        Ok(self.config.question_count)
    }

    // ========== 生成 ==========

    /// 校验表单并进入 `Generating`
    ///
    /// 返回本次请求使用的配置快照；校验失败时不发请求，错误消息保存在 [`Self::error`]
    pub fn begin_generation(&mut self) -> AppResult<ExamConfig> {
        match self.state {
            ExamState::Configuring => {}
            ExamState::Generating => return Err(GenerationError::AlreadyGenerating.into()),
            _ => return Err(AppError::InvalidTransition("只能在填写表单时生成试卷")),
        }

        if let Err(e) = self.config.validate() {
            self.error = Some(e.to_string());
            return Err(e.into());
        }

        self.error = None;
        self.session = None;
        self.state = ExamState::Generating;
        Ok(self.config.clone())
    }

    /// 处理生成结果
    ///
    /// 成功进入 `InProgress`；失败回到 `Configuring`，表单内容保持不变
    pub fn finish_generation(
        &mut self,
        result: Result<Vec<Question>, GenerationError>,
    ) -> AppResult<()> {
        self.ensure_state(ExamState::Generating, "没有进行中的生成请求")?;

        match result.and_then(|questions| ExamSession::new(questions, self.config.difficulty)) {
            Ok(session) => {
                info!("▶️ 开始作答，共 {} 题", session.total());
                self.session = Some(session);
                self.state = ExamState::InProgress;
                Ok(())
            }
            Err(e) => {
                warn!("❌ 生成题目失败: {}", e);
                self.error = Some(e.to_string());
                self.session = None;
                self.state = ExamState::Configuring;
                Err(e.into())
            }
        }
    }

    /// 校验、请求、解析一步完成
    pub async fn generate(&mut self, generator: &QuestionGenerator) -> AppResult<()> {
        let config = self.begin_generation()?;
        let result = generator.generate(&config).await;
        self.finish_generation(result)
    }

    // ========== 作答 ==========

    /// 选择答案，返回是否生效
    pub fn select(&mut self, letter: OptionLetter) -> bool {
        match (self.state, self.session.as_mut()) {
            (ExamState::InProgress, Some(session)) => session.select(letter),
            _ => false,
        }
    }

    /// 主动推进到下一题（或结束）
    pub fn advance(&mut self) -> AppResult<AdvanceOutcome> {
        let outcome = self
            .active_session()?
            .advance()
            .ok_or(AppError::InvalidTransition("考试已结束"))?;
        self.apply(outcome);
        Ok(outcome)
    }

    /// 倒计时走一秒
    pub fn tick(&mut self) -> AppResult<TickOutcome> {
        let outcome = self
            .active_session()?
            .tick()
            .ok_or(AppError::InvalidTransition("考试已结束"))?;
        if let TickOutcome::Expired(advance) = outcome {
            info!("⏰ 时间到，按未作答处理");
            self.apply(advance);
        }
        Ok(outcome)
    }

    // ========== 完成后 ==========

    /// 丢弃当前题目，回到表单
    pub fn new_exam(&mut self) -> AppResult<()> {
        self.ensure_state(ExamState::Completed, "只能在考试完成后新建试卷")?;
        self.session = None;
        self.error = None;
        self.state = ExamState::Configuring;
        Ok(())
    }

    /// 用同一套题重新作答
    pub fn retry(&mut self) -> AppResult<()> {
        self.ensure_state(ExamState::Completed, "只能在考试完成后重新作答")?;
        if let Some(session) = self.session.as_mut() {
            session.restart();
        }
        self.state = ExamState::InProgress;
        info!("🔁 重新作答同一套题");
        Ok(())
    }

    fn apply(&mut self, outcome: AdvanceOutcome) {
        if let AdvanceOutcome::Completed {
            score,
            total,
            percentage,
            badge,
        } = outcome
        {
            self.state = ExamState::Completed;
            if let Some(session) = &self.session {
                log_exam_completed(score, total, percentage, badge, session.started_at());
            }
        }
    }

    fn active_session(&mut self) -> AppResult<&mut ExamSession> {
        match (self.state, self.session.as_mut()) {
            (ExamState::InProgress, Some(session)) => Ok(session),
            _ => Err(AppError::InvalidTransition("当前没有进行中的考试")),
        }
    }

    fn ensure_state(&self, expected: ExamState, message: &'static str) -> AppResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(AppError::InvalidTransition(message))
        }
    }
}

impl Default for ExamRunner {
    fn default() -> Self {
        Self::new(ExamConfig::default())
    }
}
