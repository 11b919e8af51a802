//! 题目生成服务 - 业务能力层
//!
//! 负责"按配置生成一套题"：构建提示词 → 调用文本生成客户端 → 解析文本
//!
//! 不关心计时和计分，也不做重试

use tracing::{debug, info, warn};

use crate::clients::TextGenerator;
use crate::error::GenerationError;
use crate::models::exam_config::ExamConfig;
use crate::models::question::Question;
use crate::services::question_parser::parse_questions;
use crate::utils::logging::truncate_text;

/// 题目生成服务
pub struct QuestionGenerator {
    client: Box<dyn TextGenerator>,
}

impl QuestionGenerator {
    pub fn new(client: Box<dyn TextGenerator>) -> Self {
        Self { client }
    }

    /// 生成题目
    ///
    /// 调用方需先通过 [`ExamConfig::validate`]。返回的题目至少有一道，
    /// 任何失败都不会带出部分结果
    pub async fn generate(&self, config: &ExamConfig) -> Result<Vec<Question>, GenerationError> {
        let prompt = build_prompt(config);
        info!(
            "📝 正在生成 {} 道 {} 难度题目，主题: {} (模型: {})",
            config.question_count,
            config.difficulty,
            truncate_text(&config.topic, 40),
            self.client.name()
        );

        let raw_text = self.client.generate(&prompt).await?;
        debug!("响应文本: {}", truncate_text(&raw_text, 200));

        let questions = parse_questions(&raw_text);
        if questions.is_empty() {
            warn!("⚠️ 响应中没有解析到题目");
            return Err(GenerationError::NoQuestions);
        }

        if questions.len() != config.question_count as usize {
            debug!(
                "请求 {} 道题，实际解析到 {} 道",
                config.question_count,
                questions.len()
            );
        }

        info!("✓ 成功生成 {} 道题目", questions.len());
        Ok(questions)
    }
}

/// 构建提示词，要求服务按固定模板返回
pub fn build_prompt(config: &ExamConfig) -> String {
    format!(
        r#"Generate {} {} multiple-choice questions about "{}".
Format each question as:
Q: [question text]
A: [correct answer]
B: [option]
C: [option]
D: [option]
Answer: [correct letter]"#,
        config.question_count,
        config.difficulty.name(),
        config.topic.trim()
    )
}
