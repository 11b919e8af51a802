//! 文本生成服务客户端
//!
//! 只负责"把一段提示词变成一段文本"，不认识题目格式

pub mod gemini_client;
pub mod openai_client;

use futures::future::BoxFuture;

use crate::config::{Config, LlmProvider};
use crate::error::GenerationError;

pub use gemini_client::GeminiClient;
pub use openai_client::OpenAiClient;

/// 文本生成能力
///
/// 返回 boxed future，方便以 `Box<dyn TextGenerator>` 的形式按配置切换实现
pub trait TextGenerator: Send + Sync {
    /// 发送提示词，返回生成的原始文本
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>>;

    /// 用于日志的名称
    fn name(&self) -> &str;
}

/// 按配置创建客户端
pub fn build_generator(config: &Config) -> Result<Box<dyn TextGenerator>, GenerationError> {
    let client: Box<dyn TextGenerator> = match config.llm_provider {
        LlmProvider::Gemini => Box::new(GeminiClient::new(config)?),
        LlmProvider::OpenAi => Box::new(OpenAiClient::new(config)),
    };
    Ok(client)
}
