//! 兼容 OpenAI API 的客户端
//!
//! 使用 `async-openai` 调用 chat completion，适用于 OpenAI / Azure / Doubao 等服务

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, warn};

use crate::clients::TextGenerator;
use crate::config::Config;
use crate::error::GenerationError;

/// OpenAI 兼容客户端
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl OpenAiClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    async fn send(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!("调用 LLM API，模型: {}", self.model_name);

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(GenerationError::request_failed)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .build()
            .map_err(GenerationError::request_failed)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            GenerationError::request_failed(e)
        })?;

        debug!("LLM API 调用成功");

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(GenerationError::UnexpectedFormat)
    }
}

impl TextGenerator for OpenAiClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>> {
        self.send(prompt).boxed()
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 真实调用兼容接口，需要 LLM_PROVIDER=openai 及对应的 key / base url
    #[tokio::test]
    #[ignore]
    async fn test_openai_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env().unwrap();
        let client = OpenAiClient::new(&config);
        let text = client
            .generate("Reply with the single word: pong")
            .await
            .unwrap();
        println!("LLM 响应: {}", text);
        assert!(!text.is_empty());
    }
}
