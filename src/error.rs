use thiserror::Error;

use crate::models::exam_config::{MAX_QUESTIONS, MIN_QUESTIONS};

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 表单校验错误
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// 题目生成错误
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 终端读写错误
    #[error("终端读写失败: {0}")]
    Io(#[from] std::io::Error),
    /// 状态机收到了当前状态不接受的操作
    #[error("当前状态不允许此操作: {0}")]
    InvalidTransition(&'static str),
}

/// 表单校验错误
///
/// 文本直接展示给用户，所以保持英文原样
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 主题为空或只有空白
    #[error("Please enter a topic.")]
    EmptyTopic,
    /// 题目数量超出范围
    #[error("Please select between {} and {} questions.", MIN_QUESTIONS, MAX_QUESTIONS)]
    QuestionCountOutOfRange { count: u32 },
}

/// 题目生成错误
///
/// 所有变体对用户来说都是同一种"生成失败"，区别只体现在日志和消息文本里
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 网络请求失败
    #[error("{message}")]
    RequestFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// 服务返回非成功状态
    #[error("{}", .message.as_deref().unwrap_or("Failed to fetch questions"))]
    BadStatus { status: u16, message: Option<String> },
    /// 响应中找不到生成的文本
    #[error("Unexpected response format")]
    UnexpectedFormat,
    /// 文本中一道题也解析不出来
    #[error("No questions found")]
    NoQuestions,
    /// 已有请求在进行中
    #[error("Questions are already being generated.")]
    AlreadyGenerating,
}

impl GenerationError {
    /// 创建网络请求失败错误
    pub fn request_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        GenerationError::RequestFailed {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: &'static str,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 未知的 LLM 提供方
    #[error("未知的 LLM 提供方: {0}")]
    UnknownProvider(String),
    /// 未知的难度
    #[error("未知的难度: {0}")]
    UnknownDifficulty(String),
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
