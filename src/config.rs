use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::exam_config::{clamp_question_count, Difficulty, ExamConfig};

/// 默认配置文件名（存在时才读取）
pub const DEFAULT_CONFIG_FILE: &str = "mcq_exam.toml";

/// 文本生成服务提供方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Gemini generateContent 接口
    Gemini,
    /// 兼容 OpenAI 的 chat completion 接口
    OpenAi,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(LlmProvider::Gemini),
            "openai" => Ok(LlmProvider::OpenAi),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    // --- LLM 配置 ---
    pub llm_provider: LlmProvider,
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 表单默认值 ---
    pub default_difficulty: Difficulty,
    pub default_question_count: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose_logging: false,
            request_timeout_secs: 60,
            llm_provider: LlmProvider::Gemini,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            llm_model_name: "gemini-2.0-flash".to_string(),
            default_difficulty: Difficulty::Easy,
            default_question_count: 5,
        }
    }
}

/// TOML 配置文件内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    verbose_logging: Option<bool>,
    request_timeout_secs: Option<u64>,
    llm: Option<FileLlmConfig>,
    exam: Option<FileExamConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct FileLlmConfig {
    provider: Option<LlmProvider>,
    api_key: Option<String>,
    api_base_url: Option<String>,
    model_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileExamConfig {
    difficulty: Option<Difficulty>,
    question_count: Option<u32>,
}

impl Config {
    /// 加载配置：默认值 < 配置文件 < 环境变量
    ///
    /// 配置文件路径取 `MCQ_EXAM_CONFIG`，未设置时尝试当前目录下的 `mcq_exam.toml`
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var("MCQ_EXAM_CONFIG") {
            Ok(path) => Self::from_toml_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };
        config.with_env_overrides()
    }

    /// 只使用默认值和环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件读取，未出现的字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(v) = file.verbose_logging {
            config.verbose_logging = v;
        }
        if let Some(v) = file.request_timeout_secs {
            config.request_timeout_secs = v;
        }
        if let Some(llm) = file.llm {
            if let Some(v) = llm.provider {
                config.llm_provider = v;
            }
            if let Some(v) = llm.api_key {
                config.llm_api_key = v;
            }
            if let Some(v) = llm.api_base_url {
                config.llm_api_base_url = v;
            }
            if let Some(v) = llm.model_name {
                config.llm_model_name = v;
            }
        }
        if let Some(exam) = file.exam {
            if let Some(v) = exam.difficulty {
                config.default_difficulty = v;
            }
            if let Some(v) = exam.question_count {
                config.default_question_count = clamp_question_count(&v.to_string());
            }
        }
        Ok(config)
    }

    fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let default = self;
        Ok(Self {
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(default.request_timeout_secs),
            llm_provider: env_parse("LLM_PROVIDER", "gemini|openai")?
                .unwrap_or(default.llm_provider),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL")
                .unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            default_difficulty: env_parse("EXAM_DIFFICULTY", "easy|medium|hard")?
                .unwrap_or(default.default_difficulty),
            default_question_count: std::env::var("EXAM_QUESTION_COUNT")
                .ok()
                .map(|v| clamp_question_count(&v))
                .unwrap_or(default.default_question_count),
        })
    }

    /// 表单初始值
    pub fn initial_exam_config(&self) -> ExamConfig {
        ExamConfig::new(
            String::new(),
            self.default_difficulty,
            self.default_question_count,
        )
    }
}

/// 读取并解析环境变量，未设置时返回 `None`
fn env_parse<T: FromStr>(var_name: &str, expected_type: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type,
            }),
        Err(_) => Ok(None),
    }
}
