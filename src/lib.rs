//! # MCQ Exam
//!
//! 一个在终端里生成并作答选择题试卷的 Rust 应用程序
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（倒计时任务），只暴露能力
//! - `clients/` - 文本生成服务客户端（Gemini / OpenAI 兼容）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `QuestionGenerator` - 构建提示词并生成题目
//! - `question_parser` - 把响应文本切分成题目
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义一次考试的完整状态流转
//! - `ExamSession` - 作答数据（题号、选择、得分、剩余时间）
//! - `ExamRunner` - 状态机（Configuring → Generating → InProgress → Completed）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 终端事件循环、输入解析、界面渲染
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{build_generator, TextGenerator};
pub use config::Config;
pub use error::{AppError, AppResult, GenerationError, ValidationError};
pub use infrastructure::Countdown;
pub use models::{Badge, Difficulty, ExamConfig, OptionLetter, Question};
pub use orchestrator::App;
pub use services::QuestionGenerator;
pub use workflow::{ExamRunner, ExamSession, ExamState};
