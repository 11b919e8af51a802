//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责把用户输入、倒计时和题目生成串成一个完整的终端应用。
//!
//! ## 模块划分
//!
//! ### `exam_app` - 终端考试应用
//! - 事件循环（输入 / tick / 生成结果）
//! - 持有倒计时和进行中的生成任务
//! - 每次状态变化后同步倒计时
//!
//! ### `command` - 输入解析
//! - 按当前状态把一行输入解析成命令
//!
//! ### `screen` - 界面渲染
//! - 表单、题目、完成页的文本输出
//!
//! ## 层次关系
//!
//! ```text
//! exam_app (事件循环)
//!     ↓
//! workflow::ExamRunner (状态机)
//!     ↓
//! services (能力层：生成 / 解析)
//!     ↓
//! clients + infrastructure (文本生成服务 / 倒计时)
//! ```

pub mod command;
pub mod exam_app;
pub mod screen;

// 重新导出主要类型
pub use exam_app::{App, Flow};
