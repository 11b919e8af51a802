/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use chrono::{DateTime, Local};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::badge::Badge;

/// 初始化 tracing 日志
///
/// 默认级别 `info`（`verbose_logging` 时为 `debug`），`RUST_LOG` 优先。
/// 日志写到 stderr，避免和 stdout 上的考试界面混在一起
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mcq_exam={}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 选择题考试生成器");
    info!(
        "🤖 提供方: {:?} | 模型: {}",
        config.llm_provider, config.llm_model_name
    );
    info!("{}", "=".repeat(60));
}

/// 记录考试完成信息
///
/// # 参数
/// - `score`: 答对数量
/// - `total`: 题目总数
/// - `percentage`: 得分率
/// - `badge`: 徽章
/// - `started_at`: 本轮开始时间
pub fn log_exam_completed(
    score: usize,
    total: usize,
    percentage: u32,
    badge: Badge,
    started_at: DateTime<Local>,
) {
    let finished_at = Local::now();
    let elapsed = finished_at.signed_duration_since(started_at);
    info!("{}", "─".repeat(60));
    info!("📊 考试完成: {}/{} ({}%) - {}", score, total, percentage, badge);
    info!(
        "完成时间: {} | 用时 {} 秒",
        finished_at.format("%Y-%m-%d %H:%M:%S"),
        elapsed.num_seconds()
    );
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
