use anyhow::{Context, Result};
use mcq_exam::utils::logging;
use mcq_exam::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load().context("加载配置失败")?;

    // 初始化日志
    logging::init(config.verbose_logging);
    logging::log_startup(&config);

    // 初始化并运行应用
    let mut app = App::initialize(&config).context("初始化应用失败")?;
    app.run().await?;

    Ok(())
}
