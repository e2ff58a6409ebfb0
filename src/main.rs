use anyhow::Result;
use zecoed_assessment::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志（配置加载过程中的告警也要能输出）
    let log = logger::init(false);

    // 加载配置
    let config = Config::load()?;
    log.set_verbose(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config)?.run().await?;

    Ok(())
}
