//! 日志初始化

use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// 已安装订阅器的过滤器句柄，读取配置后再调整日志级别
pub struct LogHandle {
    filter: Option<reload::Handle<EnvFilter, Registry>>,
}

impl LogHandle {
    /// 切换详细模式（设置了 `RUST_LOG` 时保持不变）
    pub fn set_verbose(&self, verbose: bool) {
        if let Some(handle) = &self.filter {
            if let Err(e) = handle.reload(build_filter(verbose)) {
                tracing::warn!("调整日志级别失败: {}", e);
            }
        }
    }

    /// 本次调用是否真正安装了订阅器
    pub fn is_installed(&self) -> bool {
        self.filter.is_some()
    }
}

/// 优先使用 `RUST_LOG`，否则默认 `info`（详细模式下为 `debug`）
fn build_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 安装全局日志订阅器
///
/// 重复初始化（例如测试中）时忽略错误，返回的句柄不做任何事
pub fn init(verbose: bool) -> LogHandle {
    let (filter, handle) = reload::Layer::new(build_filter(verbose));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .is_ok();

    LogHandle {
        filter: installed.then_some(handle),
    }
}
