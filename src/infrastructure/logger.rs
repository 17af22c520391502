//! 日志基础设施

use anyhow::Result;
use std::io;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// 初始化日志系统
///
/// - 按日期分割的文件日志写入 `log_path`
/// - `console_output` 为 true 时同时输出到控制台
/// - 日志级别取配置值，设置了 `RUST_LOG` 时以环境变量为准
///
/// 返回的 guard 必须在进程生命周期内持有，否则文件日志会丢失。
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    // 创建日志目录
    std::fs::create_dir_all(&config.log_path)?;

    // 创建文件日志 appender（按日期分割）
    let file_appender = rolling::daily(&config.log_path, &config.file_prefix);
    let (non_blocking, guard) = non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let console_layer = config
        .console_output
        .then(|| fmt::layer().with_writer(io::stdout).with_ansi(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            // 文件日志层
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false) // 文件中不使用颜色
                .with_target(false)
                .with_thread_names(true),
        )
        .with(console_layer)
        .try_init()?;

    Ok(guard)
}
