use crate::models::config::{LogConfig, LogFormat, LogLevel, LogOutput};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    reload::{self, Handle},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// 全局日志级别 reload handle
static LOG_LEVEL_HANDLE: OnceLock<Handle<EnvFilter, Registry>> = OnceLock::new();

/// 日志文件名前缀
const LOG_FILE_PREFIX: &str = "settings_store";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// 初始化日志系统
///
/// 日志级别可以通过 [`update_log_level`] 动态调整；
/// 格式、输出目标和文件路径需要重启进程后生效。
pub fn init_logger(config: &LogConfig) -> anyhow::Result<()> {
    let filter = create_env_filter(&config.level);
    let (filter_layer, reload_handle) = reload::Layer::new(filter);

    if LOG_LEVEL_HANDLE.set(reload_handle).is_err() {
        anyhow::bail!("日志系统已初始化，不能重复初始化");
    }

    let console = match config.output {
        LogOutput::Console | LogOutput::Both => Some(create_console_layer(config.format)),
        LogOutput::File => None,
    };
    let file = match config.output {
        LogOutput::File | LogOutput::Both => {
            Some(create_file_layer(config.format, config.file_path.as_deref())?)
        }
        LogOutput::Console => None,
    };

    Registry::default()
        .with(filter_layer)
        .with(console)
        .with(file)
        .try_init()?;

    tracing::info!(
        level = config.level.as_str(),
        format = ?config.format,
        output = ?config.output,
        file_path = ?config.file_path,
        "日志系统初始化完成"
    );

    Ok(())
}

/// 创建环境过滤器
///
/// `RUST_LOG` 优先，否则本 crate 使用配置级别，其余使用 WARN。
fn create_env_filter(level: &LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,settings_store={}", level.as_str())))
}

fn create_console_layer<S>(format: LogFormat) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(cfg!(debug_assertions))
        .with_thread_ids(false);

    match format {
        LogFormat::Text => layer.with_ansi(true).boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

fn create_file_layer<S>(format: LogFormat, file_path: Option<&str>) -> anyhow::Result<BoxedLayer<S>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let log_dir = get_log_dir(file_path)?;
    let file_appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = non_blocking(file_appender);

    // guard 需要与进程同生命周期，否则缓冲区中的日志会丢失
    Box::leak(Box::new(guard));

    let layer = fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_ansi(false);

    Ok(match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().with_thread_ids(true).boxed(),
    })
}

/// 获取日志目录
fn get_log_dir(file_path: Option<&str>) -> anyhow::Result<PathBuf> {
    let dir = match file_path {
        Some(path) => PathBuf::from(path),
        None => dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("无法获取用户主目录"))?
            .join(".settings_store")
            .join("logs"),
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// 动态更新日志级别（热重载）
pub fn update_log_level(new_level: LogLevel) -> anyhow::Result<()> {
    let handle = LOG_LEVEL_HANDLE
        .get()
        .ok_or_else(|| anyhow::anyhow!("日志系统未初始化"))?;

    handle
        .reload(create_env_filter(&new_level))
        .map_err(|e| anyhow::anyhow!("重载日志级别失败: {}", e))?;

    tracing::info!(new_level = new_level.as_str(), "日志级别已动态更新");
    Ok(())
}
