use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_FILE_PREFIX: &str = "lingo.log";
const DEFAULT_LEVEL: &str = "info";
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 3600;

/// 日志配置
///
/// 既可以通过构建器方法设置，也可以从配置文件的 `logger:` 段反序列化。
/// `level` 是 `EnvFilter` 指令，例如 `info` 或 `lingo_i18n=debug,warn`；
/// 设置了 `RUST_LOG` 环境变量时以环境变量为准。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// 日志文件前缀 (实际文件名带日期后缀，如 lingo.log.2026-10-01)
    file_prefix: String,
    log_dir: PathBuf,
    /// chrono strftime 格式
    time_format: String,
    level: String,
    console: bool,
    file: bool,
    /// 保留的最大日志文件数量，None 表示不清理
    max_files: Option<usize>,
    cleanup_interval_secs: u64,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            level: DEFAULT_LEVEL.to_string(),
            console: true,
            file: false,
            max_files: None,
            cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// 设置日志时间戳格式，参考 chrono::format::strftime
    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn enable_console(mut self, enable: bool) -> Self {
        self.console = enable;
        self
    }

    pub fn enable_file(mut self, enable: bool) -> Self {
        self.file = enable;
        self
    }

    /// 超过此数量的旧日志文件将被自动删除
    pub fn max_files(mut self, count: usize) -> Self {
        self.max_files = Some(count);
        self
    }

    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval_secs = interval.as_secs().max(1);
        self
    }

    /// 初始化日志系统
    ///
    /// 注册全局 tracing subscriber，并在配置了 `max_files` 时启动清理线程。
    /// 返回的 `WorkerGuard` 必须被持有，否则文件日志可能在退出前丢失。
    /// 已经存在全局 subscriber 时不会覆盖，只返回文件层的 guard。
    pub fn init(self) -> Option<WorkerGuard> {
        let console_layer = self.build_console_layer();
        let (file_layer, guard) = self.build_file_layer();

        if let Err(e) = Registry::default()
            .with(console_layer)
            .with(file_layer)
            .try_init()
        {
            eprintln!("lingo-logger: global subscriber already set: {e}");
        }

        self.spawn_cleanup_task_if_needed();
        debug!(level = %self.level, console = self.console, file = self.file, "logger initialized");

        guard
    }

    fn build_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    }

    fn build_console_layer<S>(&self) -> Option<impl Layer<S>>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        self.console.then(|| {
            fmt::layer()
                .with_timer(ChronoLocal::new(self.time_format.clone()))
                .with_writer(std::io::stdout)
                .with_filter(self.build_filter())
        })
    }

    fn build_file_layer<S>(&self) -> (Option<impl Layer<S>>, Option<WorkerGuard>)
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        if !self.file {
            return (None, None);
        }

        let file_appender = tracing_appender::rolling::daily(&self.log_dir, &self.file_prefix);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let layer = fmt::layer()
            .with_timer(ChronoLocal::new(self.time_format.clone()))
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(self.build_filter());

        (Some(layer), Some(guard))
    }

    fn spawn_cleanup_task_if_needed(&self) {
        let Some(max_files) = self.max_files else {
            return;
        };
        if !self.file {
            return;
        }

        let log_dir = self.log_dir.clone();
        let file_prefix = self.file_prefix.clone();
        let interval = Duration::from_secs(self.cleanup_interval_secs.max(1));

        std::thread::spawn(move || {
            loop {
                cleanup_old_logs(&log_dir, &file_prefix, max_files);
                std::thread::sleep(interval);
            }
        });
    }
}

/// 保留最新的 `max_files` 个日志文件，返回删除的文件数
///
/// 依赖滚动文件名的日期后缀 (如 `.2026-10-01`) 按字典序即按时间排序。
pub fn cleanup_old_logs(log_dir: &Path, file_prefix: &str, max_files: usize) -> usize {
    let read_dir = match std::fs::read_dir(log_dir) {
        Ok(dir) => dir,
        Err(e) => {
            if log_dir.exists() {
                error!("Failed to read log directory {}: {}", log_dir.display(), e);
            }
            return 0;
        }
    };

    let mut log_files: Vec<(PathBuf, String)> = read_dir
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let file_name = entry.file_name().into_string().ok()?;
            file_name
                .starts_with(file_prefix)
                .then(|| (entry.path(), file_name))
        })
        .collect();

    // 降序：[lingo.log.2026-10-02, lingo.log.2026-10-01, ...]
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in log_files.iter().skip(max_files) {
        match std::fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => error!("Failed to remove old log file {}: {}", path.display(), e),
        }
    }
    removed
}
