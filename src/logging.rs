//! 日志系统配置
//!
//! 控制台输出 + 文件持久化，文件按大小滚动，启动时清理过期日志

use crate::config::LogConfig;
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// 日志文件名前缀
const LOG_FILE_PREFIX: &str = "share-relay.";
const LOG_FILE_SUFFIX: &str = ".log";
const TIMER_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// 按大小滚动的日志文件
///
/// 文件名：share-relay.YYYY-MM-DD-HHMMSS.log，滚动后追加 _1、_2 ...
struct RollingFile {
    log_dir: PathBuf,
    start_timestamp: String,
    index: u32,
    max_file_size: u64,
    written: u64,
    file: File,
}

impl RollingFile {
    fn open(log_dir: PathBuf, max_file_size: u64) -> io::Result<Self> {
        let start_timestamp = Local::now().format("%Y-%m-%d-%H%M%S").to_string();
        let file = Self::open_file(&log_dir, &start_timestamp, 0)?;
        Ok(Self {
            log_dir,
            start_timestamp,
            index: 0,
            max_file_size,
            written: 0,
            file,
        })
    }

    fn file_path(log_dir: &Path, start_timestamp: &str, index: u32) -> PathBuf {
        let name = if index == 0 {
            format!("{}{}{}", LOG_FILE_PREFIX, start_timestamp, LOG_FILE_SUFFIX)
        } else {
            format!("{}{}_{}{}", LOG_FILE_PREFIX, start_timestamp, index, LOG_FILE_SUFFIX)
        };
        log_dir.join(name)
    }

    fn open_file(log_dir: &Path, start_timestamp: &str, index: u32) -> io::Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(Self::file_path(log_dir, start_timestamp, index))
    }

    fn write_record(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_file_size {
            self.file.flush()?;
            self.index += 1;
            self.file = Self::open_file(&self.log_dir, &self.start_timestamp, self.index)?;
            self.written = 0;
        }

        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }
}

/// 线程安全的日志文件写入器
#[derive(Clone)]
pub struct LogFileWriter {
    inner: Arc<Mutex<RollingFile>>,
}

impl LogFileWriter {
    pub fn new(log_dir: PathBuf, max_file_size: u64) -> io::Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(RollingFile::open(log_dir, max_file_size)?)),
        })
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, RollingFile>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "日志文件锁已损坏"))
    }
}

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write_record(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.file.flush()
    }
}

/// 日志系统守卫
/// 必须保持存活，否则日志写入线程会终止
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// 初始化日志系统
///
/// `RUST_LOG` 优先于配置中的日志级别
pub fn init_logging(config: &LogConfig) -> LogGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(ChronoLocal::new(TIMER_FORMAT.to_string()))
        .with_ansi(true);

    let writer = if config.enabled {
        fs::create_dir_all(&config.log_dir)
            .and_then(|_| LogFileWriter::new(config.log_dir.clone(), config.max_file_size))
            .map_err(|e| eprintln!("创建日志文件失败: {:?}, 错误: {}, 回退到仅控制台输出", config.log_dir, e))
            .ok()
    } else {
        None
    };

    let Some(writer) = writer else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .init();
        info!("日志系统初始化完成（仅控制台输出）");
        return LogGuard { _file_guard: None };
    };

    let (non_blocking, file_guard) = tracing_appender::non_blocking(writer);

    // 文件输出不带 ANSI 颜色
    let file_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(ChronoLocal::new(TIMER_FORMAT.to_string()))
        .with_ansi(false)
        .with_writer(non_blocking);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!(
        "日志系统初始化完成: 目录={:?}, 保留天数={}, 级别={}, 单文件最大={:.1}MB",
        config.log_dir,
        config.retention_days,
        config.level,
        config.max_file_size as f64 / 1024.0 / 1024.0
    );

    let deleted = cleanup_old_logs(&config.log_dir, config.retention_days);
    if deleted > 0 {
        info!("已清理 {} 个过期日志文件", deleted);
    }

    LogGuard {
        _file_guard: Some(file_guard),
    }
}

/// 删除超过保留天数的日志文件，返回删除数量
fn cleanup_old_logs(log_dir: &Path, retention_days: u32) -> usize {
    let today = Local::now().date_naive();
    let retention = chrono::Duration::days(retention_days as i64);

    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("读取日志目录失败: {:?}, 错误: {}", log_dir, e);
            return 0;
        }
    };

    let mut deleted = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(date) = date_from_filename(name) else {
            continue;
        };

        if today.signed_duration_since(date) > retention {
            match fs::remove_file(&path) {
                Ok(()) => deleted += 1,
                Err(e) => tracing::warn!("删除过期日志文件失败: {:?}, 错误: {}", path, e),
            }
        }
    }
    deleted
}

/// share-relay.YYYY-MM-DD-HHMMSS[_N].log → YYYY-MM-DD
fn date_from_filename(name: &str) -> Option<chrono::NaiveDate> {
    let stem = name.strip_prefix(LOG_FILE_PREFIX)?.strip_suffix(LOG_FILE_SUFFIX)?;
    let date = stem.get(..10)?;
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_from_filename() {
        let date = date_from_filename("share-relay.2024-03-05-101112.log").unwrap();
        assert_eq!(date.to_string(), "2024-03-05");

        let date = date_from_filename("share-relay.2024-03-05-101112_3.log").unwrap();
        assert_eq!(date.to_string(), "2024-03-05");

        assert!(date_from_filename("other.2024-03-05.log").is_none());
        assert!(date_from_filename("share-relay.garbage.log").is_none());
    }

    #[test]
    fn test_rolling_file_rotates_by_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = LogFileWriter::new(dir.path().to_path_buf(), 16).unwrap();

        writer.write_all(b"0123456789\n").unwrap();
        writer.write_all(b"0123456789\n").unwrap();
        writer.write_all(b"0123456789\n").unwrap();
        writer.flush().unwrap();

        let count = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_cleanup_old_logs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("share-relay.2000-01-01-000000.log"), "old").unwrap();
        fs::write(dir.path().join("share-relay.2000-01-01-000000_1.log"), "old").unwrap();
        let fresh = format!("share-relay.{}.log", Local::now().format("%Y-%m-%d-%H%M%S"));
        fs::write(dir.path().join(&fresh), "new").unwrap();
        fs::write(dir.path().join("unrelated.txt"), "keep").unwrap();

        assert_eq!(cleanup_old_logs(dir.path(), 7), 2);
        assert!(dir.path().join(&fresh).exists());
        assert!(dir.path().join("unrelated.txt").exists());
    }
}
