// 探索トレース用の詳細ログ
//
// `vlog!` は有効時だけ整形し、`log` ファサードと任意のトレースファイルの両方へ流す。

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

const TRACE_TARGET: &str = "orbpath::trace";

static VERBOSE: AtomicBool = AtomicBool::new(false);
static TRACE_FILE: Mutex<Option<File>> = Mutex::new(None);

fn trace_file() -> MutexGuard<'static, Option<File>> {
    match TRACE_FILE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// トレースファイルを作り直して出力先にする
pub fn init_log_file<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let file = File::create(path)?;
    *trace_file() = Some(file);
    Ok(())
}

pub fn close_log_file() {
    *trace_file() = None;
}

pub fn set_verbose(on: bool) {
    VERBOSE.store(on, Ordering::Relaxed);
}

#[inline]
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// `vlog!` の出力先。1行ごとにフラッシュする
#[doc(hidden)]
pub fn write_trace(args: fmt::Arguments<'_>) {
    log::debug!(target: TRACE_TARGET, "{}", args);
    if let Some(file) = trace_file().as_mut() {
        let _ = writeln!(file, "{}", args).and_then(|_| file.flush());
    }
}

/// 詳細ログ（`set_verbose(true)` のときだけ整形される）
#[macro_export]
macro_rules! vlog {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            $crate::logging::write_trace(format_args!($($arg)*));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_reaches_file_only_while_verbose() {
        let path = std::env::temp_dir().join(format!("orbpath_trace_{}.txt", std::process::id()));
        init_log_file(&path).unwrap();
        set_verbose(true);
        crate::vlog!("step={}", 3);
        set_verbose(false);
        crate::vlog!("出力されない");
        close_log_file();
        crate::vlog!("閉じた後");

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("step=3"));
        assert!(!text.contains("出力されない"));
        assert!(!text.contains("閉じた後"));
        let _ = std::fs::remove_file(&path);
    }
}
