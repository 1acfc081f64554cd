//! ロギング機能
//!
//! `log` ファサードの出力先として `env_logger` を初期化します。
//! `RUST_LOG` が設定されている場合はそちらが優先されます。

use log::LevelFilter;

/// 文字列からログレベルを解析
pub fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_uppercase().as_str() {
        "OFF" => Some(LevelFilter::Off),
        "TRACE" => Some(LevelFilter::Trace),
        "DEBUG" => Some(LevelFilter::Debug),
        "INFO" => Some(LevelFilter::Info),
        "WARN" | "WARNING" => Some(LevelFilter::Warn),
        "ERROR" | "ERR" => Some(LevelFilter::Error),
        _ => None,
    }
}

/// グローバルロガーを初期化
///
/// 二重初期化は無視します（テストから複数回呼ばれても良いように）。
pub fn init_logger(default_level: &str) {
    let level = parse_level(default_level).unwrap_or(LevelFilter::Info);
    let env = env_logger::Env::default().default_filter_or(level.to_string().to_lowercase());

    if env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
        .is_err()
    {
        log::debug!("ロガーは既に初期化されています");
    }
}

/// パニック時のログ記録ハンドラーを設定
pub fn set_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let message = match panic_info.payload().downcast_ref::<&str>() {
            Some(s) => *s,
            None => match panic_info.payload().downcast_ref::<String>() {
                Some(s) => s.as_str(),
                None => "Unknown panic payload",
            },
        };

        let location = match panic_info.location() {
            Some(loc) => format!(" at {}:{}", loc.file(), loc.line()),
            None => String::new(),
        };

        let thread = std::thread::current();
        log::error!(
            "スレッド '{}' でパニックが発生しました: {}{}",
            thread.name().unwrap_or("<unnamed>"),
            message,
            location
        );
    }));
}
