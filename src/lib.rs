pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod transport;
pub mod widget;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;

// 通知の実行先（tokioかブラウザのイベントループ）がどちらも無い組み合わせ
#[cfg(not(any(
    all(feature = "native", not(target_arch = "wasm32")),
    all(feature = "wasm", target_arch = "wasm32")
)))]
compile_error!("enable `native` for native targets or `wasm` for wasm32");

use std::env;

pub use bridge::EventBridge;
pub use dispatch::Delivery;
pub use config::{BridgeConfig, CallbackEndpoints};
pub use error::BridgeError;
pub use event::{BridgeEvent, CallbackKind};
pub use transport::{CallbackTransport, HttpTransport, TransportFuture};
pub use widget::CirclesWidget;

// ========================================
// コマンドライン引数構造体
// ========================================

/// 送信するイベント（ネイティブ版CLI用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Group { cluster_id: String, doc_list: Vec<String> },
    Cleared,
    Document { document_id: String },
}

impl CliCommand {
    pub fn into_event(self) -> BridgeEvent {
        match self {
            CliCommand::Group { cluster_id, doc_list } => BridgeEvent::GroupSelected { cluster_id, doc_list },
            CliCommand::Cleared => BridgeEvent::SelectionCleared,
            CliCommand::Document { document_id } => BridgeEvent::DocumentSelected { document_id },
        }
    }
}

/// コマンドライン引数の設定
#[derive(Debug)]
pub struct CliArgs {
    pub quiet: bool, // panic以外のログを抑制
    pub log_level: LogLevel,
    pub show_help: bool,
    pub selection_callback: Option<String>,
    pub selection_cleared_callback: Option<String>,
    pub document_clicked_callback: Option<String>,
    /// リクエストのタイムアウト（秒）
    pub timeout_secs: Option<u64>,
    pub command: Option<CliCommand>,
    /// 解釈できなかった引数
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Off,      // ログを一切表示しない（panicは除く）
    Error,    // エラーレベルのみ
    Warn,     // 警告レベル以上
    Info,     // 情報レベル以上
    Debug,    // デバッグレベル以上
    Trace,    // 全てのログ
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            quiet: false,
            log_level: LogLevel::Info,
            show_help: false,
            selection_callback: None,
            selection_cleared_callback: None,
            document_clicked_callback: None,
            timeout_secs: None,
            command: None,
            errors: Vec::new(),
        }
    }
}

impl CliArgs {
    /// フラグ優先、なければ環境変数（CIRCLES_*）から設定を組み立てる
    #[cfg(not(target_arch = "wasm32"))]
    pub fn bridge_config(&self) -> Result<BridgeConfig, BridgeError> {
        self.bridge_config_with(|key| env::var(key).ok())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn bridge_config_with<F>(&self, env_lookup: F) -> Result<BridgeConfig, BridgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        BridgeConfig::from_lookup(|key| {
            let flag = match key {
                config::ENV_SELECTION_CALLBACK => self.selection_callback.clone(),
                config::ENV_SELECTION_CLEARED_CALLBACK => self.selection_cleared_callback.clone(),
                config::ENV_DOCUMENT_CLICKED_CALLBACK => self.document_clicked_callback.clone(),
                _ => None,
            };
            flag.or_else(|| env_lookup(key))
        })
    }
}

pub fn parse_args() -> CliArgs {
    parse_args_from(env::args().skip(1))
}

pub fn parse_args_from<I, S>(args: I) -> CliArgs
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut cli_args = CliArgs::default();
    let mut positional = Vec::new();

    for arg in args {
        let arg: String = arg.into();
        match arg.as_str() {
            "--quiet" | "-q" => {
                cli_args.quiet = true;
                cli_args.log_level = LogLevel::Off;
            }
            "--log-level=off" => cli_args.log_level = LogLevel::Off,
            "--log-level=error" => cli_args.log_level = LogLevel::Error,
            "--log-level=warn" => cli_args.log_level = LogLevel::Warn,
            "--log-level=info" => cli_args.log_level = LogLevel::Info,
            "--log-level=debug" => cli_args.log_level = LogLevel::Debug,
            "--log-level=trace" => cli_args.log_level = LogLevel::Trace,
            "--help" | "-h" => cli_args.show_help = true,
            _ => {
                if let Some(v) = arg.strip_prefix("--selection-callback=") {
                    cli_args.selection_callback = Some(v.to_string());
                } else if let Some(v) = arg.strip_prefix("--selection-cleared-callback=") {
                    cli_args.selection_cleared_callback = Some(v.to_string());
                } else if let Some(v) = arg.strip_prefix("--document-clicked-callback=") {
                    cli_args.document_clicked_callback = Some(v.to_string());
                } else if let Some(v) = arg.strip_prefix("--timeout=") {
                    match v.parse() {
                        Ok(secs) => cli_args.timeout_secs = Some(secs),
                        Err(_) => cli_args.errors.push(format!("invalid timeout: {}", v)),
                    }
                } else if arg.starts_with("--") {
                    cli_args.errors.push(format!("unknown option: {}", arg));
                } else {
                    positional.push(arg);
                }
            }
        }
    }

    let mut positional = positional.into_iter();
    cli_args.command = match positional.next().as_deref() {
        None => None,
        Some("group") => match positional.next() {
            Some(cluster_id) => Some(CliCommand::Group {
                cluster_id,
                doc_list: positional.by_ref().collect(),
            }),
            None => {
                cli_args.errors.push("group requires a cluster id".to_string());
                None
            }
        },
        Some("cleared") => Some(CliCommand::Cleared),
        Some("document") => match positional.next() {
            Some(document_id) => Some(CliCommand::Document { document_id }),
            None => {
                cli_args.errors.push("document requires a document id".to_string());
                None
            }
        },
        Some(other) => {
            cli_args.errors.push(format!("unknown event: {}", other));
            None
        }
    };
    let extra: Vec<String> = positional.collect();
    if !extra.is_empty() {
        cli_args.errors.push(format!("unexpected arguments: {}", extra.join(" ")));
    }

    cli_args
}

pub fn show_help() {
    println!("Circles Bridge callback sender

USAGE:
    circles_bridge [OPTIONS] <EVENT>

EVENTS:
    group <clusterId> [docId...]   Send a group selection
    cleared                        Send a selection-cleared notification
    document <documentId>          Send a document click

OPTIONS:
    --selection-callback=URL           Group selection endpoint (env: CIRCLES_SELECTION_CALLBACK)
    --selection-cleared-callback=URL   Selection cleared endpoint (env: CIRCLES_SELECTION_CLEARED_CALLBACK)
    --document-clicked-callback=URL    Document click endpoint (env: CIRCLES_DOCUMENT_CLICKED_CALLBACK)
    --timeout=SECS                     Request timeout
    --quiet, -q                        Suppress all logs except panics
    --log-level=LEVEL                  Set log level (off/error/warn/info/debug/trace)
    --help, -h                         Show this help");
}

impl LogLevel {
    pub fn filter(&self) -> log::LevelFilter {
        use log::LevelFilter;

        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// ロガーの設定を組み立てる（初期化はしない）
fn logger_builder(log_level: &LogLevel) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log_level.filter());

    if matches!(log_level, LogLevel::Off) {
        // quietモード：panic以外は何も出さない
        builder.format(|_, _| Ok(()));
    } else {
        // HTTPクライアントの下回りは送信1件ごとに大量に出すので警告以上に絞る
        for noisy in ["hyper", "hyper_util", "rustls"] {
            builder.filter_module(noisy, log::LevelFilter::Warn);
        }
        builder.format_timestamp_secs();
    }
    builder
}

/// ログレベルを初期化する関数
pub fn init_logger(log_level: &LogLevel) {
    use std::sync::Once;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // 既に別のロガーが入っていれば何もしない
        logger_builder(log_level).try_init().ok();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group_command() {
        let args = parse_args_from([
            "--selection-callback=http://h/s",
            "--log-level=debug",
            "group",
            "c7",
            "d1",
            "d2",
        ]);

        assert!(args.errors.is_empty());
        assert_eq!(args.log_level, LogLevel::Debug);
        assert_eq!(args.selection_callback.as_deref(), Some("http://h/s"));
        assert_eq!(
            args.command,
            Some(CliCommand::Group {
                cluster_id: "c7".to_string(),
                doc_list: vec!["d1".to_string(), "d2".to_string()],
            })
        );
    }

    #[test]
    fn test_parse_quiet_and_cleared() {
        let args = parse_args_from(["-q", "cleared"]);
        assert!(args.quiet);
        assert_eq!(args.log_level, LogLevel::Off);
        assert_eq!(args.command, Some(CliCommand::Cleared));
        assert_eq!(args.command.unwrap().into_event(), BridgeEvent::SelectionCleared);
    }

    #[test]
    fn test_parse_errors_are_collected() {
        let args = parse_args_from(["--bogus", "--timeout=soon", "document"]);
        assert_eq!(args.errors.len(), 3);
        assert!(args.command.is_none());

        let args = parse_args_from(["cleared", "extra"]);
        assert_eq!(args.errors, vec!["unexpected arguments: extra".to_string()]);
    }

    #[test]
    fn test_flags_override_environment() {
        let args = parse_args_from([
            "--selection-callback=http://flag/s",
            "--document-clicked-callback=http://flag/d",
            "document",
            "doc-1",
        ]);

        let config = args
            .bridge_config_with(|key| match key {
                config::ENV_SELECTION_CALLBACK => Some("http://env/s".to_string()),
                config::ENV_SELECTION_CLEARED_CALLBACK => Some("http://env/c".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.endpoints.selection.as_str(), "http://flag/s");
        assert_eq!(config.endpoints.selection_cleared.as_str(), "http://env/c");
        assert_eq!(
            config.endpoints.document_clicked.map(|u| u.to_string()),
            Some("http://flag/d".to_string())
        );
    }

    #[test]
    fn test_quiet_logger_is_silent() {
        let logger = logger_builder(&LogLevel::Off).build();
        assert_eq!(logger.filter(), log::LevelFilter::Off);
    }

    #[test]
    fn test_http_internals_are_capped_at_warn() {
        use log::{Level, Log, Metadata};

        let logger = logger_builder(&LogLevel::Trace).build();
        let at = |target: &str, level: Level| {
            logger.enabled(&Metadata::builder().target(target).level(level).build())
        };

        assert!(!at("hyper_util::client::legacy", Level::Debug));
        assert!(at("hyper_util::client::legacy", Level::Warn));
        assert!(at("circles_bridge::bridge", Level::Trace));
    }
}
