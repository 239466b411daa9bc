// コールバックエンドポイントにイベントを1件送るネイティブ版ツール
// サーバ側の受け口を手元で確かめるときに使う

use circles_bridge::{EventBridge, HttpTransport};
use log::{error, info};
use std::process::ExitCode;
use std::time::Duration;

#[tokio::main]
async fn main() -> ExitCode {
    let cli_args = circles_bridge::parse_args();

    if cli_args.show_help {
        circles_bridge::show_help();
        return ExitCode::SUCCESS;
    }

    circles_bridge::init_logger(&cli_args.log_level);

    if !cli_args.errors.is_empty() {
        for e in &cli_args.errors {
            error!("{}", e);
        }
        return ExitCode::FAILURE;
    }

    let Some(command) = cli_args.command.clone() else {
        circles_bridge::show_help();
        return ExitCode::FAILURE;
    };

    let config = match cli_args.bridge_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let transport = match cli_args.timeout_secs {
        Some(secs) => match HttpTransport::with_timeout(Duration::from_secs(secs)) {
            Ok(transport) => transport,
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => HttpTransport::new(),
    };

    let bridge = EventBridge::new(config, transport);
    let event = command.into_event();
    info!("Sending {:?}", event);

    // 成否のログは送信タスク側で出る
    match bridge.notify(event).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
