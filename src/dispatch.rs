use crate::error::BridgeError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// 送信済み通知の完了通知
///
/// 通知は作成した時点で既に走り出している。待てば成否が返り、
/// 捨てても送信はそのまま続く。
#[derive(Debug)]
pub struct Delivery {
    receiver: oneshot::Receiver<Result<(), BridgeError>>,
}

impl Delivery {
    /// 送信せずに結果だけを持つDelivery（設定不足など）
    pub fn ready(result: Result<(), BridgeError>) -> Self {
        let (sender, receiver) = oneshot::channel();
        let _ = sender.send(result);
        Self { receiver }
    }
}

impl Future for Delivery {
    type Output = Result<(), BridgeError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.unwrap_or(Err(BridgeError::Aborted)))
    }
}

/// 通知を切り離して実行する（ネイティブ版）
///
/// tokioランタイム上ならそこにspawnし、ランタイム外なら専用スレッドで回す。
/// 成否はタスク内でログに残す。
#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub fn spawn_notification<F>(label: &str, future: F) -> Delivery
where
    F: Future<Output = Result<(), BridgeError>> + Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    let label = label.to_string();
    let task = async move {
        let result = future.await;
        log_outcome(&label, &result);
        let _ = sender.send(result);
    };

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(task);
        }
        Err(_) => {
            std::thread::spawn(move || {
                match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                    Ok(rt) => rt.block_on(task),
                    // taskごと破棄されるので受信側にはAbortedが返る
                    Err(e) => log::error!("Failed to start runtime for notification: {}", e),
                }
            });
        }
    }

    Delivery { receiver }
}

/// 通知を切り離して実行する（WASM版）
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub fn spawn_notification<F>(label: &str, future: F) -> Delivery
where
    F: Future<Output = Result<(), BridgeError>> + 'static,
{
    let (sender, receiver) = oneshot::channel();
    let label = label.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        let result = future.await;
        log_outcome(&label, &result);
        let _ = sender.send(result);
    });

    Delivery { receiver }
}

/// 完了した通知の成否をログに残す
pub fn log_outcome(label: &str, result: &Result<(), BridgeError>) {
    match result {
        Ok(()) => log::info!("Notification '{}' delivered", label),
        Err(e) => log::error!("Notification '{}' failed: {}", label, e),
    }
}
