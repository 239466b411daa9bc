pub mod http;

use crate::error::BridgeError;
use reqwest::Url;
use std::future::Future;
use std::pin::Pin;

pub use http::HttpTransport;

// 通知1件の完了を表すFuture。URLとフィールドを所有するので呼び出し元より長生きできる
#[cfg(not(target_arch = "wasm32"))]
pub type TransportFuture = Pin<Box<dyn Future<Output = Result<(), BridgeError>> + Send + 'static>>;

// wasm32ではfetchのFutureがSendでない
#[cfg(target_arch = "wasm32")]
pub type TransportFuture = Pin<Box<dyn Future<Output = Result<(), BridgeError>> + 'static>>;

/// コールバックエンドポイントへの送信口
pub trait CallbackTransport {
    /// `fields` を `application/x-www-form-urlencoded` でPOSTする
    fn post_form(&self, url: &Url, fields: Vec<(&'static str, String)>) -> TransportFuture;
}
