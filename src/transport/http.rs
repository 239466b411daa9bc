use super::{CallbackTransport, TransportFuture};
use crate::error::BridgeError;
use reqwest::{Client, Url};

/// reqwestによるHTTP送信
/// wasm32ではブラウザのfetchがそのまま使われる
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }

    /// リクエスト単位のタイムアウト付きで作成（ネイティブのみ）
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, BridgeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl CallbackTransport for HttpTransport {
    fn post_form(&self, url: &Url, fields: Vec<(&'static str, String)>) -> TransportFuture {
        let request = self.client.post(url.clone()).form(&fields);
        let target = url.to_string();

        Box::pin(async move {
            log::debug!("POST {} ({} fields)", target, fields.len());
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(BridgeError::Status {
                    url: target,
                    status: status.as_u16(),
                });
            }
            log::debug!("POST {} -> {}", target, status);
            Ok(())
        })
    }
}
