use crate::error::BridgeError;

/// 埋め込まれたcirclesウィジェットが公開する操作
///
/// ブラウザではDOM要素（プラグインオブジェクト）のJSメソッドに対応する。
/// 呼び出しは同期的で、ウィジェット側の処理が終わるまで戻らない。
pub trait CirclesWidget {
    /// IDでグループを選択状態にする（`selectGroupById`）
    fn select_group_by_id(&self, id: &str) -> Result<(), BridgeError>;

    /// URLからデータを読み込み直す（`loadDataFromURL`）
    fn load_data_from_url(&self, url: &str) -> Result<(), BridgeError>;

    /// XML文字列からデータを読み込み直す（`loadDataFromXML`）
    /// ウィジェットの戻り値は使わない
    fn load_data_from_xml(&self, xml: &str) -> Result<(), BridgeError>;
}
