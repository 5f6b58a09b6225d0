use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocscanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    /// バックエンドが失敗を返した（メッセージは表示用に正規化済み）
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] docscan_common::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("アップロードするファイルが指定されていません")]
    NothingToUpload,
}

impl DocscanError {
    /// バナーに出す1行メッセージ
    ///
    /// バックエンド由来のメッセージはそのまま、それ以外は `fallback`。
    pub fn banner_message(&self, fallback: &str) -> String {
        match self {
            DocscanError::Api { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocscanError>;
