use clap::{Parser, Subcommand};
use docscan_common::ItemKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docscan")]
#[command(about = "書類スキャン（バーコード・PDF417・小切手・カード）とレポート生成", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// バックエンドのURL（環境変数・設定ファイルより優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// セッションの内容を表示
    Session,

    /// バックエンドの死活確認
    Health,

    /// 1ファイルをアップロードして結果を表示
    Upload {
        #[command(subcommand)]
        target: UploadTarget,
    },

    /// PDFレポートを生成
    Report {
        /// 含める項目を対話的に選ぶ
        #[arg(long, conflicts_with_all = ["only", "exclude"])]
        select: bool,

        /// この項目だけを含める (barcode,pdf417,checkbook,card_front,card_back)
        #[arg(long, value_delimiter = ',', conflicts_with = "exclude")]
        only: Vec<ItemKind>,

        /// この項目を除外する
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<ItemKind>,

        /// 出力ファイル/ディレクトリ（デフォルト: サーバ指定のファイル名）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 生成後に既定のビューアで開く
        #[arg(long)]
        open: bool,
    },

    /// セッションを破棄
    Reset,

    /// アップロードからレポート生成まで一括実行
    Run {
        #[arg(long)]
        barcode: Option<PathBuf>,

        #[arg(long)]
        pdf417: Option<PathBuf>,

        #[arg(long)]
        checkbook: Option<PathBuf>,

        #[arg(long)]
        card_front: Option<PathBuf>,

        #[arg(long)]
        card_back: Option<PathBuf>,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 生成後に既定のビューアで開く
        #[arg(long)]
        open: bool,
    },

    /// 設定を表示/編集
    Config {
        /// バックエンドURLを保存
        #[arg(long)]
        set_api_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum UploadTarget {
    /// 1次元バーコード画像
    Barcode { file: PathBuf },

    /// 免許証裏面などのPDF417画像
    Pdf417 { file: PathBuf },

    /// 小切手画像
    Checkbook { file: PathBuf },

    /// カード画像（表・裏は別々に送信）
    Card {
        #[arg(long)]
        front: Option<PathBuf>,

        #[arg(long)]
        back: Option<PathBuf>,
    },
}

impl UploadTarget {
    /// 送信順に (枠, パス) を並べる
    pub fn files(&self) -> Vec<(ItemKind, PathBuf)> {
        match self {
            UploadTarget::Barcode { file } => vec![(ItemKind::Barcode, file.clone())],
            UploadTarget::Pdf417 { file } => vec![(ItemKind::Pdf417, file.clone())],
            UploadTarget::Checkbook { file } => vec![(ItemKind::Checkbook, file.clone())],
            UploadTarget::Card { front, back } => [
                (ItemKind::CardFront, front),
                (ItemKind::CardBack, back),
            ]
            .into_iter()
            .filter_map(|(kind, path)| path.clone().map(|p| (kind, p)))
            .collect(),
        }
    }
}

/// `run` の引数から送信リストを作る
pub fn run_files(
    barcode: Option<PathBuf>,
    pdf417: Option<PathBuf>,
    checkbook: Option<PathBuf>,
    card_front: Option<PathBuf>,
    card_back: Option<PathBuf>,
) -> Vec<(ItemKind, PathBuf)> {
    [
        (ItemKind::Barcode, barcode),
        (ItemKind::Pdf417, pdf417),
        (ItemKind::Checkbook, checkbook),
        (ItemKind::CardFront, card_front),
        (ItemKind::CardBack, card_back),
    ]
    .into_iter()
    .filter_map(|(kind, path)| path.map(|p| (kind, p)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_only_list() {
        let cli = Cli::parse_from(["docscan", "report", "--only", "barcode,card-back"]);
        match cli.command {
            Commands::Report { only, select, .. } => {
                assert!(!select);
                assert_eq!(only, vec![ItemKind::Barcode, ItemKind::CardBack]);
            }
            _ => panic!("expected report"),
        }
    }

    #[test]
    fn test_select_conflicts_with_lists() {
        let result = Cli::try_parse_from(["docscan", "report", "--select", "--only", "barcode"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_upload_card_sides() {
        let cli = Cli::parse_from(["docscan", "upload", "card", "--back", "b.jpg"]);
        match cli.command {
            Commands::Upload { target } => {
                assert_eq!(target.files(), vec![(ItemKind::CardBack, PathBuf::from("b.jpg"))]);
            }
            _ => panic!("expected upload"),
        }
    }

    #[test]
    fn test_global_api_url() {
        let cli = Cli::parse_from(["docscan", "session", "--api-url", "http://scan:9000"]);
        assert_eq!(cli.api_url.as_deref(), Some("http://scan:9000"));
    }

    #[test]
    fn test_run_files_keeps_order() {
        let files = run_files(
            None,
            Some(PathBuf::from("l.jpg")),
            None,
            Some(PathBuf::from("f.jpg")),
            None,
        );
        assert_eq!(
            files.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            vec![ItemKind::Pdf417, ItemKind::CardFront]
        );
    }
}
