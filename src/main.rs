use clap::Parser;
use dialoguer::MultiSelect;
use docscan::api::{HttpApi, ScanApi};
use docscan::desk::Desk;
use docscan::{cli, config, error, input, output, summary};
use docscan_common::{ItemKind, PdfReport, ScannerKind, SelectionSet, SlotOutcome};
use cli::{Cli, Commands};
use config::Config;
use error::{DocscanError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("✖ {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "docscan=debug,docscan_common=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;

    let command = match cli.command {
        Commands::Config { set_api_url, show } => {
            return configure(&mut config, set_api_url, show, cli.api_url.as_deref());
        }
        command => command,
    };

    let api_url = config.resolve_api_url(cli.api_url.as_deref());
    let timeout = (config.timeout_seconds > 0).then(|| Duration::from_secs(config.timeout_seconds));
    let api = HttpApi::new(api_url, timeout)?;
    let output_dir = config.output_dir.clone();
    let mut desk = Desk::new(api);

    match command {
        Commands::Health => {
            let ok = desk.api().health().await?;
            if ok {
                println!("✔ バックエンド稼働中: {}", desk.api().base_url());
            } else {
                return Err(DocscanError::Api {
                    status: 503,
                    message: format!("バックエンドが応答しません: {}", desk.api().base_url()),
                });
            }
        }

        Commands::Session => {
            println!("📋 docscan - セッション\n");
            desk.load_session().await;
            let session = desk.session().cloned().ok_or_else(|| DocscanError::Api {
                status: 0,
                message: "セッションを取得できませんでした".to_string(),
            })?;
            for line in summary::session_lines(&session, desk.report()) {
                println!("{}", line);
            }
        }

        Commands::Upload { target } => {
            println!("📤 docscan - アップロード\n");
            desk.load_session().await;
            upload_all(&mut desk, &target.files()).await?;
        }

        Commands::Report { select, only, exclude, output, open } => {
            println!("📄 docscan - レポート生成\n");
            desk.load_session().await;

            let report = if select {
                if !select_interactive(&mut desk)? {
                    println!("キャンセルしました（リクエストは送信していません）");
                    return Ok(());
                }
                with_spinner("PDFを生成中...", desk.generate_selective()).await?
            } else if !only.is_empty() || !exclude.is_empty() {
                let desired = if only.is_empty() {
                    let mut set = SelectionSet::default();
                    exclude.iter().for_each(|k| set.set(*k, false));
                    set
                } else {
                    SelectionSet::only(&only)
                };
                desk.open_selection()?;
                desk.choose_selection(desired)?;
                with_spinner("PDFを生成中...", desk.generate_selective()).await?
            } else {
                with_spinner("PDFを生成中...", desk.generate_all()).await?
            };

            finish_report(&report, output.as_deref(), output_dir.as_deref(), open)?;
        }

        Commands::Reset => {
            desk.load_session().await;
            if !desk.request_reset().await? {
                return Err(banner_error(&desk));
            }
            println!("✔ セッションをリセットしました");
        }

        Commands::Run { barcode, pdf417, checkbook, card_front, card_back, output, open } => {
            println!("🚀 docscan - 一括処理\n");
            let files = cli::run_files(barcode, pdf417, checkbook, card_front, card_back);
            if files.is_empty() {
                return Err(DocscanError::NothingToUpload);
            }

            println!("[1/2] アップロード中...");
            desk.load_session().await;
            upload_all(&mut desk, &files).await?;

            println!("[2/2] PDFを生成中...");
            let report = with_spinner("PDFを生成中...", desk.generate_all()).await?;
            finish_report(&report, output.as_deref(), output_dir.as_deref(), open)?;
            println!("\n✅ 完了");
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn configure(
    config: &mut Config,
    set_api_url: Option<String>,
    show: bool,
    api_url_override: Option<&str>,
) -> Result<()> {
    if let Some(url) = set_api_url {
        config.set_api_url(url)?;
        println!("✔ バックエンドURLを設定しました");
    }
    if show {
        println!("設定:");
        println!("  バックエンドURL: {}", config.resolve_api_url(api_url_override));
        println!("  タイムアウト: {}秒", config.timeout_seconds);
        match &config.output_dir {
            Some(dir) => println!("  出力先: {}", dir.display()),
            None => println!("  出力先: カレントディレクトリ"),
        }
        println!("  設定ファイル: {}", Config::config_path()?.display());
    }
    Ok(())
}

/// 順番にアップロードし、各枠の結果パネルを表示
async fn upload_all<A: ScanApi>(desk: &mut Desk<A>, files: &[(ItemKind, PathBuf)]) -> Result<()> {
    if files.is_empty() {
        return Err(DocscanError::NothingToUpload);
    }

    let mut failed = 0;
    for (kind, path) in files {
        let file = input::load_upload(path)?;
        let scanner = ScannerKind::for_item(*kind);
        println!("- {}: {}", scanner.title(), file.file_name);

        let outcome = with_spinner(scanner.prompt(*kind), desk.upload(*kind, &file)).await?;
        match outcome {
            SlotOutcome::Applied => {
                let view = desk
                    .scanner(scanner)
                    .views()
                    .into_iter()
                    .find(|v| v.target == *kind);
                if let Some(view) = view {
                    println!("{}", view.to_text());
                }
            }
            SlotOutcome::Failed(message) => {
                eprintln!("⚠ {}", message);
                failed += 1;
            }
            SlotOutcome::Stale { .. } => {}
        }
    }

    if failed > 0 {
        return Err(banner_error(desk));
    }
    println!("✔ {}件アップロード完了\n", files.len());
    Ok(())
}

/// 登録済みの項目をチェックボックスで選ぶ。Esc/q は `false`（キャンセル）
fn select_interactive<A: ScanApi>(desk: &mut Desk<A>) -> Result<bool> {
    desk.open_selection()?;

    let current = desk.report().selection();
    let offered = desk
        .session()
        .map(|s| s.uploaded_kinds())
        .unwrap_or_default();
    let labels: Vec<&str> = offered.iter().map(|k| k.label()).collect();
    let defaults: Vec<bool> = offered.iter().map(|k| current.get(*k)).collect();

    let chosen = MultiSelect::new()
        .with_prompt("レポートに含める項目（Space: 切替 / Enter: 生成 / Esc: キャンセル）")
        .items(&labels)
        .defaults(&defaults)
        .interact_opt()
        .map_err(|e| DocscanError::Prompt(e.to_string()))?;

    match chosen {
        Some(indices) => {
            let chosen: Vec<ItemKind> = indices.iter().filter_map(|i| offered.get(*i).copied()).collect();
            desk.choose_selection(current.with_choice(&offered, &chosen))?;
            Ok(true)
        }
        None => {
            desk.cancel_selection()?;
            Ok(false)
        }
    }
}

fn finish_report(
    report: &PdfReport,
    output: Option<&Path>,
    output_dir: Option<&Path>,
    open: bool,
) -> Result<()> {
    let path = output::save_report(report, output, output_dir)?;
    println!("✔ PDFを保存: {}", path.display());
    if open {
        output::open_report(&path);
    }
    Ok(())
}

fn banner_error<A: ScanApi>(desk: &Desk<A>) -> DocscanError {
    DocscanError::Api {
        status: 0,
        message: desk.banner().unwrap_or("処理に失敗しました").to_string(),
    }
}

async fn with_spinner<T>(message: &str, fut: impl std::future::Future<Output = T>) -> T {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    let result = fut.await;
    bar.finish_and_clear();
    result
}
