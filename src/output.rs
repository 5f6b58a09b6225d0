//! 生成したPDFの保存と表示
//!
//! ブラウザ版の「新しいタブで開く」に相当するのが `--open`（既定ビューアで開く）。

use crate::error::Result;
use docscan_common::PdfReport;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// 保存先パスを決める
///
/// - 指定なし: `output_dir`（なければカレント）にサーバ指定のファイル名
/// - ディレクトリ or 拡張子なし: その下にサーバ指定のファイル名
/// - それ以外: 指定パスそのもの
pub fn report_path(output: Option<&Path>, output_dir: Option<&Path>, file_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() || path.extension().is_none() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => output_dir
            .unwrap_or_else(|| Path::new("."))
            .join(file_name),
    }
}

/// PDFを書き出して保存先を返す
pub fn save_report(
    report: &PdfReport,
    output: Option<&Path>,
    output_dir: Option<&Path>,
) -> Result<PathBuf> {
    let path = report_path(output, output_dir, &report.file_name);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, &report.bytes)?;
    debug!(path = %path.display(), bytes = report.bytes.len(), "PDFを保存");
    Ok(path)
}

/// OS既定のビューアで開く（失敗しても警告のみ）
pub fn open_report(path: &Path) {
    let result = viewer_command(path).spawn();
    if let Err(e) = result {
        warn!(path = %path.display(), "PDFを開けませんでした: {}", e);
    }
}

#[cfg(target_os = "windows")]
fn viewer_command(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(target_os = "macos")]
fn viewer_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn viewer_command(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_path_defaults_to_server_name() {
        let path = report_path(None, None, "scan_report.pdf");
        assert_eq!(path, PathBuf::from("./scan_report.pdf"));

        let path = report_path(None, Some(Path::new("/tmp/reports")), "r.pdf");
        assert_eq!(path, PathBuf::from("/tmp/reports/r.pdf"));
    }

    #[test]
    fn test_report_path_explicit_file_wins() {
        let path = report_path(Some(Path::new("out/mine.pdf")), None, "scan_report.pdf");
        assert_eq!(path, PathBuf::from("out/mine.pdf"));
    }

    #[test]
    fn test_report_path_directory_without_extension() {
        let path = report_path(Some(Path::new("out")), None, "custom.pdf");
        assert_eq!(path, PathBuf::from("out/custom.pdf"));
    }

    #[test]
    fn test_save_report_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let report = PdfReport::new(b"%PDF-1.4".to_vec(), Some("attachment; filename=\"a.pdf\""));

        let path = save_report(&report, Some(&dir.path().join("nested")), None).unwrap();

        assert_eq!(path, dir.path().join("nested").join("a.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
    }
}
