//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// sheetjsonクレート全体で使用するエラー型
///
/// ワークブックの読み込み、解析、JSON出力処理中に発生するすべてのエラーを
/// 統一的に扱うために使用されます。
///
/// 空のシート、ヘッダーのないシート、末尾の単独バックスラッシュなどの
/// データ形状の異常はエラーにはならず、抽出処理の中でスキップされます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetjson::SheetJsonError;
/// use std::fs::File;
///
/// fn open_book(path: &str) -> Result<File, SheetJsonError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(file)
/// }
/// ```
#[derive(Error, Debug)]
pub enum SheetJsonError {
    /// I/O操作中に発生したエラー
    ///
    /// ワークブックの読み込み失敗、JSONファイルの書き込み失敗などです。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックの解析中に発生したエラー（calamine由来）
    ///
    /// ファイル形式が不正、破損したファイル、拡張子と内容の不一致などが原因となります。
    #[error("Failed to parse workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// JSONのシリアライズに失敗したエラー
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8文字列の変換エラー
    ///
    /// `xl/workbook.xml`の属性値がUTF-8として不正な場合に発生します。
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// ZIPアーカイブの解析エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時、または出力先が決定できない場合に発生します。
    ///
    /// ```rust,no_run
    /// use sheetjson::{ConverterBuilder, SheetJsonError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_output_dir("Cargo.toml")  // ディレクトリではない
    ///     .build();
    ///
    /// if let Err(SheetJsonError::Config(msg)) = result {
    ///     println!("設定エラー: {}", msg);
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// ZIP bomb、パストラバーサル、入力ファイルサイズ上限などの違反です。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: SheetJsonError = io_err.into();

        match error {
            SheetJsonError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert_eq!(e.to_string(), "File not found");
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_parse_error_display() {
        let error: SheetJsonError = calamine::Error::Msg("Corrupted file").into();

        let error_msg = error.to_string();
        assert!(error_msg.contains("Failed to parse workbook"));
        assert!(error_msg.contains("Corrupted file"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: SheetJsonError = json_err.into();
        assert!(matches!(error, SheetJsonError::Json(_)));
        assert!(error.to_string().starts_with("JSON serialization error"));
    }

    // エラー変換のテスト（?演算子の動作確認）
    #[test]
    fn test_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), SheetJsonError> {
            let _file = std::fs::File::open("nonexistent_book.xlsx")?;
            Ok(())
        }

        match io_operation() {
            Err(SheetJsonError::Io(_)) => {}
            _ => panic!("Expected Io error from ? operator"),
        }
    }

    #[test]
    fn test_all_error_formats() {
        let io_err: SheetJsonError = io::Error::other("test io").into();
        assert!(io_err.to_string().starts_with("IO error"));

        let zip_err = SheetJsonError::Zip("bad header".to_string());
        assert!(zip_err.to_string().starts_with("ZIP archive error"));

        let config_err = SheetJsonError::Config("test config".to_string());
        assert!(config_err.to_string().starts_with("Configuration error"));

        let security_err = SheetJsonError::SecurityViolation("too big".to_string());
        assert!(security_err.to_string().starts_with("Security violation"));
    }
}
