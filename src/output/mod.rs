//! Output Module
//!
//! 出力レイアウトの抽象化と、ドキュメントのJSONシリアライズを提供するモジュール。

mod formatters;

use std::io::Write;

use serde::Serialize;

use crate::api::OutputLayout;
use crate::error::SheetJsonError;
use crate::table::ExtractedTable;
use crate::types::{SheetTable, WorkbookTable};

pub(crate) use formatters::{PerSheetFormatter, WorkbookFormatter};

/// ワークシート1枚分の抽出結果（宣言順に並べて渡す）
#[derive(Debug, Clone)]
pub(crate) struct SheetExtract {
    /// シート名（完全な名前）
    pub name: String,

    /// 抽出されたテーブル（非空行がなければ`None`）
    pub table: Option<ExtractedTable>,
}

/// 出力ドキュメントの本体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DocumentBody {
    /// シートごとのテーブル
    Sheet(SheetTable),

    /// ワークブック全体の集約テーブル
    Workbook(WorkbookTable),
}

/// 出力ドキュメント
///
/// 書き込み先のファイル名（ディレクトリを含まない）と本体の組です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    /// ファイル名（`<stem>_<シート識別子>.json`）
    pub file_name: String,

    /// ドキュメント本体
    pub body: DocumentBody,
}

impl OutputDocument {
    /// ドキュメントをJSONとして書き込む
    ///
    /// 非ASCII文字はエスケープせずUTF-8のまま出力します。
    ///
    /// # 引数
    ///
    /// * `writer` - 出力先のライター
    /// * `pretty` - インデント付きで出力するかどうか
    pub fn render<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), SheetJsonError> {
        if pretty {
            serde_json::to_writer_pretty(&mut *writer, &self.body)?;
        } else {
            serde_json::to_writer(&mut *writer, &self.body)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// ドキュメントをJSON文字列に変換
    pub fn to_json(&self, pretty: bool) -> Result<String, SheetJsonError> {
        let mut buffer = Vec::new();
        self.render(&mut buffer, pretty)?;
        Ok(String::from_utf8(buffer).map_err(|e| e.utf8_error())?)
    }
}

/// ドキュメント組み立て（Strategy Pattern）
///
/// 出力レイアウトごとの組み立て方をenumとして表現します。
#[derive(Debug, Clone, Copy)]
pub(crate) enum DocumentAssembler {
    PerSheet,
    Workbook,
}

impl DocumentAssembler {
    /// 出力レイアウトから組み立て方を選択
    pub fn from_layout(layout: OutputLayout) -> Self {
        match layout {
            OutputLayout::PerSheet => DocumentAssembler::PerSheet,
            OutputLayout::Workbook => DocumentAssembler::Workbook,
        }
    }

    /// 抽出結果を出力ドキュメントにまとめる
    ///
    /// # 引数
    ///
    /// * `stem` - 入力ファイル名の拡張子を除いた部分
    /// * `sheets` - 宣言順に並んだワークシートの抽出結果
    pub fn assemble(&self, stem: &str, sheets: Vec<SheetExtract>) -> Vec<OutputDocument> {
        match self {
            DocumentAssembler::PerSheet => PerSheetFormatter.assemble(stem, sheets),
            DocumentAssembler::Workbook => WorkbookFormatter.assemble(stem, sheets),
        }
    }
}

/// シート名からシート識別子を取り出す（最後の`.`より後ろ、なければ全体）
pub(crate) fn sheet_identifier(sheet_name: &str) -> &str {
    match sheet_name.rfind('.') {
        Some(pos) => &sheet_name[pos + 1..],
        None => sheet_name,
    }
}

/// ファイルスコープ名（`<stem>_<シート識別子>`）
pub(crate) fn scoped_name(stem: &str, sheet_name: &str) -> String {
    format!("{}_{}", stem, sheet_identifier(sheet_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RowRecord;

    #[test]
    fn test_sheet_identifier() {
        assert_eq!(sheet_identifier("Config.Items"), "Items");
        assert_eq!(sheet_identifier("a.b.Items"), "Items");
        assert_eq!(sheet_identifier("Items"), "Items");
        assert_eq!(sheet_identifier("Trailing."), "");
    }

    #[test]
    fn test_scoped_name() {
        assert_eq!(scoped_name("data", "Config.Items"), "data_Items");
        assert_eq!(scoped_name("data", "Monsters"), "data_Monsters");
    }

    #[test]
    fn test_render_compact_preserves_non_ascii() {
        let mut record = RowRecord::new();
        record.insert("名前".to_string(), vec!["スライム".to_string()]);

        let document = OutputDocument {
            file_name: "book_敵.json".to_string(),
            body: DocumentBody::Sheet(SheetTable {
                name: "book_敵".to_string(),
                class: "敵".to_string(),
                header: vec!["名前".to_string()],
                data: vec![record],
            }),
        };

        let json = document.to_json(false).unwrap();
        assert_eq!(
            json,
            r#"{"name":"book_敵","class":"敵","header":["名前"],"data":[{"名前":["スライム"]}]}"#
        );
    }

    #[test]
    fn test_render_pretty() {
        let document = OutputDocument {
            file_name: "b_S.json".to_string(),
            body: DocumentBody::Sheet(SheetTable {
                name: "b_S".to_string(),
                class: "S".to_string(),
                header: Vec::new(),
                data: Vec::new(),
            }),
        };

        let json = document.to_json(true).unwrap();
        assert!(json.starts_with("{\n  \"name\": \"b_S\""));
        assert!(json.contains("\"header\": []"));
    }

    #[test]
    fn test_render_escapes_control_characters() {
        let mut record = RowRecord::new();
        record.insert("text".to_string(), vec!["a\nb\t\"c\"".to_string()]);

        let document = OutputDocument {
            file_name: "b_S.json".to_string(),
            body: DocumentBody::Sheet(SheetTable {
                name: "b_S".to_string(),
                class: "S".to_string(),
                header: vec!["text".to_string()],
                data: vec![record],
            }),
        };

        let json = document.to_json(false).unwrap();
        assert!(json.contains(r#"["a\nb\t\"c\""]"#));
    }
}
