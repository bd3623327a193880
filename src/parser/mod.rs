//! Parser Module
//!
//! calamineを使用したワークブック解析の実装。
//! 拡張子からリーダーを選択し、ワークシートをセルの稠密グリッドと結合範囲に展開します。

mod metadata;
mod workbook;

use std::path::Path;

pub(crate) use metadata::WorkbookMetadata;
pub(crate) use workbook::WorkbookParser;

/// ワークブック形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkbookFormat {
    /// BIFF（.xls）
    Xls,
    /// Office Open XML（.xlsx/.xlsm/.xlam）
    Xlsx,
    /// バイナリOffice Open XML（.xlsb）
    Xlsb,
    /// OpenDocument（.ods）
    Ods,
}

impl WorkbookFormat {
    /// 拡張子から形式を判定
    ///
    /// 大文字小文字は区別しません。未知の拡張子は`None`（内容から判定）。
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xls" | "xla" => Some(Self::Xls),
            "xlsx" | "xlsm" | "xlam" => Some(Self::Xlsx),
            "xlsb" => Some(Self::Xlsb),
            "ods" => Some(Self::Ods),
            _ => None,
        }
    }

    /// 結合範囲を読み取れる形式かどうか
    pub fn supports_merges(self) -> bool {
        matches!(self, Self::Xls | Self::Xlsx)
    }
}
