//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use calamine::{Data, Dimensions};
use indexmap::IndexMap;
use serde::Serialize;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    /// 空セル
    Empty,

    /// エラー値（例: #DIV/0!）。正規化後は常に空文字列
    Error,

    /// 数値（f64）
    Number(f64),

    /// 論理値
    Bool(bool),

    /// 日付シリアル値（エポックはワークブック単位で別途指定）
    Date(f64),

    /// ISO 8601形式の日時文字列（ODS）
    IsoDateTime(String),

    /// ISO 8601形式の期間文字列（ODS）
    IsoDuration(String),

    /// 文字列
    Text(String),
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::Date(dt.as_f64()),
            Data::DateTimeIso(s) => CellValue::IsoDateTime(s.clone()),
            Data::DurationIso(s) => CellValue::IsoDuration(s.clone()),
            Data::Error(_) => CellValue::Error,
            Data::Empty => CellValue::Empty,
        }
    }
}

/// セル結合範囲（終端は排他的）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MergeRect {
    pub first_row: u32,
    pub end_row: u32,
    pub first_col: u32,
    pub end_col: u32,
}

impl MergeRect {
    /// 新しい結合範囲を生成
    pub fn new(first_row: u32, end_row: u32, first_col: u32, end_col: u32) -> Self {
        Self {
            first_row,
            end_row,
            first_col,
            end_col,
        }
    }
}

impl From<&Dimensions> for MergeRect {
    /// calamineの`Dimensions`は終端を含むため、排他的な終端に変換する
    fn from(dims: &Dimensions) -> Self {
        Self::new(dims.start.0, dims.end.0 + 1, dims.start.1, dims.end.1 + 1)
    }
}

/// ワークシート1枚分のセルデータ
///
/// セルは絶対座標（0始まり）で稠密に保持します。使用範囲外の座標は空セルとして扱います。
#[derive(Debug, Clone)]
pub(crate) struct Worksheet {
    /// シート名（宣言どおりの完全な名前）
    pub name: String,

    /// セルデータ（行 × 列）
    pub cells: Vec<Vec<CellValue>>,

    /// 列数
    pub width: u32,

    /// セル結合範囲のリスト
    pub merges: Vec<MergeRect>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl Worksheet {
    /// 行データからワークシートを生成
    ///
    /// 列数はもっとも長い行に合わせます。
    pub fn new(name: impl Into<String>, cells: Vec<Vec<CellValue>>, merges: Vec<MergeRect>) -> Self {
        let width = cells.iter().map(|row| row.len()).max().unwrap_or(0) as u32;
        Self {
            name: name.into(),
            cells,
            width,
            merges,
        }
    }

    /// 行数を取得
    pub fn height(&self) -> u32 {
        self.cells.len() as u32
    }

    /// 指定座標のセルを取得（範囲外は空セル）
    pub fn cell(&self, row: u32, col: u32) -> &CellValue {
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// ヘッダーフィールド
///
/// 複数の物理列を占めることがある名前付きフィールドです（`end`は排他的）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeaderField {
    pub name: String,
    pub start: u32,
    pub end: u32,
}

/// 1行分のレコード
///
/// ヘッダー名 → フィールドが占める物理列ごとの正規化済み文字列。キーはヘッダー順を保持します。
pub type RowRecord = IndexMap<String, Vec<String>>;

/// シート1枚分のテーブル
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetTable {
    /// ファイルスコープ名（`<stem>_<シート識別子>`）
    pub name: String,

    /// クラス名（シート名またはシート識別子）
    pub class: String,

    /// ヘッダー名のリスト（出現順）
    pub header: Vec<String>,

    /// 行レコードのリスト
    pub data: Vec<RowRecord>,
}

/// ワークブック1冊分の集約テーブル
///
/// `header`と`data`はクラス名をキーとし、シートの宣言順を保持します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkbookTable {
    /// 先頭シートのファイルスコープ名
    pub name: String,

    /// 先頭シートの完全なシート名
    pub main: String,

    /// クラス名 → ヘッダー名のリスト
    pub header: IndexMap<String, Vec<String>>,

    /// クラス名 → 行レコードのリスト
    pub data: IndexMap<String, Vec<RowRecord>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_from_data() {
        assert_eq!(CellValue::from(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(CellValue::from(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(
            CellValue::from(&Data::String("abc".to_string())),
            CellValue::Text("abc".to_string())
        );
        assert_eq!(CellValue::from(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            CellValue::from(&Data::Error(calamine::CellErrorType::Div0)),
            CellValue::Error
        );
        assert_eq!(CellValue::from(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_merge_rect_from_dimensions() {
        // B1:D2（終端を含む）→ 行0..2、列1..4
        let dims = Dimensions {
            start: (0, 1),
            end: (1, 3),
        };
        let rect = MergeRect::from(&dims);
        assert_eq!(rect, MergeRect::new(0, 2, 1, 4));
    }

    #[test]
    fn test_worksheet_width_and_height() {
        let sheet = Worksheet::new(
            "Sheet1",
            vec![
                vec![CellValue::Empty],
                vec![CellValue::Empty, CellValue::Empty, CellValue::Empty],
            ],
            Vec::new(),
        );
        assert_eq!(sheet.height(), 2);
        assert_eq!(sheet.width, 3);
    }

    #[test]
    fn test_worksheet_cell_out_of_range() {
        let sheet = Worksheet::new(
            "Sheet1",
            vec![vec![CellValue::Text("a".to_string())]],
            Vec::new(),
        );
        assert_eq!(sheet.cell(0, 0), &CellValue::Text("a".to_string()));
        assert_eq!(sheet.cell(0, 5), &CellValue::Empty);
        assert_eq!(sheet.cell(9, 0), &CellValue::Empty);
    }

    #[test]
    fn test_sheet_table_serialization_keeps_header_order() {
        let mut record = RowRecord::new();
        record.insert("zeta".to_string(), vec!["1".to_string()]);
        record.insert("alpha".to_string(), vec!["2".to_string(), "3".to_string()]);

        let table = SheetTable {
            name: "book_Sheet".to_string(),
            class: "Sheet".to_string(),
            header: vec!["zeta".to_string(), "alpha".to_string()],
            data: vec![record],
        };

        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(
            json,
            r#"{"name":"book_Sheet","class":"Sheet","header":["zeta","alpha"],"data":[{"zeta":["1"],"alpha":["2","3"]}]}"#
        );
    }
}
