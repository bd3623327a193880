//! Grid Module
//!
//! セル結合情報の索引と、結合範囲を考慮したセル読み取りを提供するモジュール。

use std::collections::HashMap;

use crate::api::DateMode;
use crate::formatter::CellFormatter;
use crate::types::{MergeRect, Worksheet};

/// セル結合の索引
///
/// 行 → (開始列 → 終了列（排他的）) の2段のマッピングです。
/// 縦方向に結合されたブロックでも、ブロック内のどの行から引いても同じ列幅が得られるよう、
/// 結合範囲のすべての行を登録します。
#[derive(Debug, Default)]
pub(crate) struct MergeIndex {
    spans: HashMap<u32, HashMap<u32, u32>>,
}

impl MergeIndex {
    /// 結合範囲のリストから索引を構築
    ///
    /// 重複は除去しません。同じ（行, 開始列）に対しては後に登録された範囲が優先されます。
    pub fn build(merges: &[MergeRect]) -> Self {
        let mut spans: HashMap<u32, HashMap<u32, u32>> = HashMap::new();

        for rect in merges {
            for row in rect.first_row..rect.end_row {
                spans
                    .entry(row)
                    .or_default()
                    .insert(rect.first_col, rect.end_col);
            }
        }

        Self { spans }
    }

    /// 指定された行・開始列に登録された終了列（排他的）を取得
    pub fn span_end(&self, row: u32, col: u32) -> Option<u32> {
        self.spans.get(&row).and_then(|cols| cols.get(&col)).copied()
    }
}

/// 結合範囲を考慮したセルリーダー
///
/// ワークシート・結合索引・日付エポックを束ね、論理セル単位で正規化文字列を読み取ります。
pub(crate) struct SpanReader<'a> {
    sheet: &'a Worksheet,
    merges: MergeIndex,
    formatter: &'a CellFormatter,
    date_mode: DateMode,
}

impl<'a> SpanReader<'a> {
    /// 新しいSpanReaderを生成
    ///
    /// 結合索引はここで1度だけ構築されます。
    pub fn new(sheet: &'a Worksheet, formatter: &'a CellFormatter, date_mode: DateMode) -> Self {
        Self {
            sheet,
            merges: MergeIndex::build(&sheet.merges),
            formatter,
            date_mode,
        }
    }

    /// 論理セルを読み取る
    ///
    /// # 引数
    ///
    /// * `row` - 行インデックス
    /// * `col` - 開始列インデックス
    ///
    /// # 戻り値
    ///
    /// （正規化文字列, 終了列（排他的））のペア。
    /// 結合索引に登録がなければ1列分です。文字列は範囲内のすべての物理列の正規化値を
    /// 連結したもので、どの列に値が入っていても取り出せます。
    pub fn read_span(&self, row: u32, col: u32) -> (String, u32) {
        // 不正な結合範囲でもカーソルは必ず前進させる
        let end = self
            .merges
            .span_end(row, col)
            .map_or(col + 1, |end| end.max(col + 1));

        let mut content = String::new();
        for c in col..end {
            content.push_str(&self.read_cell(row, c));
        }

        (content, end)
    }

    /// 物理セル1つを正規化して読み取る
    pub fn read_cell(&self, row: u32, col: u32) -> String {
        self.formatter
            .format_cell(self.sheet.cell(row, col), self.date_mode)
    }

    /// 行のすべての列が空文字列に正規化されるかを判定
    pub fn is_blank_row(&self, row: u32) -> bool {
        (0..self.sheet.width).all(|col| self.read_cell(row, col).is_empty())
    }

    /// 読み取り対象のワークシート
    pub fn sheet(&self) -> &Worksheet {
        self.sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_merge_index_covers_every_row() {
        // 行1..4、列2..5の縦横結合
        let index = MergeIndex::build(&[MergeRect::new(1, 4, 2, 5)]);

        assert_eq!(index.span_end(0, 2), None);
        assert_eq!(index.span_end(1, 2), Some(5));
        assert_eq!(index.span_end(2, 2), Some(5));
        assert_eq!(index.span_end(3, 2), Some(5));
        assert_eq!(index.span_end(4, 2), None);
        // 開始列以外からは引けない
        assert_eq!(index.span_end(1, 3), None);
    }

    #[test]
    fn test_merge_index_last_registered_wins() {
        let index = MergeIndex::build(&[MergeRect::new(0, 1, 0, 3), MergeRect::new(0, 2, 0, 2)]);

        assert_eq!(index.span_end(0, 0), Some(2));
        assert_eq!(index.span_end(1, 0), Some(2));
    }

    #[test]
    fn test_read_span_single_column() {
        let sheet = Worksheet::new("S", vec![vec![text("a"), text("b")]], Vec::new());
        let formatter = CellFormatter::new();
        let reader = SpanReader::new(&sheet, &formatter, DateMode::Epoch1900);

        assert_eq!(reader.read_span(0, 0), ("a".to_string(), 1));
        assert_eq!(reader.read_span(0, 1), ("b".to_string(), 2));
    }

    #[test]
    fn test_read_span_concatenates_merged_columns() {
        // 値が結合範囲の左上以外の列にあっても取り出せる
        let sheet = Worksheet::new(
            "S",
            vec![vec![CellValue::Empty, text("x"), CellValue::Empty, text("z")]],
            vec![MergeRect::new(0, 1, 0, 3)],
        );
        let formatter = CellFormatter::new();
        let reader = SpanReader::new(&sheet, &formatter, DateMode::Epoch1900);

        assert_eq!(reader.read_span(0, 0), ("x".to_string(), 3));
        assert_eq!(reader.read_span(0, 3), ("z".to_string(), 4));
    }

    #[test]
    fn test_read_span_beyond_used_area() {
        let sheet = Worksheet::new("S", vec![vec![text("a")]], vec![MergeRect::new(0, 1, 0, 4)]);
        let formatter = CellFormatter::new();
        let reader = SpanReader::new(&sheet, &formatter, DateMode::Epoch1900);

        assert_eq!(reader.read_span(0, 0), ("a".to_string(), 4));
        assert_eq!(reader.read_span(7, 7), (String::new(), 8));
    }

    #[test]
    fn test_read_span_degenerate_merge_advances() {
        let sheet = Worksheet::new("S", vec![vec![text("a"), text("b")]], Vec::new());
        let formatter = CellFormatter::new();
        let mut reader = SpanReader::new(&sheet, &formatter, DateMode::Epoch1900);
        reader.merges = MergeIndex::build(&[MergeRect::new(0, 1, 1, 1)]);

        assert_eq!(reader.read_span(0, 1), ("b".to_string(), 2));
    }

    #[test]
    fn test_is_blank_row() {
        let sheet = Worksheet::new(
            "S",
            vec![
                vec![CellValue::Empty, text("   "), CellValue::Error],
                vec![CellValue::Empty, CellValue::Empty, CellValue::Number(0.0)],
            ],
            Vec::new(),
        );
        let formatter = CellFormatter::new();
        let reader = SpanReader::new(&sheet, &formatter, DateMode::Epoch1900);

        assert!(reader.is_blank_row(0));
        assert!(!reader.is_blank_row(1));
        assert!(reader.is_blank_row(2));
    }
}
