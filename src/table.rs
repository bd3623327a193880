//! Table Module
//!
//! ワークシートからヘッダー行を特定し、行レコードを抽出するモジュール。

use std::collections::HashMap;

use crate::grid::SpanReader;
use crate::types::{HeaderField, RowRecord};

/// 抽出されたテーブル（名前付け前）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ExtractedTable {
    /// ヘッダー名のリスト（出現順、重複を含む）
    pub header: Vec<String>,

    /// 行レコードのリスト
    pub data: Vec<RowRecord>,
}

/// テーブル抽出器
///
/// 1. 先頭の空行を読み飛ばし、最初の非空行をヘッダー行とする
/// 2. ヘッダー行を左から走査し、空でない論理セルをヘッダーフィールドにする
/// 3. 以降の非空行ごとに、各フィールドの列幅分の値を列順に集める
///
/// 不正な入力に対してエラーは返さず、空行・ヘッダー外の列は黙ってスキップします。
pub(crate) struct TableExtractor<'a> {
    reader: SpanReader<'a>,
}

impl<'a> TableExtractor<'a> {
    pub fn new(reader: SpanReader<'a>) -> Self {
        Self { reader }
    }

    /// テーブルを抽出
    ///
    /// # 戻り値
    ///
    /// * `Some(ExtractedTable)` - ヘッダー行が見つかった場合（データ行は0件のこともある）
    /// * `None` - 非空行が1行もない場合
    pub fn extract(&self) -> Option<ExtractedTable> {
        let height = self.reader.sheet().height();

        let header_row = (0..height).find(|&row| !self.reader.is_blank_row(row))?;
        let (header, fields) = self.read_header(header_row);

        let data = (header_row + 1..height)
            .filter(|&row| !self.reader.is_blank_row(row))
            .map(|row| self.read_record(row, &fields))
            .collect();

        Some(ExtractedTable { header, data })
    }

    /// ヘッダー行を読み取る
    ///
    /// 空の論理セルはヘッダーにならないが、列カーソルはその幅だけ進む。
    fn read_header(&self, row: u32) -> (Vec<String>, HashMap<u32, HeaderField>) {
        let width = self.reader.sheet().width;
        let mut header = Vec::new();
        let mut fields = HashMap::new();

        let mut col = 0;
        while col < width {
            let (name, end) = self.reader.read_span(row, col);
            if !name.is_empty() {
                header.push(name.clone());
                fields.insert(
                    col,
                    HeaderField {
                        name,
                        start: col,
                        end,
                    },
                );
            }
            col = end;
        }

        (header, fields)
    }

    /// データ行を1件読み取る
    ///
    /// 結合範囲は行ごとに引き直す。カーソルがフィールドの開始列に来たら、
    /// フィールドの終了列に達するまで論理セルを読み続けて値のリストにする。
    fn read_record(&self, row: u32, fields: &HashMap<u32, HeaderField>) -> RowRecord {
        let width = self.reader.sheet().width;
        let mut record = RowRecord::new();

        let mut col = 0;
        while col < width {
            let (value, mut end) = self.reader.read_span(row, col);
            if let Some(field) = fields.get(&col) {
                let mut values = vec![value];
                while end < field.end {
                    let (next, next_end) = self.reader.read_span(row, end);
                    values.push(next);
                    end = next_end;
                }
                record.insert(field.name.clone(), values);
            }
            col = end;
        }

        record
    }
}
