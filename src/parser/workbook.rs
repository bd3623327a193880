//! Workbook Parser Module
//!
//! calamineのラッパーとして、ワークブックを開きワークシートを読み込む。

use std::io::{Cursor, Read};

use calamine::{open_workbook_auto_from_rs, Data, Ods, Range, Reader, Sheets, Xls, Xlsb, Xlsx};

use crate::api::DateMode;
use crate::error::SheetJsonError;
use crate::parser::{WorkbookFormat, WorkbookMetadata};
use crate::security::SecurityConfig;
use crate::types::{CellValue, MergeRect, Worksheet};

/// ワークブックパーサー
///
/// 入力全体をメモリに読み込み、形式ごとのcalamineリーダーで開きます。
pub(crate) struct WorkbookParser {
    /// calamineのワークブック
    workbook: Sheets<Cursor<Vec<u8>>>,
    /// 実際に開いた形式
    format: WorkbookFormat,
    /// コンテナから読み取ったメタデータ
    metadata: WorkbookMetadata,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// # 引数
    ///
    /// * `reader` - ワークブックを読み込むためのリーダー
    /// * `format` - 拡張子から判定した形式（`None`の場合は内容から判定）
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックとメタデータの読み込みに成功した場合
    /// * `Err(SheetJsonError)` - 読み込みに失敗した場合、またはセキュリティ制限に違反した場合
    pub fn open<R: Read>(reader: R, format: Option<WorkbookFormat>) -> Result<Self, SheetJsonError> {
        let buffer = SecurityConfig::default().read_input(reader)?;

        // メタデータ（日付エポック）はcalamineより先に読む。ZIPの検証もここで行われる
        if let Some(format) = format {
            let metadata = WorkbookMetadata::read(&buffer, format)?;
            let workbook = Self::open_as(buffer, format)?;
            return Self::finish(workbook, format, metadata);
        }

        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer.clone()))?;
        let format = match &workbook {
            Sheets::Xls(_) => WorkbookFormat::Xls,
            Sheets::Xlsx(_) => WorkbookFormat::Xlsx,
            Sheets::Xlsb(_) => WorkbookFormat::Xlsb,
            Sheets::Ods(_) => WorkbookFormat::Ods,
        };
        let metadata = WorkbookMetadata::read(&buffer, format)?;
        Self::finish(workbook, format, metadata)
    }

    /// 指定された形式のリーダーで開く
    fn open_as(
        buffer: Vec<u8>,
        format: WorkbookFormat,
    ) -> Result<Sheets<Cursor<Vec<u8>>>, SheetJsonError> {
        let cursor = Cursor::new(buffer);
        let workbook = match format {
            WorkbookFormat::Xls => Sheets::Xls(Xls::new(cursor).map_err(calamine::Error::from)?),
            WorkbookFormat::Xlsx => Sheets::Xlsx(Xlsx::new(cursor).map_err(calamine::Error::from)?),
            WorkbookFormat::Xlsb => Sheets::Xlsb(Xlsb::new(cursor).map_err(calamine::Error::from)?),
            WorkbookFormat::Ods => Sheets::Ods(Ods::new(cursor).map_err(calamine::Error::from)?),
        };
        Ok(workbook)
    }

    fn finish(
        mut workbook: Sheets<Cursor<Vec<u8>>>,
        format: WorkbookFormat,
        metadata: WorkbookMetadata,
    ) -> Result<Self, SheetJsonError> {
        // XLSXの結合範囲はワークブック全体で1度だけ読み込む
        if let Sheets::Xlsx(xlsx) = &mut workbook {
            xlsx.load_merged_regions().map_err(calamine::Error::from)?;
        }

        log::debug!(
            "Opened workbook as {:?} (date mode: {:?})",
            format,
            metadata.date_mode
        );

        Ok(Self {
            workbook,
            format,
            metadata,
        })
    }

    /// すべてのシート名を宣言順に取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// 開いた形式
    pub fn format(&self) -> WorkbookFormat {
        self.format
    }

    /// ワークブックの日付エポック
    pub fn date_mode(&self) -> DateMode {
        self.metadata.date_mode
    }

    /// ワークシートを読み込む
    ///
    /// # 引数
    ///
    /// * `sheet_name` - シート名
    ///
    /// # 戻り値
    ///
    /// * `Ok(Worksheet)` - セルデータ（絶対座標）と結合範囲
    /// * `Err(SheetJsonError::Parse)` - シートが存在しない、または読み込みに失敗した場合
    pub fn read_worksheet(&mut self, sheet_name: &str) -> Result<Worksheet, SheetJsonError> {
        let range = self.workbook.worksheet_range(sheet_name)?;
        let cells = dense_cells(&range);
        let merges = self.merge_regions(sheet_name);

        Ok(Worksheet::new(sheet_name, cells, merges))
    }

    /// シートの結合範囲を取得
    ///
    /// 結合情報を持たない形式、または取得に失敗した場合は空リストです。
    fn merge_regions(&mut self, sheet_name: &str) -> Vec<MergeRect> {
        let regions = match &mut self.workbook {
            Sheets::Xlsx(xlsx) => match xlsx.worksheet_merge_cells(sheet_name) {
                Some(Ok(regions)) => regions,
                Some(Err(e)) => {
                    log::warn!("Failed to read merged cells of '{}': {}", sheet_name, e);
                    Vec::new()
                }
                None => Vec::new(),
            },
            Sheets::Xls(xls) => xls.worksheet_merge_cells(sheet_name).unwrap_or_default(),
            Sheets::Xlsb(_) | Sheets::Ods(_) => Vec::new(),
        };

        regions.iter().map(MergeRect::from).collect()
    }
}

/// calamineの`Range`を絶対座標の稠密グリッドに展開
///
/// `Range`は使用範囲の左上を原点とするため、その手前の行・列を空セルで埋める。
fn dense_cells(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut cells: Vec<Vec<CellValue>> = (0..start_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut values = vec![CellValue::Empty; start_col as usize];
        values.extend(row.iter().map(CellValue::from));
        cells.push(values);
    }
    cells
}
