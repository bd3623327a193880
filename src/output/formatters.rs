//! Output Formatters Implementation
//!
//! 出力レイアウトごとのドキュメント組み立てを提供するモジュール。

use indexmap::IndexMap;

use crate::output::{scoped_name, sheet_identifier, DocumentBody, OutputDocument, SheetExtract};
use crate::types::{SheetTable, WorkbookTable};

/// シートごとに1ドキュメントを出力するフォーマッター
///
/// 非空行のないシートやデータ行のないシートも、空のheader/dataで出力します。
pub(crate) struct PerSheetFormatter;

impl PerSheetFormatter {
    pub fn assemble(&self, stem: &str, sheets: Vec<SheetExtract>) -> Vec<OutputDocument> {
        sheets
            .into_iter()
            .map(|sheet| {
                let name = scoped_name(stem, &sheet.name);
                let (header, data) = sheet
                    .table
                    .map(|table| (table.header, table.data))
                    .unwrap_or_default();

                OutputDocument {
                    file_name: format!("{}.json", name),
                    body: DocumentBody::Sheet(SheetTable {
                        name,
                        class: sheet.name,
                        header,
                        data,
                    }),
                }
            })
            .collect()
    }
}

/// ワークブック全体を1ドキュメントに集約するフォーマッター
///
/// データ行を持つシートだけが集約されます。ドキュメント名と`main`は先頭のシートで決まり、
/// クラス名は先頭のシートだけが完全なシート名、それ以外は識別子になります。
pub(crate) struct WorkbookFormatter;

impl WorkbookFormatter {
    pub fn assemble(&self, stem: &str, sheets: Vec<SheetExtract>) -> Vec<OutputDocument> {
        let Some(first) = sheets.first().map(|sheet| sheet.name.clone()) else {
            return Vec::new();
        };

        let mut header = IndexMap::new();
        let mut data = IndexMap::new();

        for (index, sheet) in sheets.into_iter().enumerate() {
            let Some(table) = sheet.table.filter(|table| !table.data.is_empty()) else {
                log::debug!("Omitting sheet '{}': no data rows", sheet.name);
                continue;
            };

            let class = if index == 0 {
                sheet.name
            } else {
                sheet_identifier(&sheet.name).to_string()
            };

            header.insert(class.clone(), table.header);
            data.insert(class, table.data);
        }

        if data.is_empty() {
            return Vec::new();
        }

        let name = scoped_name(stem, &first);
        vec![OutputDocument {
            file_name: format!("{}.json", name),
            body: DocumentBody::Workbook(WorkbookTable {
                name,
                main: first,
                header,
                data,
            }),
        }]
    }
}
