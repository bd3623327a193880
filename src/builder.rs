//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::fs::{self, File};
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};

use crate::api::{DateMode, OutputLayout};
use crate::error::SheetJsonError;
use crate::formatter::CellFormatter;
use crate::grid::SpanReader;
use crate::output::{DocumentAssembler, OutputDocument, SheetExtract};
use crate::parser::{WorkbookFormat, WorkbookParser};
use crate::table::TableExtractor;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone, Default)]
pub(crate) struct ConversionConfig {
    /// 出力レイアウト
    pub layout: OutputLayout,

    /// 出力ディレクトリ（Noneの場合は入力ファイルと同じディレクトリ）
    pub output_dir: Option<PathBuf>,

    /// インデント付きで出力するか
    pub pretty: bool,

    /// 日付エポック（Noneの場合はワークブックから検出）
    pub date_mode: Option<DateMode>,
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetjson::{ConverterBuilder, OutputLayout};
///
/// # fn main() -> Result<(), sheetjson::SheetJsonError> {
/// let converter = ConverterBuilder::new()
///     .with_layout(OutputLayout::Workbook)
///     .with_output_dir("out")
///     .with_pretty(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 出力レイアウト: シートごと
    /// - 出力先: 入力ファイルと同じディレクトリ
    /// - JSON: コンパクト
    /// - 日付エポック: ワークブックから検出
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 出力レイアウトを指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use sheetjson::{ConverterBuilder, OutputLayout};
    ///
    /// // ワークブック全体を1ファイルに集約
    /// let builder = ConverterBuilder::new()
    ///     .with_layout(OutputLayout::Workbook);
    /// ```
    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.config.layout = layout;
        self
    }

    /// 出力ディレクトリを指定する
    ///
    /// 存在しないディレクトリは書き込み時に作成されます。
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    /// インデント付きJSONで出力するかを指定する
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    /// 日付エポックを固定する
    ///
    /// 指定しない場合はワークブックの設定（1900年/1904年）を検出して使用します。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use sheetjson::{ConverterBuilder, DateMode};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_date_mode(DateMode::Epoch1904);
    /// ```
    pub fn with_date_mode(mut self, date_mode: DateMode) -> Self {
        self.config.date_mode = Some(date_mode);
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)`: 設定が有効な場合、Converterインスタンス
    /// * `Err(SheetJsonError::Config)`: 出力ディレクトリとして指定されたパスが
    ///   ディレクトリ以外のものとして存在する場合
    pub fn build(self) -> Result<Converter, SheetJsonError> {
        if let Some(dir) = &self.config.output_dir {
            if dir.as_os_str().is_empty() {
                return Err(SheetJsonError::Config(
                    "Output directory must not be empty".to_string(),
                ));
            }
            if dir.exists() && !dir.is_dir() {
                return Err(SheetJsonError::Config(format!(
                    "Output path is not a directory: {}",
                    dir.display()
                )));
            }
        }

        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// ワークブックをJSONドキュメントに変換するためのメインエントリーポイントです。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetjson::ConverterBuilder;
///
/// # fn main() -> Result<(), sheetjson::SheetJsonError> {
/// let converter = ConverterBuilder::new().build()?;
/// let written = converter.convert_path("data/items.xlsx")?;
/// for path in written {
///     println!("{}", path.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// セルフォーマッター
    formatter: CellFormatter,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            formatter: CellFormatter::new(),
            config,
        }
    }

    /// ワークブックを出力ドキュメントに変換する（ファイルには書き込まない）
    ///
    /// # 引数
    ///
    /// * `input` - ワークブックを読み込むためのリーダー
    /// * `file_name` - 入力ファイル名。拡張子でリーダーを選択し、拡張子を除いた部分を
    ///   ドキュメント名の接頭辞に使用します
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<OutputDocument>)` - 出力ドキュメント（シートの宣言順）
    /// * `Err(SheetJsonError)` - ワークブックを開けない、または解析に失敗した場合
    ///
    /// # 処理フロー
    ///
    /// 1. WorkbookParserの初期化（日付エポックの検出を含む）
    /// 2. 各シートについて処理（宣言順）
    ///    - シートの読み込み
    ///    - ヘッダー行とレコードの抽出
    /// 3. 出力レイアウトに応じたドキュメントの組み立て
    pub fn convert<R: Read>(
        &self,
        input: R,
        file_name: &str,
    ) -> Result<Vec<OutputDocument>, SheetJsonError> {
        let path = Path::new(file_name);
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut parser = WorkbookParser::open(input, WorkbookFormat::from_path(path))?;
        if !parser.format().supports_merges() {
            log::debug!(
                "{:?} workbooks carry no merge information; reading cells unmerged",
                parser.format()
            );
        }

        let date_mode = self.config.date_mode.unwrap_or_else(|| parser.date_mode());
        log::debug!("Using date mode {:?}", date_mode);

        let mut sheets = Vec::new();
        for sheet_name in parser.sheet_names() {
            let worksheet = parser.read_worksheet(&sheet_name)?;
            let reader = SpanReader::new(&worksheet, &self.formatter, date_mode);
            let table = TableExtractor::new(reader).extract();

            match &table {
                Some(table) => log::debug!(
                    "Sheet '{}': {} header fields, {} rows",
                    sheet_name,
                    table.header.len(),
                    table.data.len()
                ),
                None => log::debug!("Sheet '{}': no non-blank rows", sheet_name),
            }

            sheets.push(SheetExtract {
                name: worksheet.name,
                table,
            });
        }

        Ok(DocumentAssembler::from_layout(self.config.layout).assemble(&stem, sheets))
    }

    /// ワークブックファイルを変換し、JSONファイルを書き込む
    ///
    /// 出力先は設定された出力ディレクトリ、未設定の場合は入力ファイルと同じディレクトリです。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<PathBuf>)` - 書き込んだファイルのパス
    /// * `Err(SheetJsonError)` - 読み込み・変換・書き込みのいずれかに失敗した場合
    pub fn convert_path(&self, input: impl AsRef<Path>) -> Result<Vec<PathBuf>, SheetJsonError> {
        let input = input.as_ref();
        let file_name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let documents = self.convert(File::open(input)?, &file_name)?;

        let output_dir = match &self.config.output_dir {
            Some(dir) => dir.clone(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        self.write_documents(&documents, &output_dir)
    }

    /// 出力ドキュメントをディレクトリに書き込む
    ///
    /// 同名のファイルは上書きされます。
    pub fn write_documents(
        &self,
        documents: &[OutputDocument],
        dir: &Path,
    ) -> Result<Vec<PathBuf>, SheetJsonError> {
        if documents.is_empty() {
            log::info!("No table data found; nothing written");
            return Ok(Vec::new());
        }

        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }

        let mut written = Vec::with_capacity(documents.len());
        for document in documents {
            let path = dir.join(&document.file_name);
            let mut writer = BufWriter::new(File::create(&path)?);
            document.render(&mut writer, self.config.pretty)?;
            log::info!("Wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converter_builder_new() {
        let builder = ConverterBuilder::new();
        assert_eq!(builder.config.layout, OutputLayout::PerSheet);
        assert!(builder.config.output_dir.is_none());
        assert!(!builder.config.pretty);
        assert!(builder.config.date_mode.is_none());
    }

    #[test]
    fn test_builder_method_chaining() {
        let builder = ConverterBuilder::new()
            .with_layout(OutputLayout::Workbook)
            .with_output_dir("out")
            .with_pretty(true)
            .with_date_mode(DateMode::Epoch1904);

        assert_eq!(builder.config.layout, OutputLayout::Workbook);
        assert_eq!(builder.config.output_dir, Some(PathBuf::from("out")));
        assert!(builder.config.pretty);
        assert_eq!(builder.config.date_mode, Some(DateMode::Epoch1904));
    }

    #[test]
    fn test_build_success() {
        assert!(ConverterBuilder::new().build().is_ok());

        // 存在しないディレクトリは書き込み時に作成されるので有効
        let dir = tempfile::tempdir().unwrap();
        let result = ConverterBuilder::new()
            .with_output_dir(dir.path().join("not_yet_created"))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_build_with_file_as_output_dir() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = ConverterBuilder::new().with_output_dir(file.path()).build();
        match result {
            Err(SheetJsonError::Config(msg)) => {
                assert!(msg.contains("not a directory"));
            }
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_with_empty_output_dir() {
        let result = ConverterBuilder::new().with_output_dir("").build();
        assert!(matches!(result, Err(SheetJsonError::Config(_))));
    }

    #[test]
    fn test_convert_with_invalid_input() {
        let converter = ConverterBuilder::new().build().unwrap();
        let result = converter.convert(std::io::Cursor::new(Vec::new()), "empty.xlsx");
        assert!(result.is_err());
    }

    #[test]
    fn test_write_documents_empty_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let converter = ConverterBuilder::new().build().unwrap();
        let written = converter.write_documents(&[], dir.path()).unwrap();
        assert!(written.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
