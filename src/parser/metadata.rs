//! Workbook Metadata Module
//!
//! calamineで取得できないワークブック単位の情報（日付エポック）を、
//! コンテナから直接読み取るモジュール。
//!
//! - XLSX/XLSM: `xl/workbook.xml`の`<workbookPr date1904="..."/>`
//! - XLSB: `xl/workbook.bin`の`BrtWbProp`レコード
//! - XLS: `Workbook`ストリームの`DATE1904`レコード
//!
//! ZIPコンテナ（XLSX/XLSB/ODS）はここでセキュリティ検証も受けます。

use std::io::{Cursor, Read, Seek};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::api::DateMode;
use crate::error::SheetJsonError;
use crate::parser::WorkbookFormat;
use crate::security::SecurityConfig;

/// BIFF8: ワークブックグローバルの終端
const BIFF_EOF: u16 = 0x000A;
/// BIFF8: 1904年エポックフラグ
const BIFF_DATE1904: u16 = 0x0022;
/// BIFF12: ワークブックプロパティ
const BRT_WB_PROP: usize = 0x0099;

/// ワークブックのメタデータ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct WorkbookMetadata {
    /// 日付エポック
    pub date_mode: DateMode,
}

impl WorkbookMetadata {
    /// ワークブックのバイト列からメタデータを読み取る
    ///
    /// # 引数
    ///
    /// * `buffer` - ワークブック全体のバイト列
    /// * `format` - ワークブック形式
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookMetadata)` - 読み取りに成功した場合。該当する情報がなければ1900年エポック
    /// * `Err(SheetJsonError)` - アーカイブが不正、またはセキュリティ制限に違反した場合
    pub fn read(buffer: &[u8], format: WorkbookFormat) -> Result<Self, SheetJsonError> {
        let is_1904 = match format {
            WorkbookFormat::Xlsx => Self::read_xlsx(Cursor::new(buffer))?,
            WorkbookFormat::Xlsb => Self::read_xlsb(Cursor::new(buffer))?,
            WorkbookFormat::Xls => Self::read_xls(Cursor::new(buffer))?,
            // ODSの日付はISO 8601文字列で保持されるため、エポックは使われない
            WorkbookFormat::Ods => {
                Self::open_archive(Cursor::new(buffer))?;
                false
            }
        };

        let date_mode = if is_1904 {
            DateMode::Epoch1904
        } else {
            DateMode::Epoch1900
        };
        Ok(Self { date_mode })
    }

    /// ZIPアーカイブを開き、セキュリティ検証を行う
    fn open_archive<R: Read + Seek>(reader: R) -> Result<ZipArchive<R>, SheetJsonError> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| SheetJsonError::Zip(format!("{}", e)))?;
        SecurityConfig::default().check_archive(&mut archive)?;
        Ok(archive)
    }

    /// ZIPエントリを読み込む（存在しない場合は`None`）
    fn read_entry<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        name: &str,
    ) -> Result<Option<Vec<u8>>, SheetJsonError> {
        let mut file = match archive.by_name(name) {
            Ok(file) => file,
            Err(_) => return Ok(None),
        };
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(Some(content))
    }

    /// xl/workbook.xml の解析
    fn read_xlsx<R: Read + Seek>(reader: R) -> Result<bool, SheetJsonError> {
        let mut archive = Self::open_archive(reader)?;
        match Self::read_entry(&mut archive, "xl/workbook.xml")? {
            Some(xml) => parse_workbook_xml(&xml),
            None => Ok(false),
        }
    }

    /// xl/workbook.bin の解析
    fn read_xlsb<R: Read + Seek>(reader: R) -> Result<bool, SheetJsonError> {
        let mut archive = Self::open_archive(reader)?;
        match Self::read_entry(&mut archive, "xl/workbook.bin")? {
            Some(bin) => Ok(parse_workbook_bin(&bin)),
            None => Ok(false),
        }
    }

    /// Workbookストリームの解析
    ///
    /// BIFF8は`Workbook`、BIFF5/7は`Book`ストリームに格納されている。
    fn read_xls<R: Read + Seek>(reader: R) -> Result<bool, SheetJsonError> {
        let mut compound = cfb::CompoundFile::open(reader)?;

        for stream_name in ["/Workbook", "/Book"] {
            if !compound.is_stream(stream_name) {
                continue;
            }
            let mut stream = compound.open_stream(stream_name)?;
            let mut content = Vec::new();
            stream.read_to_end(&mut content)?;
            return Ok(parse_biff_globals(&content));
        }

        log::debug!("No workbook stream found in compound file; assuming 1900 date system");
        Ok(false)
    }
}

/// `<workbookPr date1904="1"/>`を探す
fn parse_workbook_xml(xml: &[u8]) -> Result<bool, SheetJsonError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"workbookPr" {
                    for attr in e.attributes() {
                        let attr = attr.map_err(|e| {
                            SheetJsonError::Config(format!("XML attribute error: {}", e))
                        })?;
                        if attr.key.local_name().as_ref() == b"date1904" {
                            let value = std::str::from_utf8(&attr.value)?;
                            return Ok(value == "1" || value.eq_ignore_ascii_case("true"));
                        }
                    }
                    return Ok(false);
                }
            }
            Ok(Event::Eof) => return Ok(false),
            Err(e) => return Err(SheetJsonError::Config(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }
}

/// BIFF8ワークブックグローバルから`DATE1904`レコードを探す
///
/// レコードは [種別 u16][長さ u16][データ] の並び。EOFレコードで打ち切る。
fn parse_biff_globals(stream: &[u8]) -> bool {
    let mut pos = 0;
    while pos + 4 <= stream.len() {
        let kind = u16::from_le_bytes([stream[pos], stream[pos + 1]]);
        let size = u16::from_le_bytes([stream[pos + 2], stream[pos + 3]]) as usize;
        let data = pos + 4;

        match kind {
            BIFF_DATE1904 if size >= 2 && data + 2 <= stream.len() => {
                return u16::from_le_bytes([stream[data], stream[data + 1]]) == 1;
            }
            BIFF_EOF => return false,
            _ => {}
        }
        pos = data + size;
    }
    false
}

/// BIFF12ワークブックから`BrtWbProp`レコードを探し、`f1904`ビットを返す
///
/// レコード種別と長さは7ビット継続整数（種別は最大2バイト、長さは最大4バイト）。
fn parse_workbook_bin(bin: &[u8]) -> bool {
    let mut pos = 0;
    while pos < bin.len() {
        let Some((kind, next)) = read_7bit_integer(bin, pos, 2) else {
            return false;
        };
        let Some((size, data)) = read_7bit_integer(bin, next, 4) else {
            return false;
        };

        if kind == BRT_WB_PROP {
            return data + 4 <= bin.len()
                && u32::from_le_bytes([bin[data], bin[data + 1], bin[data + 2], bin[data + 3]]) & 1
                    == 1;
        }
        pos = data + size;
    }
    false
}

/// 7ビット継続整数を読み取り、（値, 次の位置）を返す
fn read_7bit_integer(bin: &[u8], mut pos: usize, limit: usize) -> Option<(usize, usize)> {
    let mut value = 0usize;
    for index in 0..limit {
        let byte = *bin.get(pos)?;
        pos += 1;
        value |= ((byte & 0x7F) as usize) << (7 * index);
        if byte & 0x80 == 0 {
            break;
        }
    }
    Some((value, pos))
}
