//! Formatter Module
//!
//! セル値を正規化文字列に変換するモジュール。
//! 型ごとの文字列化の後、すべての値にバックスラッシュエスケープの展開を適用します。

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::api::DateMode;
use crate::types::CellValue;

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_DAY: i64 = 86_400 * MICROS_PER_SECOND;

/// 9999-12-31を超えるシリアル値は暦日として扱わない
const MAX_DATE_SERIAL: f64 = 2_958_466.0;

/// セルフォーマッター
///
/// セル値のフォーマット処理のファサードとして機能します。
#[derive(Debug, Default)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,

    /// 数値フォーマッター
    number_formatter: NumberFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new() -> Self {
        Self {
            date_formatter: DateFormatter,
            number_formatter: NumberFormatter,
        }
    }

    /// セル値を正規化文字列に変換
    ///
    /// # 引数
    ///
    /// * `value` - セルの値
    /// * `date_mode` - ワークブックの日付エポック
    ///
    /// # 戻り値
    ///
    /// エスケープ展開済みの文字列。エラーセルと空セルは空文字列になります。
    pub fn format_cell(&self, value: &CellValue, date_mode: DateMode) -> String {
        let formatted = match value {
            CellValue::Empty | CellValue::Error => String::new(),

            CellValue::Number(n) => self.number_formatter.format(*n),

            // 旧形式のリーダーでは論理値は数値として扱われる
            CellValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),

            CellValue::Date(serial) => self
                .date_formatter
                .format(*serial, date_mode)
                .unwrap_or_else(|| self.number_formatter.format(*serial)),

            CellValue::IsoDateTime(s) => s.trim_end().replacen('T', " ", 1),

            CellValue::IsoDuration(s) | CellValue::Text(s) => s.trim_end().to_string(),
        };

        unescape(&formatted)
    }
}

/// 日付フォーマッター
///
/// Excelのシリアル日付値を`YYYY-MM-DD HH:MM:SS[.ffffff]`形式に変換します。
#[derive(Debug, Default)]
pub(crate) struct DateFormatter;

impl DateFormatter {
    /// 日付値をフォーマット
    ///
    /// # 引数
    ///
    /// * `serial_value` - Excelのシリアル日付値
    /// * `date_mode` - 日付エポック
    ///
    /// # 戻り値
    ///
    /// * `Some(String)` - フォーマット済み日時文字列
    /// * `None` - 暦日として表現できないシリアル値（負数、非有限値、範囲外）
    ///
    /// # エポックシステム
    ///
    /// - 1900年システム: シリアル値1 = 1900-01-01
    ///   - Excelは存在しない1900-02-29をシリアル値60として数えるため、
    ///     61以上は1899-12-30起算、60以下は1899-12-31起算になる
    /// - 1904年システム: シリアル値0 = 1904-01-01
    ///
    /// 秒未満はマイクロ秒に丸め、0でない場合のみ出力します。
    pub fn format(&self, serial_value: f64, date_mode: DateMode) -> Option<String> {
        if !serial_value.is_finite() || !(0.0..MAX_DATE_SERIAL).contains(&serial_value) {
            return None;
        }

        let total_micros = (serial_value * MICROS_PER_DAY as f64).round() as i64;
        let days = total_micros.div_euclid(MICROS_PER_DAY);
        let intraday = total_micros.rem_euclid(MICROS_PER_DAY);

        let epoch = match date_mode {
            DateMode::Epoch1904 => NaiveDate::from_ymd_opt(1904, 1, 1)?,
            DateMode::Epoch1900 if days < 61 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
            DateMode::Epoch1900 => NaiveDate::from_ymd_opt(1899, 12, 30)?,
        };

        let datetime: NaiveDateTime = epoch
            .and_hms_opt(0, 0, 0)?
            .checked_add_signed(Duration::days(days))?
            .checked_add_signed(Duration::microseconds(intraday))?;

        let mut formatted = datetime.format("%Y-%m-%d %H:%M:%S").to_string();
        let micros = intraday % MICROS_PER_SECOND;
        if micros != 0 {
            formatted.push_str(&format!(".{:06}", micros));
        }
        Some(formatted)
    }
}

/// 数値フォーマッター
///
/// 小数部が0の数値は整数リテラルとして、それ以外は最短の往復可能な10進表現で出力します。
#[derive(Debug, Default)]
pub(crate) struct NumberFormatter;

impl NumberFormatter {
    pub fn format(&self, value: f64) -> String {
        if value == 0.0 {
            // -0.0も"0"とする
            return "0".to_string();
        }
        if value.is_finite() && value.fract() == 0.0 {
            format!("{:.0}", value)
        } else {
            value.to_string()
        }
    }
}

/// バックスラッシュエスケープを展開
///
/// `\n`→LF、`\r`→CR、`\t`→TAB、`\<任意の文字>`→その文字。
/// 末尾の対応しないバックスラッシュは捨てます。
pub(crate) fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some(other) => result.push(other),
            None => {}
        }
    }

    result
}
