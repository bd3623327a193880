//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 出力ドキュメントのレイアウト
///
/// シートごとにファイルを分けるか、ワークブック単位で1ファイルにまとめるかを指定します。
/// 空テーブルの扱いもレイアウトによって決まります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputLayout {
    /// シートごとに1ファイル（デフォルト）
    ///
    /// `<stem>_<シート識別子>.json`を出力します。ヘッダー行が見つからない、
    /// またはデータ行が0件のシートでも、空のテーブルとして必ず出力されます。
    ///
    /// # 出力例
    ///
    /// ```json
    /// {"name":"items_Items","class":"Config.Items","header":["id","cost"],"data":[{"id":["1"],"cost":["5","10"]}]}
    /// ```
    #[default]
    PerSheet,

    /// ワークブックごとに1ファイル
    ///
    /// データを持つ最初のシートの`<stem>_<シート識別子>.json`に、すべてのシートを
    /// まとめて出力します。データ行のないシートは`header`/`data`の両方から省略され、
    /// データを持つシートが1枚もない場合はファイルを出力しません。
    ///
    /// # 出力例
    ///
    /// ```json
    /// {"name":"items_Items","main":"Config.Items","header":{"Config.Items":["id"],"Drops":["id"]},"data":{"Config.Items":[{"id":["1"]}],"Drops":[{"id":["7"]}]}}
    /// ```
    Workbook,
}

/// 日付シリアル値のエポック
///
/// ワークブック全体の設定で、日付セルのシリアル値を暦日に変換する際の起点です。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DateMode {
    /// 1900年システム（Windows版Excelのデフォルト）
    ///
    /// シリアル値1 = 1900-01-01。存在しない1900-02-29（シリアル値60）を含みます。
    #[default]
    Epoch1900,

    /// 1904年システム（旧Mac版Excel）
    ///
    /// シリアル値0 = 1904-01-01。
    Epoch1904,
}
