use chrono::NaiveTime;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerType {
    Member,
    Normal,
}

impl CustomerType {
    pub const ALL: [CustomerType; 2] = [CustomerType::Member, CustomerType::Normal];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Member => "Member",
            CustomerType::Normal => "Normal",
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一筆銷售交易的型別化欄位，載入時解析一次
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(rename = "Branch")]
    pub branch: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Customer type")]
    pub customer_type: CustomerType,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Product line")]
    pub product_line: String,
    #[serde(rename = "Unit price")]
    pub unit_price: f64,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "Tax 5%")]
    pub tax: f64,
    #[serde(rename = "Total sale")]
    pub total_sale: f64,
    #[serde(rename = "Time", deserialize_with = "parse_clock_time")]
    pub time: NaiveTime,
    #[serde(rename = "Payment")]
    pub payment: String,
    #[serde(rename = "gross margin percentage")]
    pub gross_margin_pct: f64,
    #[serde(rename = "Rating")]
    pub rating: f64,
}

/// 接受 `HH:MM:SS` 或 `HH:MM`
fn parse_clock_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|e| serde::de::Error::custom(format!("invalid time '{}': {}", trimmed, e)))
}

/// 原始 CSV 列（匯出用）與其解析後的交易
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub fields: csv::StringRecord,
    pub transaction: Transaction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub headers: csv::StringRecord,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.records.iter().map(|r| r.transaction.clone()).collect()
    }
}

/// 依插入順序保存的「類別 → 數值」對照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdown(Vec<(String, f64)>);

impl Breakdown {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.0.push((label.into(), value));
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, value)| *value)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|(l, _)| l.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_points(self) -> Vec<(String, f64)> {
        self.0
    }
}

impl FromIterator<(String, f64)> for Breakdown {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (label, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", label, value)?;
        }
        f.write_str("}")
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in &self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// 匯出篩選條件
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "threshold", rename_all = "snake_case")]
pub enum SaleFilter {
    TotalSaleAbove(f64),
    RatingAbove(f64),
    Skip,
}

impl SaleFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            SaleFilter::TotalSaleAbove(threshold) => transaction.total_sale > *threshold,
            SaleFilter::RatingAbove(threshold) => transaction.rating > *threshold,
            SaleFilter::Skip => false,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, SaleFilter::Skip)
    }
}

impl fmt::Display for SaleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleFilter::TotalSaleAbove(t) => write!(f, "Total Sale > {}", t),
            SaleFilter::RatingAbove(t) => write!(f, "Rating > {}", t),
            SaleFilter::Skip => f.write_str("no filter"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SummaryValue {
    Amount(f64),
    Count(u32),
    Label(String),
    Breakdown(Breakdown),
}

impl fmt::Display for SummaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryValue::Amount(v) => write!(f, "{}", v),
            SummaryValue::Count(v) => write!(f, "{}", v),
            SummaryValue::Label(v) => f.write_str(v),
            SummaryValue::Breakdown(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for SummaryValue {
    fn from(value: f64) -> Self {
        SummaryValue::Amount(value)
    }
}

impl From<u32> for SummaryValue {
    fn from(value: u32) -> Self {
        SummaryValue::Count(value)
    }
}

impl From<String> for SummaryValue {
    fn from(value: String) -> Self {
        SummaryValue::Label(value)
    }
}

impl From<Breakdown> for SummaryValue {
    fn from(value: Breakdown) -> Self {
        SummaryValue::Breakdown(value)
    }
}

/// 有序的「標籤 → 結果」清單
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    entries: Vec<(String, SummaryValue)>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<SummaryValue>) {
        self.entries.push((label.into(), value.into()));
    }

    pub fn get(&self, label: &str) -> Option<&SummaryValue> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    pub fn entries(&self) -> &[(String, SummaryValue)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

/// 圖表描述，交給 `ChartRenderer` 繪製
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub name: String,
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(String, f64)>,
}

/// transform 階段的產出，load 階段只負責寫出
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub filter: SaleFilter,
    pub filtered_csv: Option<Vec<u8>>,
    pub filtered_count: usize,
    pub summary: Summary,
    pub charts: Vec<Chart>,
}

/// load 階段寫出的檔案路徑
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub summary_path: String,
    pub summary_json_path: Option<String>,
    pub filtered_path: Option<String>,
    pub chart_paths: Vec<String>,
}
