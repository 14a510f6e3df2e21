//! 銷售資料的彙總函式。
//!
//! 每個函式都只讀取交易切片並各自掃描一次，彼此之間不共享狀態。
//! 需要除以筆數或取最大值的函式在空資料上回傳 [`EtlError::EmptyDataset`]；
//! 加總類函式在空資料上回傳 0。

use crate::domain::model::{Breakdown, CustomerType, Gender, Transaction};
use crate::utils::error::{EtlError, Result};
use chrono::Timelike;
use std::collections::HashMap;
use std::hash::Hash;

pub const DEFAULT_RATING_THRESHOLD: f64 = 8.0;
pub const DEFAULT_UNIT_PRICE_THRESHOLD: f64 = 50.0;

/// 依第一次出現的順序累計各類別的值
#[derive(Debug)]
struct Tally<K, V> {
    order: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone, V: Default> Tally<K, V> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn entry(&mut self, key: &K) -> &mut V {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                self.order.push((key.clone(), V::default()));
                self.index.insert(key.clone(), self.order.len() - 1);
                self.order.len() - 1
            }
        };
        &mut self.order[slot].1
    }
}

impl<K> Tally<K, f64> {
    /// 最大值；平手時取最先出現者
    fn max_key(self) -> Option<K> {
        let mut best: Option<(K, f64)> = None;
        for (key, value) in self.order {
            if best.as_ref().map_or(true, |(_, top)| value > *top) {
                best = Some((key, value));
            }
        }
        best.map(|(key, _)| key)
    }
}

impl Tally<String, f64> {
    fn into_breakdown(self) -> Breakdown {
        self.order.into_iter().collect()
    }
}

fn sum_by<F>(data: &[Transaction], key: F) -> Tally<String, f64>
where
    F: Fn(&Transaction) -> &str,
{
    let mut tally = Tally::new();
    for txn in data {
        *tally.entry(&key(txn).to_string()) += txn.total_sale;
    }
    tally
}

fn count_by<K, F>(data: &[Transaction], key: F) -> Tally<K, f64>
where
    K: Eq + Hash + Clone,
    F: Fn(&Transaction) -> K,
{
    let mut tally = Tally::new();
    for txn in data {
        *tally.entry(&key(txn)) += 1.0;
    }
    tally
}

fn require_non_empty(data: &[Transaction], operation: &str) -> Result<()> {
    if data.is_empty() {
        return Err(EtlError::empty_dataset(operation));
    }
    Ok(())
}

pub fn total_sales(data: &[Transaction]) -> f64 {
    data.iter().map(|txn| txn.total_sale).sum()
}

pub fn average_sales(data: &[Transaction]) -> Result<f64> {
    require_non_empty(data, "average_sales")?;
    Ok(total_sales(data) / data.len() as f64)
}

pub fn highest_sales_branch(data: &[Transaction]) -> Result<String> {
    sum_by(data, |txn| txn.branch.as_str())
        .max_key()
        .ok_or_else(|| EtlError::empty_dataset("highest_sales_branch"))
}

pub fn top_product_line(data: &[Transaction]) -> Result<String> {
    sum_by(data, |txn| txn.product_line.as_str())
        .max_key()
        .ok_or_else(|| EtlError::empty_dataset("top_product_line"))
}

/// Member / Normal 各佔總筆數的百分比
pub fn customer_type_proportion(data: &[Transaction]) -> Result<Breakdown> {
    require_non_empty(data, "customer_type_proportion")?;

    let (mut members, mut normals) = (0usize, 0usize);
    for txn in data {
        match txn.customer_type {
            CustomerType::Member => members += 1,
            CustomerType::Normal => normals += 1,
        }
    }

    let total = (members + normals) as f64;
    Ok(CustomerType::ALL
        .iter()
        .map(|kind| {
            let count = match kind {
                CustomerType::Member => members,
                CustomerType::Normal => normals,
            };
            (kind.to_string(), count as f64 / total * 100.0)
        })
        .collect())
}

pub fn revenue_by_gender(data: &[Transaction]) -> Breakdown {
    let (mut male, mut female) = (0.0, 0.0);
    for txn in data {
        match txn.gender {
            Gender::Male => male += txn.total_sale,
            Gender::Female => female += txn.total_sale,
        }
    }

    Gender::ALL
        .iter()
        .map(|gender| {
            let revenue = match gender {
                Gender::Male => male,
                Gender::Female => female,
            };
            (gender.to_string(), revenue)
        })
        .collect()
}

pub fn most_used_payment_method(data: &[Transaction]) -> Result<String> {
    count_by(data, |txn| txn.payment.clone())
        .max_key()
        .ok_or_else(|| EtlError::empty_dataset("most_used_payment_method"))
}

/// 各付款方式的使用次數（依首次出現順序）
pub fn payment_method_counts(data: &[Transaction]) -> Breakdown {
    count_by(data, |txn| txn.payment.clone()).into_breakdown()
}

pub fn average_gross_margin(data: &[Transaction]) -> Result<f64> {
    require_non_empty(data, "average_gross_margin")?;
    let sum: f64 = data.iter().map(|txn| txn.gross_margin_pct).sum();
    Ok(sum / data.len() as f64)
}

pub fn city_with_highest_sales(data: &[Transaction]) -> Result<String> {
    sum_by(data, |txn| txn.city.as_str())
        .max_key()
        .ok_or_else(|| EtlError::empty_dataset("city_with_highest_sales"))
}

pub fn avg_quantity_by_product_line(data: &[Transaction]) -> Breakdown {
    let mut tally: Tally<String, (u64, u64)> = Tally::new();
    for txn in data {
        let (quantity, count) = tally.entry(&txn.product_line);
        *quantity += u64::from(txn.quantity);
        *count += 1;
    }

    // 每條產品線至少出現一次，count 不會是 0
    tally
        .order
        .into_iter()
        .map(|(line, (quantity, count))| (line, quantity as f64 / count as f64))
        .collect()
}

/// 評分高於門檻的交易平均銷售額；沒有符合的交易時為 0
pub fn avg_high_rating_sales(data: &[Transaction], rating_threshold: f64) -> f64 {
    let (sum, count) = data
        .iter()
        .filter(|txn| txn.rating > rating_threshold)
        .fold((0.0, 0usize), |(sum, count), txn| {
            (sum + txn.total_sale, count + 1)
        });

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub fn sales_by_branch(data: &[Transaction]) -> Breakdown {
    sum_by(data, |txn| txn.branch.as_str()).into_breakdown()
}

/// 交易筆數最多的小時（0-23）
pub fn peak_transaction_hours(data: &[Transaction]) -> Result<u32> {
    count_by(data, |txn| txn.time.hour())
        .max_key()
        .ok_or_else(|| EtlError::empty_dataset("peak_transaction_hours"))
}

pub fn tax_to_sales_ratio(data: &[Transaction]) -> Result<f64> {
    let total = total_sales(data);
    if total == 0.0 {
        return Err(EtlError::DivisionByZero {
            operation: "tax_to_sales_ratio".to_string(),
        });
    }
    let tax: f64 = data.iter().map(|txn| txn.tax).sum();
    Ok(tax / total)
}

pub fn revenue_above_threshold(data: &[Transaction], threshold: f64) -> f64 {
    data.iter()
        .filter(|txn| txn.unit_price > threshold)
        .map(|txn| txn.total_sale)
        .sum()
}
