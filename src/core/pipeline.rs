use crate::core::aggregations as agg;
use crate::core::{charts, export, source};
use crate::domain::model::{AnalysisReport, AnalysisResult, Dataset, Summary, Transaction};
use crate::domain::ports::{ChartRenderer, ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;

pub const FILTERED_FILE: &str = "filtered_data.csv";
pub const SUMMARY_FILE: &str = "summary.txt";
pub const SUMMARY_JSON_FILE: &str = "summary.json";

/// 讀取銷售 CSV、計算彙總、寫出摘要與篩選結果並繪圖
pub struct AnalysisPipeline<S: Storage, C: ConfigProvider, R: ChartRenderer> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) renderer: R,
}

impl<S: Storage, C: ConfigProvider, R: ChartRenderer> AnalysisPipeline<S, C, R> {
    pub fn new(storage: S, config: C, renderer: R) -> Self {
        Self {
            storage,
            config,
            renderer,
        }
    }

    fn output_file(&self, name: &str) -> String {
        format!("{}/{}", self.config.output_path().trim_end_matches('/'), name)
    }
}

/// 依固定順序組出摘要；任一項失敗即中止
pub fn build_summary(
    txns: &[Transaction],
    rating_threshold: f64,
    unit_price_threshold: f64,
) -> Result<Summary> {
    let mut summary = Summary::new();

    summary.insert("Total Sales", agg::total_sales(txns));
    summary.insert("Average Sales", agg::average_sales(txns)?);
    summary.insert("Highest Sales Branch", agg::highest_sales_branch(txns)?);
    summary.insert("Top Product Line", agg::top_product_line(txns)?);
    summary.insert(
        "Customer Type Proportion",
        agg::customer_type_proportion(txns)?,
    );
    summary.insert("Revenue by Gender", agg::revenue_by_gender(txns));
    summary.insert(
        "Most Used Payment Method",
        agg::most_used_payment_method(txns)?,
    );
    summary.insert("Average Gross Margin", agg::average_gross_margin(txns)?);
    summary.insert(
        "City with Highest Sales",
        agg::city_with_highest_sales(txns)?,
    );
    summary.insert(
        "Average Quantity by Product Line",
        agg::avg_quantity_by_product_line(txns),
    );
    summary.insert(
        "Average High Rating Sales",
        agg::avg_high_rating_sales(txns, rating_threshold),
    );
    // 原始報表標籤為 "Branch Sale"，此處與其他項目統一命名
    summary.insert("Sales by Branch", agg::sales_by_branch(txns));
    summary.insert("Peak Transaction Hour", agg::peak_transaction_hours(txns)?);
    summary.insert("Tax-to-Sales Ratio", agg::tax_to_sales_ratio(txns)?);
    summary.insert(
        "Revenue Above Threshold",
        agg::revenue_above_threshold(txns, unit_price_threshold),
    );

    Ok(summary)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, R: ChartRenderer> Pipeline for AnalysisPipeline<S, C, R> {
    async fn extract(&self) -> Result<Dataset> {
        tracing::info!("🚀 Loading sales records from: {}", self.config.input_path());

        let bytes = self.storage.read_file(self.config.input_path()).await?;
        let dataset = source::load_dataset(&bytes)?;

        tracing::info!("📊 Loaded {} records", dataset.len());
        Ok(dataset)
    }

    async fn transform(&self, data: Dataset) -> Result<AnalysisResult> {
        let filter = self.config.filter();
        tracing::info!("🔧 Analysing {} records (filter: {})", data.len(), filter);

        let (filtered_csv, filtered_count) = if filter.is_skip() {
            tracing::warn!("Invalid or missing filter choice. No filtered data will be saved.");
            (None, 0)
        } else {
            let (bytes, count) =
                export::save_filtered_data(&data, |record| filter.matches(&record.transaction))?;
            (Some(bytes), count)
        };

        let txns = data.transactions();
        let summary = build_summary(
            &txns,
            self.config.rating_threshold(),
            self.config.unit_price_threshold(),
        )?;

        let charts = vec![
            charts::branch_sales_chart(agg::sales_by_branch(&txns)),
            charts::gender_revenue_chart(agg::revenue_by_gender(&txns)),
            charts::product_line_quantities_chart(agg::avg_quantity_by_product_line(&txns)),
            charts::payment_methods_chart(agg::payment_method_counts(&txns)),
        ];

        tracing::info!("✅ Computed {} summary entries", summary.len());
        Ok(AnalysisResult {
            filter,
            filtered_csv,
            filtered_count,
            summary,
            charts,
        })
    }

    async fn load(&self, result: AnalysisResult) -> Result<AnalysisReport> {
        tracing::info!("💾 Writing analysis output to: {}", self.config.output_path());
        let mut report = AnalysisReport::default();

        if let Some(bytes) = &result.filtered_csv {
            let path = self.output_file(FILTERED_FILE);
            self.storage.write_file(&path, bytes).await?;
            tracing::info!(
                "Filtered data saved to '{}' for {} ({} records)",
                path,
                result.filter,
                result.filtered_count
            );
            report.filtered_path = Some(path);
        }

        let summary_path = self.output_file(SUMMARY_FILE);
        let text = export::write_summary(&result.summary);
        self.storage
            .write_file(&summary_path, text.as_bytes())
            .await?;
        report.summary_path = summary_path;

        if self.config.write_json_summary() {
            let json_path = self.output_file(SUMMARY_JSON_FILE);
            let json = export::summary_json(&result.summary)?;
            self.storage.write_file(&json_path, json.as_bytes()).await?;
            report.summary_json_path = Some(json_path);
        }

        for chart in &result.charts {
            let location = self.renderer.render(chart)?;
            if !location.is_empty() {
                tracing::info!("📈 Chart '{}' saved to {}", chart.title, location);
                report.chart_paths.push(location);
            }
        }

        tracing::info!("📦 Summary saved: {}", report.summary_path);
        Ok(report)
    }
}
