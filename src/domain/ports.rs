use crate::domain::model::{AnalysisReport, AnalysisResult, Chart, Dataset, SaleFilter};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn filter(&self) -> SaleFilter;
    fn rating_threshold(&self) -> f64;
    fn unit_price_threshold(&self) -> f64;
    fn write_json_summary(&self) -> bool;
}

/// 圖表繪製的副作用邊界，回傳輸出位置
pub trait ChartRenderer: Send + Sync {
    fn render(&self, chart: &Chart) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, data: Dataset) -> Result<AnalysisResult>;
    async fn load(&self, result: AnalysisResult) -> Result<AnalysisReport>;
}
