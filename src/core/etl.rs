use crate::core::Pipeline;
use crate::domain::model::AnalysisReport;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<AnalysisReport> {
        tracing::info!("Starting sales analysis...");
        self.monitor.log_stats("Start");

        // Extract
        let dataset = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", dataset.len());
        self.monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(dataset).await?;
        tracing::info!(
            "Computed {} summary entries, {} filtered records",
            result.summary.len(),
            result.filtered_count
        );
        self.monitor.log_stats("Transform");

        // Load
        let report = self.pipeline.load(result).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::load_dataset;
    use crate::domain::model::{AnalysisResult, Dataset, SaleFilter, Summary};
    use crate::utils::error::EtlError;
    use std::sync::Mutex;

    struct MockPipeline {
        stages: Mutex<Vec<&'static str>>,
        fail_transform: bool,
    }

    impl MockPipeline {
        fn new(fail_transform: bool) -> Self {
            Self {
                stages: Mutex::new(Vec::new()),
                fail_transform,
            }
        }
    }

    #[async_trait::async_trait]
    impl Pipeline for MockPipeline {
        async fn extract(&self) -> Result<Dataset> {
            self.stages.lock().unwrap().push("extract");
            load_dataset(b"Branch\n")
        }

        async fn transform(&self, _data: Dataset) -> Result<AnalysisResult> {
            self.stages.lock().unwrap().push("transform");
            if self.fail_transform {
                return Err(EtlError::empty_dataset("average_sales"));
            }
            Ok(AnalysisResult {
                filter: SaleFilter::Skip,
                filtered_csv: None,
                filtered_count: 0,
                summary: Summary::new(),
                charts: Vec::new(),
            })
        }

        async fn load(&self, _result: AnalysisResult) -> Result<AnalysisReport> {
            self.stages.lock().unwrap().push("load");
            Ok(AnalysisReport {
                summary_path: "summary.txt".to_string(),
                ..AnalysisReport::default()
            })
        }
    }

    #[test]
    fn test_engine_runs_stages_in_order() {
        let engine = EtlEngine::new(MockPipeline::new(false));

        let report = tokio_test::block_on(engine.run()).unwrap();

        assert_eq!(report.summary_path, "summary.txt");
        assert_eq!(
            *engine.pipeline.stages.lock().unwrap(),
            vec!["extract", "transform", "load"]
        );
    }

    #[test]
    fn test_engine_stops_when_transform_fails() {
        let engine = EtlEngine::new(MockPipeline::new(true));

        let err = tokio_test::block_on(engine.run()).unwrap_err();

        assert!(matches!(err, EtlError::EmptyDataset { .. }));
        assert_eq!(
            *engine.pipeline.stages.lock().unwrap(),
            vec!["extract", "transform"]
        );
    }
}
