use clap::Parser;
use sales_etl::config::prompt::prompt_filter;
use sales_etl::core::pipeline::AnalysisPipeline;
use sales_etl::domain::model::SaleFilter;
use sales_etl::domain::ports::ChartRenderer;
use sales_etl::utils::error::{EtlError, ErrorSeverity};
use sales_etl::utils::{logger, validation::Validate};
use sales_etl::{
    AnalysisSettings, CliConfig, EtlEngine, LocalStorage, NoopChartRenderer, SvgChartRenderer,
    TomlConfig,
};
use std::io::IsTerminal;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting sales-etl");
    tracing::debug!("CLI config: {:?}", cli);

    let settings = match resolve_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => exit_with(e),
    };

    let result = if settings.charts_enabled {
        let renderer = SvgChartRenderer::new(settings.resolved_charts_dir());
        run(settings, renderer).await
    } else {
        run(settings, NoopChartRenderer).await
    };

    if let Err(e) = result {
        exit_with(e);
    }
}

/// 預設值 → TOML 檔 → 命令列 → 互動提示
fn resolve_settings(cli: &CliConfig) -> sales_etl::Result<AnalysisSettings> {
    let mut settings = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = TomlConfig::from_file(path)?;
            config.validate()?;
            AnalysisSettings::from_toml(&config)
        }
        None => AnalysisSettings::default(),
    };

    cli.apply_to(&mut settings)?;

    if settings.needs_filter_prompt() {
        let stdin = std::io::stdin();
        settings.filter = Some(if stdin.is_terminal() {
            prompt_filter(&mut stdin.lock(), &mut std::io::stdout())?
        } else {
            tracing::warn!("No filter given and stdin is not a terminal; skipping export");
            SaleFilter::Skip
        });
    }

    settings.validate()?;
    tracing::info!("✅ Configuration resolved");
    Ok(settings)
}

async fn run<R: ChartRenderer>(settings: AnalysisSettings, renderer: R) -> sales_etl::Result<()> {
    let monitor_enabled = settings.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".");
    let pipeline = AnalysisPipeline::new(storage, settings, renderer);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    let report = engine.run().await?;

    let summary = tokio::fs::read_to_string(&report.summary_path).await?;
    print!("{}", summary);
    println!();

    if let Some(path) = &report.filtered_path {
        println!("📁 Filtered data saved to: {}", path);
    }
    println!("📁 Summary saved to: {}", report.summary_path);
    if let Some(path) = &report.summary_json_path {
        println!("📁 JSON summary saved to: {}", path);
    }
    for path in &report.chart_paths {
        println!("📈 Chart saved to: {}", path);
    }

    Ok(())
}

fn exit_with(e: EtlError) -> ! {
    tracing::error!(
        "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 依錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
