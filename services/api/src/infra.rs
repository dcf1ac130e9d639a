use chrono::NaiveDate;
use hr_assist::assistant::{HrAssistant, KeywordEngine, OpenAiCompatEngine, ReasoningEngine};
use hr_assist::config::{DataConfig, EngineConfig, EngineProvider};
use hr_assist::error::AppError;
use hr_assist::workforce::{CsvTableStore, TableStore, Workforce};
use metrics_exporter_prometheus::PrometheusHandle;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub(crate) fn open_workforce(config: &DataConfig) -> Result<Arc<Workforce<CsvTableStore>>, AppError> {
    let store = Arc::new(CsvTableStore::new(config.dir.clone()));
    let workforce = Workforce::open(store, seeded_rng(config.seed))?;
    info!(dir = %config.dir.display(), seeded = config.seed.is_some(), "workforce tables opened");
    Ok(Arc::new(workforce))
}

pub(crate) fn build_engine(config: &EngineConfig) -> Result<Arc<dyn ReasoningEngine>, AppError> {
    let engine: Arc<dyn ReasoningEngine> = match config.provider {
        EngineProvider::Keyword => Arc::new(KeywordEngine::new()),
        EngineProvider::OpenAiCompat => Arc::new(OpenAiCompatEngine::from_config(config)?),
    };
    info!(engine = engine.name(), "reasoning engine selected");
    Ok(engine)
}

pub(crate) fn build_assistant<S>(
    workforce: Arc<Workforce<S>>,
    config: &EngineConfig,
) -> Result<Arc<HrAssistant<S>>, AppError>
where
    S: TableStore + 'static,
{
    let engine = build_engine(config)?;
    Ok(Arc::new(HrAssistant::new(
        workforce,
        engine,
        config.max_steps,
        config.timeout,
    )))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(
            parse_date(" 2025-12-01 "),
            Ok(NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid date"))
        );
        assert!(parse_date("12/01/2025")
            .expect_err("rejected")
            .contains("YYYY-MM-DD"));
    }

    #[test]
    fn keyword_provider_needs_no_key() {
        let config = EngineConfig {
            provider: EngineProvider::Keyword,
            base_url: String::new(),
            api_key: None,
            model: String::new(),
            timeout: Duration::from_secs(1),
            max_steps: 3,
        };
        let engine = build_engine(&config).expect("engine builds");
        assert_eq!(engine.name(), "keyword");
    }

    #[test]
    fn csv_workforce_is_created_in_empty_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = DataConfig {
            dir: dir.path().join("data"),
            seed: Some(42),
        };
        let workforce = open_workforce(&config).expect("workforce opens");
        assert!(workforce
            .read(|tables| !tables.employees.is_empty())
            .expect("read"));
        assert!(dir.path().join("data").join("employees.csv").exists());
    }
}
