use serde::{Deserialize, Serialize};

/// Facade-level knobs that sit outside a single [`crate::types::BacktestRequest`]
/// (spec §0.3 of SPEC_FULL.md): the result-cache bound, the bounded worker
/// pool size (spec §5), and the module enable switch that backs
/// `BACKTEST_DISABLED`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub max_cache_size: usize,
    pub worker_pool_size: usize,
    pub module_enabled: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_cache_size: 500,
            worker_pool_size: num_cpus_fallback(),
            module_enabled: true,
        }
    }
}

fn num_cpus_fallback() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}

impl ServiceConfig {
    /// Layers defaults, an optional `config.toml`, and environment overrides
    /// (`BACKTEST_` prefixed), the same layering the source bot's config
    /// manager applies to `RuntimeConfig`.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = ServiceConfig::default();
        let mut builder = config::Config::builder()
            .set_default("max_cache_size", defaults.max_cache_size as i64)?
            .set_default("worker_pool_size", defaults.worker_pool_size as i64)?
            .set_default("module_enabled", defaults.module_enabled)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(config::Environment::with_prefix("BACKTEST"));

        let settled = builder.build()?;
        Ok(settled.try_deserialize()?)
    }
}
