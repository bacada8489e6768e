use thiserror::Error;

/// Closed error taxonomy for a single backtest run.
///
/// Every backtest produces exactly one [`crate::types::result::BacktestResult`]:
/// either `COMPLETED` with a trade list, or `FAILED` carrying one of these
/// variants rendered as a taxonomy code plus a human message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BacktestError {
    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("instrument not found: {0}")]
    InstrumentNotFound(String),

    #[error("data fetch failed: {0}")]
    DataFetchFailed(String),

    #[error("simulation error: {0}")]
    SimulationError(String),

    #[error("backtest disabled: {0}")]
    BacktestDisabled(String),
}

impl BacktestError {
    /// The bit-exact taxonomy code used in `BacktestResult::error_code`.
    pub fn code(&self) -> &'static str {
        match self {
            BacktestError::InvalidDate(_) => "INVALID_DATE",
            BacktestError::InstrumentNotFound(_) => "INSTRUMENT_NOT_FOUND",
            BacktestError::DataFetchFailed(_) => "DATA_FETCH_FAILED",
            BacktestError::SimulationError(_) => "SIMULATION_ERROR",
            BacktestError::BacktestDisabled(_) => "BACKTEST_DISABLED",
        }
    }

    /// Classify a collaborator-boundary error into the taxonomy. Instrument
    /// master lookups that fail with a recognizable "not found" condition map
    /// to `InstrumentNotFound`; every other collaborator failure is treated as
    /// `DataFetchFailed` per spec §7.
    pub fn from_instrument_lookup(err: &anyhow::Error) -> Self {
        let msg = err.to_string();
        if msg.to_uppercase().contains("NOT_FOUND") || msg.to_uppercase().contains("NOT FOUND") {
            BacktestError::InstrumentNotFound(msg)
        } else {
            BacktestError::DataFetchFailed(msg)
        }
    }

    pub fn from_data_fetch(err: &anyhow::Error) -> Self {
        BacktestError::DataFetchFailed(err.to_string())
    }
}
