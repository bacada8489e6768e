pub mod chain;
pub mod context;
pub mod strategies;

pub use chain::{build_chain, ChainParams};
pub use context::ExitContext;
pub use strategies::{Decision, ExitStrategy};
