//! Staged dependency resolution.
//!
//! A [`stage::ConfiguredResolveStage`] ingests an effective project model into
//! a [`session::WorkingSession`]. Callers then select dependencies by scope or
//! by explicit coordinate, narrow the selection with
//! [`strategy::ResolutionStrategy`] implementations in a
//! [`strategy_stage::StrategyStage`], and hand the admitted artifacts to a
//! formatter or fetcher through a [`format::FormatStage`].

pub mod builder;
pub mod filter;
pub mod format;
pub mod session;
pub mod stage;
pub mod strategy;
pub mod strategy_stage;
