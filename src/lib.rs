// =============================================================================
// Quorum Engine — weighted multi-domain trade consensus
// =============================================================================
//
// Seven independent domain scorers (risk, macro, technical, news,
// fundamental, sentiment, sector-competition) each turn a typed metric
// bundle into one vote: an action, a calibrated confidence, and the
// supporting factors. The consensus arbiter remaps the wide action
// vocabulary to BUY/SELL/HOLD and aggregates the votes under a fixed
// weight table into a single decision.
//
// This crate is a pure computation library: no transport, persistence, or
// order routing. Callers supply a `MetricBundle` and receive a
// `Deliberation` record.
//
// ```no_run
// use quorum_engine::{ConsensusEngine, EngineConfig, MetricBundle};
//
// # async fn run() {
// let engine = ConsensusEngine::new(EngineConfig::default());
// let deliberation = engine.deliberate("AAPL", MetricBundle::default()).await;
// println!(
//     "{} -> {} ({:.0}%)",
//     deliberation.ticker,
//     deliberation.consensus.action,
//     deliberation.consensus.confidence * 100.0
// );
// # }
// ```

pub mod bundle;
pub mod config;
pub mod consensus;
pub mod engine;
pub mod metrics;
pub mod scorers;
pub mod types;

pub use bundle::MetricBundle;
pub use config::EngineConfig;
pub use consensus::{ActionScores, ConsensusArbiter, ConsensusResult, WeightTable};
pub use engine::{ConsensusEngine, Deliberation};
pub use types::{Action, ConsensusAction, Domain, Vote};
