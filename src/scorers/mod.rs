// =============================================================================
// Domain Scorers Module
// =============================================================================
//
// Seven independent scorers, one per analytical domain. Each consumes its
// typed slice of the metric bundle and emits exactly one Vote. The five
// threshold-driven domains run an ordered declarative rule cascade (see
// `cascade`); the news scorer uses an additive score model and the
// sector-competition scorer a role/verdict decision matrix, both with their
// evaluation order documented in-module.
//
// Failure contract: a scorer never returns an error. Invalid input degrades
// to the domain's conservative fallback HOLD vote.

pub mod cascade;
pub mod fundamental;
pub mod macro_economy;
pub mod news;
pub mod risk;
pub mod sector;
pub mod sentiment;
pub mod technical;

pub use fundamental::FundamentalScorer;
pub use macro_economy::MacroScorer;
pub use news::NewsScorer;
pub use risk::RiskScorer;
pub use sector::SectorCompetitionScorer;
pub use sentiment::SentimentScorer;
pub use technical::TechnicalScorer;
