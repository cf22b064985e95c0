//! Decision provider implementations for automated sides.

pub mod heuristic;
pub mod model;
pub mod policy;

pub use heuristic::HeuristicProvider;
pub use model::{ModelProvider, ReasoningClient};
pub use policy::{Decision, DecisionPolicy, DecisionSource};
