//! Room orchestration for two-party battles.
//!
//! This crate wires the pure rules from `battle-core` to the async world: a
//! [`RoomManager`] owns one battle per room, a per-room turn scheduler worker
//! drives the turn loop, decision providers choose actions for automated
//! sides, and every state transition is broadcast to the room's subscribers
//! in resolution order.
//!
//! Modules are organized by responsibility:
//! - [`rooms`] hosts the manager and its builder
//! - [`api`] exposes the request, error, and provider types clients use
//! - [`events`] carries the outbound protocol events and subscriber plumbing
//! - [`providers`] implements heuristic and model-backed decision making
//! - [`config`] holds runtime and per-battle configuration
//! - `workers` keeps the turn scheduler internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod providers;
pub mod rooms;
pub mod types;

mod workers;

pub use api::{
    DecisionProvider, DecisionRequest, ErrorClass, PlayerInit, ProviderError, Result,
    RuntimeError, SideOverrides, StartConfig, StartReceipt, StartRequest,
};
pub use config::{BattleConfig, Controller, RuntimeConfig};
pub use events::{RoomEvent, RoomMessage, Subscriber, SubscriberId};
pub use providers::{
    Decision, DecisionPolicy, DecisionSource, HeuristicProvider, ModelProvider, ReasoningClient,
};
pub use rooms::{RngFactory, RoomManager, RoomManagerBuilder, RoomStatus};
pub use types::RoomId;
