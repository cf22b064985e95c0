//! Outbound room events and the subscriber set they are fanned out to.
//!
//! Each room owns a [`RoomBus`]; the turn scheduler publishes to it while
//! holding the room lock, so every subscriber observes one total order of
//! events per room.

mod bus;
mod types;

pub(crate) use bus::RoomBus;
pub use bus::{Subscriber, SubscriberId};
pub use types::{RoomEvent, RoomMessage};
