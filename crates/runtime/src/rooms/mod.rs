//! Room registry and per-room state.

mod manager;
pub(crate) mod room;

pub use manager::{RngFactory, RoomManager, RoomManagerBuilder};
pub use room::RoomStatus;
