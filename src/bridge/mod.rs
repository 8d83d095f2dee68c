//! Command/feedback bridge between operator surfaces and the tank.
//!
//! ```text
//! Surface ─[Intent]→ Session ─encode→ Transport::publish
//!                       ↑
//! receive task ─[TransportEvent]→ Session ─decode→ DisplaySink
//! ```
//!
//! [`encoder`] and [`decoder`] are pure; [`session::Session`] holds the
//! only mutable state (connection state and speed setting).

pub mod decoder;
pub mod display;
pub mod encoder;
pub mod intent;
pub mod session;
pub mod topics;

pub use display::{DisplaySink, DisplayState, DisplayUpdate};
pub use encoder::CommandMessage;
pub use intent::{Direction, Intent, SpeedSetting};
pub use session::Session;
pub use topics::SubscriptionScope;
