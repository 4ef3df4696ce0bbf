//! robot-link: persistent line-oriented TCP link to the robot controller
//!
//! One duplex, newline-delimited, UTF-8 text connection with an explicit
//! lifecycle (`Disconnected -> Connecting -> Connected -> {Disconnected,
//! Failed}`) and exactly one background listener per active connection.
//! The protocol is fire-and-forget: commands go out one per line, and
//! nothing the controller sends back is ever parsed as an acknowledgement.
//!
//! Transport failures never cross this crate's boundary as errors; every
//! operation that can fail returns a `bool` and logs what happened.

mod types;
pub use types::{ConnectionState, LinkConfig};

mod link;
pub use link::RobotLink;
