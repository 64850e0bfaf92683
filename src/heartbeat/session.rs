use serde::{Deserialize, Serialize};

/// Interactive-session signal fed to the heartbeat runner over a watch
/// channel. While `active`, the scheduler pauses ticking entirely; a session
/// that ends with `significant` set may trigger one immediate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionSignal {
    pub active: bool,
    pub significant: bool,
}
