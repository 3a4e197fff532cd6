//! Storage models: triggers and per-user presence.

mod presence;
mod trigger;

pub use presence::{Claim, PresenceState, QuarantineRecord};
pub use trigger::{contains_keyword, NewTrigger, Trigger, TriggerKind};
pub(crate) use trigger::TriggerRow;
