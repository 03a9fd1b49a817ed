use chrono::{DateTime, Utc};

/// A domain event.
///
/// Events are facts: immutable, versioned, and append-only. The cart emits
/// them for every accepted command and replays them to evolve its state.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "cart.line_item.added").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
