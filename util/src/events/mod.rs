//! In-process notification subsystem.
//!
//! Domain code publishes [`Notification`]s onto the [`EventBus`]; each live
//! admin SSE connection holds one [`EventStream`] that bridges its bus
//! subscription onto the wire. Events are ephemeral: no persistence, no
//! replay, best-effort delivery to whoever is subscribed at publish time.

pub mod bus;
pub mod notification;
pub mod stream;

pub use bus::{EventBus, SubscriptionId};
pub use notification::{Notification, NotificationKind};
pub use stream::EventStream;
