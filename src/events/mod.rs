//! Event Notifier
//!
//! State-transition notifications for external collaborators: oracle
//! processes, monitoring, and the presentation layer.

pub mod notification;
pub mod notifier;

pub use notification::{Notification, SuretyEvent};
pub use notifier::{EventNotifier, EventSubscriber, TracingSubscriber};
