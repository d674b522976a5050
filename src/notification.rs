use async_trait::async_trait;

/// Titles used by the two delivery paths. The scheduled daily fire and the
/// manual "send now" trigger are labelled differently for the user.
pub const DAILY_TITLE: &str = "Daily Weather Update";
pub const MANUAL_TITLE: &str = "Weather Update";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    Granted,
    Denied,
    Pending,
}

/// Delivery channel for reminder notifications. Fire-and-forget: the
/// scheduler never learns whether a message actually reached the user.
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    fn permission(&self) -> NotificationPermission;

    async fn deliver(&self, title: &str, body: &str);
}

/// Prints notifications to the terminal. Stands in for an OS notification
/// backend and never needs permission.
pub struct ConsoleNotificationSink;

#[async_trait]
impl NotificationSink for ConsoleNotificationSink {
    fn permission(&self) -> NotificationPermission {
        NotificationPermission::Granted
    }

    async fn deliver(&self, title: &str, body: &str) {
        println!("🔔 {title}: {body}");
    }
}
