// Domain types and value objects
pub mod bar;
pub mod event;
pub mod subscription;

// Re-export commonly used types
pub use bar::{Bar, BarType};
pub use event::{Event, EventCategory, EventRecord, MarkerStyle};
pub use subscription::{Exchange, Subscription, Theme};
