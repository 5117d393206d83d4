// Library exports for hosts, the demo driver and integration tests
//
// # Threading model
//
// The widget is single-threaded and cooperative. A `ChatWidget` is owned by
// one event loop; nothing in it is `Sync` and nothing blocks. Delayed work is
// queued on the widget's virtual clock (`scheduler`) and run when the host
// calls `ChatWidget::advance`. Storage and audio are reached through the
// capability traits in `traits` and are treated as fire-and-forget.
//
// The only lock in the crate is the `parking_lot::Mutex` guarding the global
// debug log file.

/// Widget version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod attachment;
pub mod badge;
pub mod cli;
pub mod composer;
pub mod conversation;
pub mod emoji;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod scheduler;
pub mod session;
pub mod sound;
pub mod traits;
pub mod widget;

pub use chatiq_config as config;

pub use attachment::{Attachment, AttachmentCategory, DropEvent, FileDescriptor};
pub use conversation::{MessageEntry, Sender};
pub use error::{WidgetError, WidgetResult};
pub use events::WidgetEvent;
pub use lifecycle::PanelState;
pub use sound::SoundKind;
pub use widget::{API_URL, ChatWidget};
