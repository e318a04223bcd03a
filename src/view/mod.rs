mod document;
mod host;
mod hover;
mod navigate;
mod protocol;
mod session;

pub use document::LogDocument;
pub use host::{Clipboard, Notifier, NoticeLevel, Position, TextView};
pub use hover::{hover_at, HoverCard, ReferenceAction};
pub use navigate::{navigate, Direction, NavigateTarget};
pub use protocol::{overlays_event, ActionDescriptor, ViewEvent, ViewMessage};
pub use session::AnnotationSession;
