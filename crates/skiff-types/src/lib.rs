pub mod reply;

pub use reply::{ReplyStatus, ServiceReply};
