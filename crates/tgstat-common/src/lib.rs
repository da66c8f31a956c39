//! Common utilities and types for the tgstat dashboard

pub mod error;
pub mod logging;
pub mod session;
pub mod telegram;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{Result, TgStatError};
pub use logging::{init_default_logging, init_dev_logging, init_logging, init_prod_logging, LoggingConfig};
pub use session::SessionToken;
pub use telegram::{
    ApiResponse, ChannelMessage, FetchProgress, HistoryPage, MessageReactions, MessageReplies,
    ReactionCount, TelegramClient, TelegramConfig,
};
pub use types::{DateRange, Post, Timestamp};
