//! Adapter implementations of the article ports.

pub mod broadcast;
pub mod memory;

pub use broadcast::{
    BroadcastFanout, FanoutConfig, MAX_CHANNEL_CAPACITY, ReceiveError, Subscription,
};
pub use memory::InMemoryArticleStore;
