//! A small IRC bot: joins one channel and answers mentions, direct messages
//! or plain channel chatter depending on its reply mode.

pub mod client;
pub mod codec;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod message;
pub mod policy;

pub use client::Client;
pub use client::Session;
pub use config::Config;
pub use error::Error;
