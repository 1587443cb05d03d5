#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Server liveness check; the token goes back in a PONG.
    KeepAlive { token: String },
    Chat(ChatEvent),
}

/// A message addressed to the joined channel or directly to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub sender: String,
    pub target: String,
    pub text: String,
}

impl ChatEvent {
    pub fn is_direct(&self, nickname: &str) -> bool {
        self.target == nickname
    }
}
