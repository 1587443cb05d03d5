use std::time::Duration;

use regex::Regex;

use crate::command::Command;
use crate::context::Context;
use crate::event::ChatEvent;

pub const DEFAULT_TYPING_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    /// Answer direct messages and channel lines that mention the bot.
    #[default]
    Mention,
    /// Repeat every channel line back to the channel.
    Echo,
}

impl ReplyMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mention" => Some(ReplyMode::Mention),
            "echo" => Some(ReplyMode::Echo),
            _ => None,
        }
    }
}

/// One step of a reply, executed in order by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Send(Command),
    Delay(Duration),
}

#[derive(Debug, Clone)]
pub struct ReplyPolicy {
    mode: ReplyMode,
    typing_delay: Duration,
    mention: Regex,
}

impl ReplyPolicy {
    pub fn new(mode: ReplyMode, ctx: &Context, typing_delay: Duration) -> Result<Self, regex::Error> {
        let nickname = regex::escape(&ctx.nickname);
        let mention = Regex::new(&format!(r"(?i)\b{nickname}\b|^{nickname}:\s+"))?;

        Ok(Self {
            mode,
            typing_delay,
            mention,
        })
    }

    /// Whole-word, case-insensitive occurrence of the bot's nickname.
    pub fn is_mentioned(&self, text: &str) -> bool {
        self.mention.is_match(text)
    }

    pub fn decide(&self, chat: &ChatEvent, ctx: &Context) -> Vec<Action> {
        if chat.sender == ctx.nickname {
            return vec![];
        }

        match self.mode {
            ReplyMode::Mention => {
                if chat.is_direct(&ctx.nickname) {
                    self.typed_reply(&chat.sender, format!("You said: {}", chat.text))
                } else if self.is_mentioned(&chat.text) {
                    self.typed_reply(
                        &chat.target,
                        format!("{}: I heard you mention me! You said: {}", chat.sender, chat.text),
                    )
                } else {
                    vec![]
                }
            }
            ReplyMode::Echo => {
                if chat.target == ctx.channel {
                    vec![Action::Send(Command::Privmsg(ctx.channel.clone(), chat.text.clone()))]
                } else {
                    vec![]
                }
            }
        }
    }

    fn typed_reply(&self, target: &str, text: String) -> Vec<Action> {
        vec![
            Action::Send(Command::Typing(target.to_string())),
            Action::Delay(self.typing_delay),
            Action::Send(Command::Privmsg(target.to_string(), text)),
        ]
    }
}
