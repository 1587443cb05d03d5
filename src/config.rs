use std::env::VarError;
use std::time::Duration;

use crate::error::ConfigError;
use crate::message::PrivmsgMatch;
use crate::policy::ReplyMode;
use crate::policy::DEFAULT_TYPING_DELAY;

pub const DEFAULT_CHANNEL: &str = "#test";
pub const DEFAULT_NICKNAME: &str = "EchoBot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub channel: String,
    pub nickname: String,
    pub reply_mode: ReplyMode,
    pub privmsg_match: PrivmsgMatch,
    pub typing_delay: Duration,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Reads `HOST`, `PORT`, `CHANNEL`, `NICK`, `REPLY_MODE`, `PRIVMSG_MATCH`
    /// and `TYPING_DELAY_MS` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key))
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        Self::from_vars(|key| lookup(key).ok_or(VarError::NotPresent))
    }

    fn from_vars<F: Fn(&'static str) -> Result<String, VarError>>(var: F) -> Result<Self, ConfigError> {
        let lookup = |key: &'static str| match var(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key)),
        };
        let mut builder = ConfigBuilder::new();

        if let Some(host) = lookup("HOST")? {
            builder.host(host);
        }
        if let Some(port) = lookup("PORT")? {
            builder.port(parse_number("PORT", port)?);
        }
        if let Some(channel) = lookup("CHANNEL")? {
            builder.channel(channel);
        }
        if let Some(nickname) = lookup("NICK")? {
            builder.nickname(nickname);
        }
        if let Some(mode) = lookup("REPLY_MODE")? {
            let Some(reply_mode) = ReplyMode::from_name(&mode) else {
                return Err(ConfigError::InvalidChoice {
                    key: "REPLY_MODE",
                    value: mode,
                    expected: "mention, echo",
                });
            };
            builder.reply_mode(reply_mode);
        }
        if let Some(matching) = lookup("PRIVMSG_MATCH")? {
            let Some(privmsg_match) = PrivmsgMatch::from_name(&matching) else {
                return Err(ConfigError::InvalidChoice {
                    key: "PRIVMSG_MATCH",
                    value: matching,
                    expected: "anywhere, command",
                });
            };
            builder.privmsg_match(privmsg_match);
        }
        if let Some(delay) = lookup("TYPING_DELAY_MS")? {
            builder.typing_delay(Duration::from_millis(parse_number("TYPING_DELAY_MS", delay)?));
        }

        builder.build()
    }
}

fn parse_number<T: std::str::FromStr<Err = std::num::ParseIntError>>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidNumber { key, value, source })
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    channel: Option<String>,
    nickname: Option<String>,
    reply_mode: ReplyMode,
    privmsg_match: PrivmsgMatch,
    typing_delay: Option<Duration>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let Some(host) = self.host else {
            return Err(ConfigError::Missing("HOST"));
        };
        let Some(port) = self.port else {
            return Err(ConfigError::Missing("PORT"));
        };

        Ok(Config {
            host,
            port,
            channel: self.channel.unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            nickname: self.nickname.unwrap_or_else(|| DEFAULT_NICKNAME.to_string()),
            reply_mode: self.reply_mode,
            privmsg_match: self.privmsg_match,
            typing_delay: self.typing_delay.unwrap_or(DEFAULT_TYPING_DELAY),
        })
    }

    pub fn host<T: Into<String>>(&mut self, host: T) -> &mut Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(&mut self, port: u16) -> &mut Self {
        self.port = Some(port);
        self
    }

    pub fn channel<T: Into<String>>(&mut self, channel: T) -> &mut Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn nickname<T: Into<String>>(&mut self, nickname: T) -> &mut Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn reply_mode(&mut self, reply_mode: ReplyMode) -> &mut Self {
        self.reply_mode = reply_mode;
        self
    }

    pub fn privmsg_match(&mut self, privmsg_match: PrivmsgMatch) -> &mut Self {
        self.privmsg_match = privmsg_match;
        self
    }

    pub fn typing_delay(&mut self, typing_delay: Duration) -> &mut Self {
        self.typing_delay = Some(typing_delay);
        self
    }
}
