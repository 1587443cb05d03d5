use crate::config::Config;
use crate::message::PrivmsgMatch;

/// Bot identity handed to the parser and the reply policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub nickname: String,
    pub channel: String,
    pub privmsg_match: PrivmsgMatch,
}

impl Context {
    pub fn new<N: Into<String>, C: Into<String>>(nickname: N, channel: C) -> Self {
        Self {
            nickname: nickname.into(),
            channel: channel.into(),
            privmsg_match: PrivmsgMatch::default(),
        }
    }

    pub fn with_privmsg_match(mut self, privmsg_match: PrivmsgMatch) -> Self {
        self.privmsg_match = privmsg_match;
        self
    }
}

impl From<&Config> for Context {
    fn from(config: &Config) -> Self {
        Context::new(config.nickname.clone(), config.channel.clone())
            .with_privmsg_match(config.privmsg_match)
    }
}
