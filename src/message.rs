use crate::context::Context;
use crate::error::ParseError;
use crate::event::ChatEvent;
use crate::event::Event;

/// How a line is recognised as a chat message.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PrivmsgMatch {
    /// `PRIVMSG` anywhere in the line, including inside the message text.
    #[default]
    Anywhere,
    /// Only when the command field itself is `PRIVMSG`.
    Command,
}

impl PrivmsgMatch {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "anywhere" => Some(PrivmsgMatch::Anywhere),
            "command" => Some(PrivmsgMatch::Command),
            _ => None,
        }
    }

    fn matches(self, line: &str) -> bool {
        match self {
            PrivmsgMatch::Anywhere => line.contains("PRIVMSG"),
            PrivmsgMatch::Command => line.split(' ').nth(1) == Some("PRIVMSG"),
        }
    }
}

/// Classifies one raw line.
///
/// `Ok(None)` means the line is not something the bot acts on, which includes
/// chat messages sent by the bot itself.
pub fn parse(line: &str, ctx: &Context) -> Result<Option<Event>, ParseError> {
    if line.starts_with("PING") {
        let token = line
            .split_whitespace()
            .nth(1)
            .ok_or(ParseError::MissingPingToken)?;
        let token = token.strip_prefix(':').unwrap_or(token);

        return Ok(Some(Event::KeepAlive { token: token.to_string() }));
    }

    if !ctx.privmsg_match.matches(line) {
        return Ok(None);
    }

    let chat = parse_chat(line)?;
    if chat.sender == ctx.nickname {
        return Ok(None);
    }

    Ok(Some(Event::Chat(chat)))
}

fn parse_chat(line: &str) -> Result<ChatEvent, ParseError> {
    let mut fields = line.splitn(4, ' ');

    let prefix = fields.next().ok_or(ParseError::MissingField("prefix"))?;
    fields.next().ok_or(ParseError::MissingField("command"))?;
    let target = fields.next().ok_or(ParseError::MissingField("target"))?;
    let text = fields.next().unwrap_or_default();

    let nick = prefix.split('!').next().unwrap_or(prefix);
    let sender = nick.strip_prefix(':').unwrap_or(nick);

    Ok(ChatEvent {
        sender: sender.to_string(),
        target: target.to_string(),
        text: text.strip_prefix(':').unwrap_or(text).to_string(),
    })
}
