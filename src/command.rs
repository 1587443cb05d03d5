use std::fmt;

/// Outbound commands the bot knows how to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Nick(String),
    /// `USER <username> 0 * :<realname>`
    User(String, String),
    Join(String),
    Pong(String),
    Privmsg(String, String),
    /// Typing indicator sent as a client-only message tag.
    Typing(String),
}

impl Command {
    /// The sequence sent right after the connection opens.
    pub fn registration(nickname: &str, channel: &str) -> [Command; 3] {
        [
            Command::Nick(nickname.to_string()),
            Command::User(nickname.to_string(), nickname.to_string()),
            Command::Join(channel.to_string()),
        ]
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Nick(nickname) => write!(f, "NICK {}", nickname),
            Command::User(username, realname) => write!(f, "USER {} 0 * :{}", username, realname),
            Command::Join(channel) => write!(f, "JOIN {}", channel),
            Command::Pong(token) => write!(f, "PONG {}", token),
            Command::Privmsg(target, text) => write!(f, "PRIVMSG {} :{}", target, text),
            Command::Typing(target) => write!(f, "@+typing=active TAGMSG {}", target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_order() {
        let lines: Vec<String> = Command::registration("EchoBot", "#test")
            .iter()
            .map(|c| c.to_string())
            .collect();

        assert_eq!(lines, vec![
            "NICK EchoBot",
            "USER EchoBot 0 * :EchoBot",
            "JOIN #test",
        ]);
    }

    #[test]
    fn privmsg_fmt() {
        let command = Command::Privmsg("#test".to_string(), "hello there".to_string());
        assert_eq!(command.to_string(), "PRIVMSG #test :hello there");
    }

    #[test]
    fn privmsg_fmt_empty_text() {
        let command = Command::Privmsg("alice".to_string(), String::new());
        assert_eq!(command.to_string(), "PRIVMSG alice :");
    }

    #[test]
    fn typing_fmt() {
        assert_eq!(Command::Typing("alice".to_string()).to_string(), "@+typing=active TAGMSG alice");
    }

    #[test]
    fn pong_fmt() {
        assert_eq!(Command::Pong("abc123".to_string()).to_string(), "PONG abc123");
    }
}
