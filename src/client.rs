use std::future::Future;
use std::future::IntoFuture;
use std::pin::Pin;

use futures_util::SinkExt;
use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::codec::LineCodec;
use crate::command::Command;
use crate::config::Config;
use crate::context::Context;
use crate::error::Error;
use crate::event::Event;
use crate::message;
use crate::policy::Action;
use crate::policy::ReplyPolicy;

pub struct Client;

impl Client {
    pub fn builder(config: Config) -> Result<ClientBuilder, Error> {
        ClientBuilder::new(config)
    }
}

pub struct ClientBuilder {
    host: String,
    port: u16,
    context: Context,
    policy: ReplyPolicy,
}

impl ClientBuilder {
    pub fn new(config: Config) -> Result<Self, Error> {
        let context = Context::from(&config);
        let policy = ReplyPolicy::new(config.reply_mode, &context, config.typing_delay)?;

        Ok(Self {
            host: config.host,
            port: config.port,
            context,
            policy,
        })
    }

    /// Runs the bot over an already open transport. Registration is left to the caller.
    pub fn attach<T: AsyncRead + AsyncWrite + Unpin>(self, transport: T) -> Session<T> {
        Session {
            framed: Framed::new(transport, LineCodec::new()),
            context: self.context,
            policy: self.policy,
        }
    }
}

impl IntoFuture for ClientBuilder {
    type Output = Result<Session<TcpStream>, Error>;

    type IntoFuture = Pin<Box<dyn Future<Output = Result<Session<TcpStream>, Error>> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            info!(host = %self.host, port = self.port, "Connecting");
            let stream = TcpStream::connect((self.host.as_str(), self.port)).await?;

            let mut session = self.attach(stream);
            session.register().await?;

            Ok(session)
        })
    }
}

/// A single connection, processed one line at a time.
///
/// Replies are awaited in full (typing delay included) before the next
/// inbound line is read, so pacing stays strictly sequential.
pub struct Session<T> {
    framed: Framed<T, LineCodec>,
    context: Context,
    policy: ReplyPolicy,
}

impl<T: AsyncRead + AsyncWrite + Unpin> Session<T> {
    pub async fn register(&mut self) -> Result<(), Error> {
        for command in Command::registration(&self.context.nickname, &self.context.channel) {
            self.send(command).await?;
        }
        info!(nickname = %self.context.nickname, channel = %self.context.channel, "Registered");

        Ok(())
    }

    /// Processes inbound lines until the server closes the connection.
    pub async fn run(mut self) -> Result<(), Error> {
        while let Some(line) = self.framed.next().await {
            let line = line?;
            self.handle_line(&line).await?;
        }

        info!("Connection closed by server.");
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Result<(), Error> {
        info!("> {}", line);

        let event = match message::parse(line, &self.context) {
            Ok(Some(event)) => event,
            Ok(None) => return Ok(()),
            Err(err) => {
                warn!(error = %err, line, "Dropping malformed line");
                return Ok(());
            }
        };

        match event {
            Event::KeepAlive { token } => self.send(Command::Pong(token)).await,
            Event::Chat(chat) => {
                info!("Message from {} in {}: {}", chat.sender, chat.target, chat.text);

                for action in self.policy.decide(&chat, &self.context) {
                    self.perform(action).await?;
                }

                Ok(())
            }
        }
    }

    async fn perform(&mut self, action: Action) -> Result<(), Error> {
        match action {
            Action::Send(command) => self.send(command).await,
            Action::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }

    async fn send(&mut self, command: Command) -> Result<(), Error> {
        debug!("< {}", command);
        self.framed.send(command).await?;
        Ok(())
    }
}
