use crate::command::{CommandMap, Error as RegistryError, Handler, HandlerResult};
use crate::config::Config;
use crate::irc::{Conn, ConnError, Message};
use log::*;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Conn(#[from] ConnError),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Conn(ConnError::Io(err))
    }
}

/// Connects the parser and the command table to a connection.
///
/// Handlers get the bot's [`Config`] as their context.
pub struct Bot<C> {
    conn: C,
    config: Config,
    commands: CommandMap<Config>,
    passive: Vec<Box<dyn Handler<Config>>>,
}

impl<C> Bot<C>
where
    C: Conn,
{
    pub fn new(conn: C, config: Config) -> Self {
        Self {
            conn,
            config,
            commands: CommandMap::new(),
            passive: vec![],
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn commands(&self) -> &CommandMap<Config> {
        &self.commands
    }

    /// Registers a command, invoked for `<bang><name>` in a PRIVMSG
    pub fn on_command<F>(&mut self, name: &str, f: F) -> Result<&mut Self, RegistryError>
    where
        F: Fn(&Config, &Message) -> HandlerResult + Send + Sync + 'static,
    {
        self.commands.register(name, f)?;
        Ok(self)
    }

    /// Registers a handler that sees every PRIVMSG
    pub fn on_privmsg<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Config, &Message) -> HandlerResult + Send + Sync + 'static,
    {
        self.passive.push(Box::new(f));
        self
    }

    pub fn register(&mut self) -> Result<(), Error> {
        let config = &self.config;
        self.conn.nick(&config.nickname)?;
        self.conn.user(config.username(), config.mode, config.fullname())?;
        Ok(())
    }

    /// Registers, then reads until the connection closes
    pub fn run(&mut self) -> Result<(), Error> {
        self.register()?;
        while self.step()? {}
        info!("disconnected");
        Ok(())
    }

    /// Reads and handles one line. Returns false once the connection is closed.
    pub fn step(&mut self) -> Result<bool, Error> {
        let line = match self.conn.read()? {
            Some(line) => line,
            None => return Ok(false),
        };

        let msg = match Message::parse(&line) {
            Ok(msg) => msg,
            Err(err) => {
                warn!("skipping line: {}", err);
                return Ok(true);
            }
        };

        // hide the ping spam
        if msg.command() != "PING" {
            debug!("{}", msg);
        }

        self.handle(&msg)?;
        Ok(true)
    }

    fn handle(&mut self, msg: &Message) -> Result<(), Error> {
        match msg.command() {
            "PING" => {
                let token = msg.trailing().or_else(|| msg.target()).unwrap_or_default();
                self.conn.pong(token)?;
            }
            "001" => {
                info!("registered, joining {}", self.config.channel);
                self.conn.join(&self.config.channel)?;
            }
            "PRIVMSG" => self.privmsg(msg)?,
            _ => {}
        }
        Ok(())
    }

    fn privmsg(&mut self, msg: &Message) -> Result<(), Error> {
        let target = match reply_target(msg) {
            Some(target) => target,
            None => {
                warn!("cannot reply to: {}", msg.raw());
                return Ok(());
            }
        };

        let mut replies = vec![];
        match self.commands.dispatch(&self.config, msg, &self.config.bang) {
            Ok(Some(reply)) => replies.push(reply),
            Ok(None) => {}
            Err(err) => error!("{}", err),
        }

        for handler in &self.passive {
            match handler.call(&self.config, msg) {
                Ok(Some(reply)) if !reply.is_empty() => replies.push(reply),
                Ok(_) => {}
                Err(err) => error!("privmsg handler failed: {}", err),
            }
        }

        for reply in replies {
            self.conn.privmsg(target, &reply)?;
        }
        Ok(())
    }
}

/// Channel messages are answered in the channel, private ones to the sender
fn reply_target(msg: &Message) -> Option<&str> {
    match msg.target() {
        Some(target) if target.starts_with('#') || target.starts_with('&') => Some(target),
        _ => msg.nickname(),
    }
}
