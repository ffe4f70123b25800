use crate::irc::Message;
use log::*;

use std::collections::HashMap;
use std::fmt;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<Option<String>, BoxError>;

/// Something that can answer a command.
///
/// Any `Fn(&T, &Message) -> HandlerResult` closure is a handler. `T` is the
/// context the bot hands out, for the [`Bot`](crate::Bot) this is its `Config`.
pub trait Handler<T>: Send + Sync {
    fn call(&self, ctx: &T, msg: &Message) -> HandlerResult;
}

impl<T, F> Handler<T> for F
where
    F: Fn(&T, &Message) -> HandlerResult + Send + Sync,
{
    fn call(&self, ctx: &T, msg: &Message) -> HandlerResult {
        (self)(ctx, msg)
    }
}

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum Error {
    #[error("command '{0}' already exists")]
    AlreadyExists(String),
    #[error("invalid command name: {0:?}")]
    InvalidName(String),
}

/// A handler failed while producing its reply
#[derive(Debug, thiserror::Error)]
#[error("command '{command}' failed: {cause}")]
pub struct HandlerError {
    pub command: String,
    #[source]
    pub cause: BoxError,
}

/// Command name to handler table. Names are matched case-sensitively and
/// can only be registered once.
pub struct CommandMap<T> {
    map: HashMap<String, Box<dyn Handler<T>>>,
}

impl<T> Default for CommandMap<T> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<T> fmt::Debug for CommandMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl<T> CommandMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S, F>(&mut self, name: S, handler: F) -> Result<(), Error>
    where
        S: ToString,
        F: Handler<T> + 'static,
    {
        let name = name.to_string();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(Error::InvalidName(name));
        }

        if self.map.contains_key(&name) {
            warn!("{} already exists", name);
            return Err(Error::AlreadyExists(name));
        }

        debug!("registered command: {}", name);
        self.map.insert(name, Box::new(handler));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.map.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn dispatch(
        &self,
        ctx: &T,
        msg: &Message,
        prefix: &str,
    ) -> Result<Option<String>, HandlerError> {
        let name = match command_word(msg, prefix) {
            Some(name) => name,
            None => return Ok(None),
        };

        let handler = match self.map.get(name) {
            Some(handler) => handler,
            None => {
                trace!("unknown command: {}", name);
                return Ok(None);
            }
        };

        debug!("calling command: {}", name);
        match handler.call(ctx, msg) {
            Ok(Some(reply)) if !reply.is_empty() => Ok(Some(reply)),
            Ok(_) => Ok(None),
            Err(cause) => Err(HandlerError {
                command: name.to_string(),
                cause,
            }),
        }
    }
}

/// Runs the handler the message names, if any.
///
/// Only a `PRIVMSG` whose trailing text starts with `prefix` directly followed
/// by a registered command word is dispatched. Everything else is `Ok(None)`.
pub fn dispatch<T>(
    ctx: &T,
    msg: &Message,
    prefix: &str,
    handlers: &CommandMap<T>,
) -> Result<Option<String>, HandlerError> {
    handlers.dispatch(ctx, msg, prefix)
}

fn command_word<'a>(msg: &'a Message, prefix: &str) -> Option<&'a str> {
    if msg.command() != "PRIVMSG" {
        return None;
    }

    let data = msg.trailing().filter(|s| !s.is_empty())?;
    let rest = data.strip_prefix(prefix)?;
    let word = rest.split(char::is_whitespace).next()?;
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}
