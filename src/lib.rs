mod bot;
mod command;

// useful things for use outside of the bot
pub mod config;
pub mod irc;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::bot::{Bot, Error};
pub use crate::command::{dispatch, BoxError, CommandMap, Handler, HandlerError, HandlerResult};
pub use crate::command::Error as RegistryError;
pub use crate::config::Config;

pub mod prelude {
    pub use crate::bot::{Bot, Error as BotError};
    pub use crate::command::{
        dispatch, BoxError, CommandMap, Error as RegistryError, Handler, HandlerError,
        HandlerResult,
    };
    pub use crate::config::{self, Config};
    pub use crate::irc::{self, Conn, ConnError, Message, ParseError, Prefix, TcpConn};
    pub use crate::util;
}
