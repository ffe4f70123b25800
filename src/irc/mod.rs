mod conn;
mod message;
mod prefix;

pub use self::conn::{split, Conn, ConnError, TcpConn};
pub use self::message::{Message, ParseError};
pub use self::prefix::Prefix;
