use log::*;
use std::io::{self, prelude::*, BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

#[derive(Debug, thiserror::Error)]
pub enum ConnError {
    #[error("cannot connect: {0}")]
    CannotConnect(#[source] io::Error),
    #[error("connection error: {0}")]
    Io(#[from] io::Error),
}

/// A line oriented connection to the server
pub trait Conn {
    /// Reads the next line with its `\r\n` stripped. `None` means the peer hung up.
    fn read(&mut self) -> io::Result<Option<String>>;

    /// Writes one raw line, the `\r\n` is added here
    fn write(&mut self, raw: &str) -> io::Result<()>;

    fn privmsg(&mut self, target: &str, data: &str) -> io::Result<()> {
        debug!("> [{}]: {}", target, data);
        self.write(&format!("PRIVMSG {} :{}", target, data))
    }

    fn join(&mut self, channel: &str) -> io::Result<()> {
        self.write(&format!("JOIN {}", channel))
    }

    fn nick(&mut self, nickname: &str) -> io::Result<()> {
        self.write(&format!("NICK {}", nickname))
    }

    fn user(&mut self, username: &str, mode: u32, fullname: &str) -> io::Result<()> {
        self.write(&format!("USER {} {} * :{}", username, mode, fullname))
    }

    fn pong(&mut self, token: &str) -> io::Result<()> {
        self.write(&format!("PONG :{}", token))
    }
}

pub struct TcpConn {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl TcpConn {
    pub fn connect<A>(addr: A) -> Result<Self, ConnError>
    where
        A: ToSocketAddrs,
    {
        let conn = TcpStream::connect(addr).map_err(ConnError::CannotConnect)?;
        debug!("connected");

        let reader = BufReader::new(conn.try_clone()?);
        let writer = BufWriter::new(conn);
        Ok(Self { reader, writer })
    }
}

impl Conn for TcpConn {
    fn read(&mut self) -> io::Result<Option<String>> {
        let mut buf = vec![];
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            debug!("connection closed");
            return Ok(None);
        }

        // not everyone sends utf-8
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(LINE_BREAKS);
        trace!("<-- {}", line);
        Ok(Some(line.to_string()))
    }

    fn write(&mut self, raw: &str) -> io::Result<()> {
        for part in split(raw) {
            trace!("--> {}", &part[..part.len() - 2]); // trim the \r\n
            self.writer.write_all(part.as_bytes())?;
        }
        self.writer.flush()
    }
}

const MAX_LINE: usize = 510;
const LINE_BREAKS: &[char] = &['\r', '\n'];

/// Splits a raw line into `\r\n` terminated lines that fit the protocol limit.
///
/// The trailing parameter is broken up at embedded line breaks and, when too
/// long, chunked on char boundaries. Every piece is sent under everything
/// before the first `:`. Without a trailing parameter line breaks become spaces.
pub fn split(raw: &str) -> Vec<String> {
    let raw = raw.trim_end_matches(LINE_BREAKS);
    let pos = match raw.find(':') {
        Some(pos) => pos,
        None => {
            let line = raw.replace(LINE_BREAKS, " ");
            if line.len() > MAX_LINE {
                warn!("line too long and cannot be split, sending as is");
            }
            return vec![format!("{}\r\n", line)];
        }
    };

    if raw.len() <= MAX_LINE && !raw.contains(LINE_BREAKS) {
        return vec![format!("{}\r\n", raw)];
    }

    let head = raw[..pos].replace(LINE_BREAKS, " ");
    let head = head.trim();
    // head + " :"
    let room = MAX_LINE.checked_sub(head.len() + 2).filter(|&room| room > 0);

    let mut lines = vec![];
    for part in raw[pos + 1..].split(LINE_BREAKS).filter(|s| !s.is_empty()) {
        match room {
            Some(room) => chunk(head, part, room, &mut lines),
            None => {
                warn!("line head too long, sending as is");
                lines.push(format!("{} :{}\r\n", head, part))
            }
        }
    }
    lines
}

fn chunk(head: &str, mut rest: &str, room: usize, lines: &mut Vec<String>) {
    while !rest.is_empty() {
        let mut end = room.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (part, next) = rest.split_at(end);
        lines.push(format!("{} :{}\r\n", head, part));
        rest = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Duration;

    fn loopback() -> (TcpConn, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let conn = TcpConn::connect(listener.local_addr().unwrap()).unwrap();
        let (server, _) = listener.accept().unwrap();
        server.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        (conn, server)
    }

    #[test]
    fn split_short() {
        assert_eq!(split("PRIVMSG #test :hello"), vec!["PRIVMSG #test :hello\r\n"]);
        assert_eq!(split("JOIN #test\r\n"), vec!["JOIN #test\r\n"]);
    }

    #[test]
    fn split_long() {
        let data = "a".repeat(1000);
        let lines = split(&format!("PRIVMSG #test :{}", data));
        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert!(line.starts_with("PRIVMSG #test :"));
            assert!(line.len() <= MAX_LINE + 2);
        }

        let joined = lines
            .iter()
            .map(|s| s.trim_end()["PRIVMSG #test :".len()..].to_string())
            .collect::<String>();
        assert_eq!(joined, data);
    }

    #[test]
    fn split_char_boundary() {
        let data = "\u{00e9}".repeat(600); // 2 bytes each
        let lines = split(&format!("PRIVMSG #test :{}", data));
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.len() <= MAX_LINE + 2);
            assert!(line.ends_with("\r\n"));
        }
    }

    #[test]
    fn split_without_trailing() {
        let data = "x".repeat(600);
        assert_eq!(split(&data).len(), 1);
    }

    #[test]
    fn split_line_breaks() {
        assert_eq!(
            split("PRIVMSG #bot :hi\r\nQUIT :bye"),
            vec!["PRIVMSG #bot :hi\r\n", "PRIVMSG #bot :QUIT :bye\r\n"]
        );
        assert_eq!(
            split("PRIVMSG #bot :one\n\ntwo\rthree\r\n"),
            vec![
                "PRIVMSG #bot :one\r\n",
                "PRIVMSG #bot :two\r\n",
                "PRIVMSG #bot :three\r\n",
            ]
        );
        assert_eq!(split("JOIN #bot\r\nQUIT"), vec!["JOIN #bot QUIT\r\n"]);
        assert_eq!(split("PRIVMSG #bot\nQUIT :hi"), vec!["PRIVMSG #bot QUIT :hi\r\n"]);

        // no line ever carries a break before its own terminator
        for line in split(&format!("PRIVMSG #bot :{}\n{}", "a".repeat(600), "b")) {
            assert!(!line[..line.len() - 2].contains(LINE_BREAKS));
        }
    }

    #[test]
    fn tcp_read_lines() {
        let (mut conn, mut server) = loopback();
        server.write_all(b":bob!u@h PRIVMSG #bot :caf\xe9\r\n").unwrap();
        server.write_all(b":alice!u@h PRIVMSG #bot :!hello\r\n").unwrap();
        server.write_all(b"PING :bare\n").unwrap(); // no \r
        drop(server);

        assert_eq!(conn.read().unwrap(), Some(":bob!u@h PRIVMSG #bot :caf\u{fffd}".into()));
        assert_eq!(conn.read().unwrap(), Some(":alice!u@h PRIVMSG #bot :!hello".into()));
        assert_eq!(conn.read().unwrap(), Some("PING :bare".into()));
        assert_eq!(conn.read().unwrap(), None);
    }

    #[test]
    fn tcp_write_flushes() {
        let (mut conn, mut server) = loopback();
        conn.write(&format!("PRIVMSG #bot :{}", "a".repeat(600))).unwrap();
        conn.privmsg("#bot", "hi\nQUIT").unwrap();

        let expected = format!(
            "PRIVMSG #bot :{}\r\nPRIVMSG #bot :{}\r\nPRIVMSG #bot :hi\r\nPRIVMSG #bot :QUIT\r\n",
            "a".repeat(496),
            "a".repeat(104)
        );

        // the conn is still open, so this only passes if it flushed
        let mut buf = vec![0; expected.len()];
        server.read_exact(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }
}
