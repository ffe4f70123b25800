use super::Prefix;
use std::fmt;

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("malformed line: {0:?}")]
    MalformedLine(String),
}

/// A single parsed line. Built fresh for every line read and never mutated.
#[derive(Debug, PartialEq, Clone)]
pub struct Message {
    raw: String,
    prefix: Option<Prefix>,
    command: String,
    params: Vec<String>,
    trailing: Option<String>,
}

impl Message {
    pub fn parse(input: &str) -> Result<Message, ParseError> {
        let malformed = || ParseError::MalformedLine(input.to_string());

        let line = input.trim_end_matches(&['\r', '\n'][..]);
        if line.trim().is_empty() {
            return Err(malformed());
        }

        let (prefix, mut rest) = if line.starts_with(':') {
            match line.find(' ') {
                Some(pos) => (Prefix::parse(&line[1..pos]), &line[pos..]),
                None => (Prefix::parse(&line[1..]), ""),
            }
        } else {
            (None, line)
        };

        let mut command = None;
        let mut params = vec![];
        let mut trailing = None;

        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }

            if command.is_some() && rest.starts_with(':') {
                trailing = Some(rest[1..].to_string());
                break;
            }

            let (token, tail) = match rest.find(' ') {
                Some(pos) => rest.split_at(pos),
                None => (rest, ""),
            };

            if command.is_none() {
                command = Some(token)
            } else {
                params.push(token.to_string())
            }
            rest = tail;
        }

        let command = match command {
            Some(command) if !command.starts_with(':') => command.to_string(),
            _ => return Err(malformed()),
        };

        Ok(Self {
            raw: input.to_string(),
            prefix,
            command,
            params,
            trailing,
        })
    }

    /// The line as it was received
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn prefix(&self) -> Option<&Prefix> {
        self.prefix.as_ref()
    }

    pub fn nickname(&self) -> Option<&str> {
        self.prefix.as_ref().map(Prefix::name)
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn trailing(&self) -> Option<&str> {
        self.trailing.as_ref().map(String::as_str)
    }

    /// The first middle parameter, usually the target of a PRIVMSG
    pub fn target(&self) -> Option<&str> {
        self.params.first().map(String::as_str)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        write!(f, "{}", self.command)?;
        for param in &self.params {
            write!(f, " {}", param)?;
        }
        if let Some(trailing) = &self.trailing {
            write!(f, " :{}", trailing)?;
        }
        Ok(())
    }
}
