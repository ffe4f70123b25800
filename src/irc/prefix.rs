use std::fmt;

/// Origin of a message: `nick!user@host` or a server name
#[derive(Debug, PartialEq, Clone)]
pub enum Prefix {
    User {
        nick: String,
        user: String,
        host: Option<String>,
    },
    // anything without a '!' lands here, including a bare `nick@host`
    Server {
        host: String,
    },
}

impl Prefix {
    /// Parses a prefix without its leading colon. Returns None for an empty prefix.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        if s.is_empty() {
            return None;
        }

        match s.find('!') {
            Some(pos) => {
                let nick = &s[..pos];
                let rest = &s[pos + 1..];
                let (user, host) = match rest.find('@') {
                    Some(at) => (&rest[..at], Some(rest[at + 1..].to_string())),
                    None => (rest, None),
                };
                Some(Prefix::User {
                    nick: nick.into(),
                    user: user.into(),
                    host,
                })
            }
            None => Some(Prefix::Server { host: s.into() }),
        }
    }

    /// The nickname portion: everything before the first `!`,
    /// or the whole prefix when there is none.
    pub fn name(&self) -> &str {
        match self {
            Prefix::User { nick, .. } => nick,
            Prefix::Server { host } => host,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::User {
                nick,
                user,
                host: Some(host),
            } => write!(f, "{}!{}@{}", nick, user, host),
            Prefix::User { nick, user, .. } => write!(f, "{}!{}", nick, user),
            Prefix::Server { host } => write!(f, "{}", host),
        }
    }
}
