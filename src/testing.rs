use crate::irc::Conn;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .is_test(true)
        .try_init();
}

#[derive(Default)]
struct Inner {
    read: VecDeque<String>,
    write: VecDeque<String>,
}

/// An in-memory connection. Clones share the same buffers, so a test can keep
/// one and hand the other to a `Bot`.
#[derive(Clone, Default)]
pub struct TestConn {
    inner: Rc<RefCell<Inner>>,
}

impl TestConn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a line for the bot to read
    pub fn push(&self, line: &str) {
        self.inner.borrow_mut().read.push_back(line.to_string())
    }

    /// Takes the oldest line the bot wrote, without its `\r\n`
    pub fn pop(&self) -> Option<String> {
        self.inner.borrow_mut().write.pop_front()
    }

    pub fn drain(&self) -> Vec<String> {
        self.inner.borrow_mut().write.drain(..).collect()
    }
}

impl Conn for TestConn {
    fn read(&mut self) -> io::Result<Option<String>> {
        Ok(self.inner.borrow_mut().read.pop_front())
    }

    fn write(&mut self, raw: &str) -> io::Result<()> {
        let mut inner = self.inner.borrow_mut();
        for line in crate::irc::split(raw) {
            inner.write.push_back(line.trim_end_matches("\r\n").to_string());
        }
        Ok(())
    }
}
