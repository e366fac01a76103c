use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// In-memory writer whose bytes stay readable after the writer is moved away
#[derive(Debug, Clone, Default)]
pub struct SharedLog {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.bytes.lock().clone()
    }

    pub fn lines(&self) -> usize {
        self.bytes.lock().iter().filter(|&&b| b == b'\n').count()
    }
}

impl Write for SharedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
