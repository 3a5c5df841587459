//! Shared helpers for the integration tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Sink backed by shared memory so tests can inspect local output.
#[derive(Clone, Default)]
pub struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().expect("lock poisoned").clone()
    }

    pub fn contents_string(&self) -> String {
        String::from_utf8(self.contents()).expect("sink holds UTF-8 in these tests")
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("lock poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
