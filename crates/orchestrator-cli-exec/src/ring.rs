/// Accumulates child-process output up to a soft byte cap, trimming the
/// oldest bytes rather than refusing to record more — spec §4.4 calls for
/// "trim, do not kill" so a chatty process can't be starved of output
/// capture just because it's verbose.
pub struct RingAccumulator {
    buffer: String,
    cap_bytes: usize,
}

impl RingAccumulator {
    pub fn new(cap_bytes: usize) -> Self {
        Self { buffer: String::new(), cap_bytes }
    }

    pub fn push_line(&mut self, line: &str) {
        self.buffer.push_str(line);
        self.buffer.push('\n');
        if self.buffer.len() > self.cap_bytes {
            let excess = self.buffer.len() - self.cap_bytes;
            let mut boundary = excess;
            while boundary < self.buffer.len() && !self.buffer.is_char_boundary(boundary) {
                boundary += 1;
            }
            self.buffer.drain(..boundary);
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
