//! Bounded byte queue
//!
//! Fixed-capacity circular buffer used for application payload in both
//! directions. One slot is always left empty so that `r == w` means empty
//! without a separate counter, giving a usable capacity of `N - 1` bytes.
//!
//! The queue is meant for exactly one producer and one consumer. Multi-byte
//! transfers never copy across the wrap boundary in a single move; they are
//! split into at most two contiguous chunks per pass.

/// Circular byte queue with `N - 1` usable slots
#[derive(Debug, Clone)]
pub struct ByteFifo<const N: usize> {
    buf: [u8; N],
    r: usize,
    w: usize,
}

impl<const N: usize> Default for ByteFifo<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ByteFifo<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            r: 0,
            w: 0,
        }
    }

    /// Total usable capacity
    pub const fn capacity(&self) -> usize {
        N.saturating_sub(1)
    }

    /// Reset both cursors. Stale bytes stay in memory but become unreachable.
    pub fn clear(&mut self) {
        self.r = 0;
        self.w = 0;
    }

    fn inc(i: usize, n: usize) -> usize {
        (i + n) % N
    }

    // producer side

    /// Number of bytes that can still be written
    pub fn writable_capacity(&self) -> usize {
        self.capacity() - self.size()
    }

    /// Whether at least one byte can be written
    pub fn writeable(&self) -> bool {
        self.writable_capacity() > 0
    }

    /// Store one byte. Returns `false` without touching the queue when full.
    pub fn put(&mut self, byte: u8) -> bool {
        if N == 0 {
            return false;
        }
        let next = Self::inc(self.w, 1);
        if next == self.r {
            return false;
        }
        self.buf[self.w] = byte;
        self.w = next;
        true
    }

    /// Copy as many bytes as currently fit and return how many were written.
    pub fn put_slice(&mut self, data: &[u8]) -> usize {
        let mut written = 0;
        while written < data.len() {
            let free = self.writable_capacity();
            if free == 0 {
                break;
            }
            written += self.put_chunk(&data[written..], free);
        }
        written
    }

    /// Copy all of `data`, calling `wait` whenever the queue is full.
    ///
    /// This is a spin-wait: `wait` must give the consumer a chance to drain
    /// the queue (it receives the queue for that purpose), otherwise the call
    /// never returns.
    pub fn put_slice_blocking<F>(&mut self, data: &[u8], mut wait: F) -> usize
    where
        F: FnMut(&mut Self),
    {
        let mut written = 0;
        while written < data.len() {
            let free = self.writable_capacity();
            if free == 0 {
                wait(self);
                continue;
            }
            written += self.put_chunk(&data[written..], free);
        }
        written
    }

    fn put_chunk(&mut self, data: &[u8], free: usize) -> usize {
        let w = self.w;
        let count = data.len().min(free).min(N - w);
        self.buf[w..w + count].copy_from_slice(&data[..count]);
        self.w = Self::inc(w, count);
        count
    }

    // consumer side

    /// Whether at least one byte is buffered
    pub fn readable(&self) -> bool {
        self.r != self.w
    }

    /// Number of buffered bytes
    pub fn size(&self) -> usize {
        if self.w >= self.r {
            self.w - self.r
        } else {
            self.w + N - self.r
        }
    }

    /// Take the oldest byte
    pub fn get(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.r = Self::inc(self.r, 1);
        Some(byte)
    }

    /// Look at the oldest byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        if self.r == self.w {
            return None;
        }
        Some(self.buf[self.r])
    }

    /// Copy out as many buffered bytes as fit in `out` and return the count.
    pub fn get_slice(&mut self, out: &mut [u8]) -> usize {
        let mut read = 0;
        while read < out.len() {
            let size = self.size();
            if size == 0 {
                break;
            }
            read += self.get_chunk(&mut out[read..], size);
        }
        read
    }

    /// Fill all of `out`, calling `wait` whenever the queue is empty.
    ///
    /// Mirror of [`put_slice_blocking`](Self::put_slice_blocking): `wait`
    /// must let a producer refill the queue.
    pub fn get_slice_blocking<F>(&mut self, out: &mut [u8], mut wait: F) -> usize
    where
        F: FnMut(&mut Self),
    {
        let mut read = 0;
        while read < out.len() {
            let size = self.size();
            if size == 0 {
                wait(self);
                continue;
            }
            read += self.get_chunk(&mut out[read..], size);
        }
        read
    }

    fn get_chunk(&mut self, out: &mut [u8], size: usize) -> usize {
        let r = self.r;
        let count = out.len().min(size).min(N - r);
        out[..count].copy_from_slice(&self.buf[r..r + count]);
        self.r = Self::inc(r, count);
        count
    }
}
