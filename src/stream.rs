//! Output buffering and sample accounting of a conversion stream.

// -------------------------------------------------------------------------------------------------

/// Output frames which may be emitted beyond the exact rate ratio when flushing a resampled stream.
pub const FLUSH_SLACK: u64 = 2;

// -------------------------------------------------------------------------------------------------

/// Lifecycle of a conversion stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum StreamPhase {
    /// Output is discarded until the filters' group delay got consumed.
    Priming,
    /// Output is emitted as it gets produced.
    Steady,
    /// End of stream got signaled: output is emitted up to the flush limit.
    Draining,
    /// All output got emitted. No more input is accepted.
    Finished,
}

// -------------------------------------------------------------------------------------------------

/// Tracks consumed and emitted frames, the remaining group delay and end of stream state.
#[derive(Debug, Clone)]
pub struct StreamAccounting {
    source_rate: u64,
    dest_rate: u64,
    flush_slack: u64,
    initial_delay: u64,
    delay: u64,
    frames_consumed: u64,
    frames_emitted: u64,
    end_of_stream: bool,
    input_exhausted: bool,
    finished: bool,
}

impl StreamAccounting {
    pub fn new(source_rate: u32, dest_rate: u32, delay: usize, flush_slack: u64) -> Self {
        Self {
            source_rate: source_rate as u64,
            dest_rate: dest_rate as u64,
            flush_slack,
            initial_delay: delay as u64,
            delay: delay as u64,
            frames_consumed: 0,
            frames_emitted: 0,
            end_of_stream: false,
            input_exhausted: false,
            finished: false,
        }
    }

    pub fn phase(&self) -> StreamPhase {
        if self.finished {
            StreamPhase::Finished
        } else if self.end_of_stream {
            StreamPhase::Draining
        } else if self.delay > 0 {
            StreamPhase::Priming
        } else {
            StreamPhase::Steady
        }
    }

    pub fn frames_consumed(&self) -> u64 {
        self.frames_consumed
    }

    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn signal_end_of_stream(&mut self) {
        self.end_of_stream = true;
    }

    /// Mark that the caller ran out of input: a put after the end of stream provided less than
    /// a full batch. Only then the stream gets flushed and finishes.
    pub fn signal_input_exhausted(&mut self) {
        debug_assert!(self.end_of_stream, "input exhausted before the end of stream");
        self.input_exhausted = true;
    }

    /// Count real (not zero padded) source frames fed into the resampler.
    pub fn consume(&mut self, frames: usize) {
        self.frames_consumed += frames as u64;
    }

    /// Total number of output frames the stream emits when flushing after the frames consumed
    /// so far.
    pub fn flush_limit(&self) -> u64 {
        self.frames_consumed * self.dest_rate / self.source_rate + self.flush_slack
    }

    /// Decide which of `produced` freshly produced output frames get emitted.
    /// Returns the range of the produced frames to emit.
    pub fn admit(&mut self, produced: usize) -> std::ops::Range<usize> {
        let produced = produced as u64;
        let mut start = 0;
        if self.delay > 0 {
            if produced < self.delay {
                self.delay -= produced;
                return 0..0;
            }
            start = self.delay;
            self.delay = 0;
        }
        let mut count = produced - start;
        if self.input_exhausted {
            let limit = self.flush_limit();
            if self.frames_emitted + count >= limit {
                count = limit.saturating_sub(self.frames_emitted);
                self.finished = true;
            }
        }
        self.frames_emitted += count;
        start as usize..(start + count) as usize
    }

    pub fn reset(&mut self) {
        self.delay = self.initial_delay;
        self.frames_consumed = 0;
        self.frames_emitted = 0;
        self.end_of_stream = false;
        self.input_exhausted = false;
        self.finished = false;
    }
}

// -------------------------------------------------------------------------------------------------

/// Fixed size byte buffer which collects encoded output until it gets fetched in batches.
#[derive(Debug, Clone)]
pub struct OutputRing {
    buffer: Vec<u8>,
    len: usize,
    batch_size: usize,
}

impl OutputRing {
    /// Create a new ring which can hold a full batch plus `max_write` bytes.
    pub fn new(batch_size: usize, max_write: usize) -> Self {
        Self {
            buffer: vec![0; batch_size + max_write],
            len: 0,
            batch_size,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when at least a full batch is pending.
    pub fn has_batch(&self) -> bool {
        self.len >= self.batch_size
    }

    /// Unused space at the end of the ring.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buffer[self.len..]
    }

    /// Mark `count` bytes of the spare space as written.
    pub fn commit(&mut self, count: usize) {
        debug_assert!(self.len + count <= self.buffer.len());
        self.len += count;
    }

    /// Copy a full batch into `output` and move the remaining bytes to the front.
    /// Returns false when less than a full batch is pending.
    pub fn pop_batch(&mut self, output: &mut [u8]) -> bool {
        if !self.has_batch() {
            return false;
        }
        output[..self.batch_size].copy_from_slice(&self.buffer[..self.batch_size]);
        self.buffer.copy_within(self.batch_size..self.len, 0);
        self.len -= self.batch_size;
        true
    }

    /// Copy up to a batch of pending bytes into `output` and move the remaining bytes to the
    /// front. Returns the number of copied bytes.
    pub fn pop_remaining(&mut self, output: &mut [u8]) -> usize {
        let count = self.len.min(self.batch_size).min(output.len());
        output[..count].copy_from_slice(&self.buffer[..count]);
        self.buffer.copy_within(count..self.len, 0);
        self.len -= count;
        count
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

// -------------------------------------------------------------------------------------------------
