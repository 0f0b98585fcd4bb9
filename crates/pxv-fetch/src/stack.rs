//! Plane retrieval orchestration and stack composition.
//!
//! [`PlaneFetcher`] is the front door of the retrieval layer: it validates
//! every (z, c, t) address against the pixel set's declared dimensions
//! before any background work is issued, then runs the fetch on the
//! executor pool. A full-stack fetch composes one filler per channel and
//! exposes the result as a single sequential byte stream whose length is
//! the per-channel stack size times the channel count.
//!
//! # Usage
//!
//! ```rust,ignore
//! let fetcher = PlaneFetcher::new(Arc::new(store), 4);
//! let handle = fetcher.fetch_plane(z, c, t)?;
//! match handle.wait()? {
//!     FetchOutcome::Ready(bytes) => render(bytes),
//!     FetchOutcome::Cancelled => {}
//! }
//! ```

use crate::error::{FetchError, FetchResult};
use crate::executor::{FetchExecutor, FetchHandle, FetchOutcome};
use pxv_core::PixelsSpec;
use std::sync::Arc;

/// The remote pixel store, as seen from this layer: declared shape plus
/// raw bytes per plane. Implementations wrap whatever transport the
/// application uses.
pub trait PixelSource: Send + Sync + 'static {
    /// The declared dimensions and storage kind of the pixel set.
    fn spec(&self) -> PixelsSpec;

    /// The raw big-endian bytes of one plane.
    fn plane_bytes(&self, z: u32, c: u32, t: u32) -> FetchResult<Vec<u8>>;
}

/// Bounds-checked, pooled plane retrieval over one pixel source.
#[derive(Debug)]
pub struct PlaneFetcher<S: PixelSource> {
    source: Arc<S>,
    executor: FetchExecutor,
}

impl<S: PixelSource> PlaneFetcher<S> {
    /// Creates a fetcher running fetches on `workers` pool threads.
    pub fn new(source: Arc<S>, workers: usize) -> Self {
        Self {
            source,
            executor: FetchExecutor::new(workers),
        }
    }

    /// The pixel set description this fetcher serves.
    pub fn spec(&self) -> PixelsSpec {
        self.source.spec()
    }

    /// Issues a background fetch for one plane.
    ///
    /// The (z, c, t) address is checked against the declared dimensions
    /// first; an out-of-bounds address fails on the calling thread and no
    /// command is ever queued.
    pub fn fetch_plane(&self, z: u32, c: u32, t: u32) -> FetchResult<FetchHandle<Vec<u8>>> {
        let spec = self.source.spec();
        spec.dims().check_plane(z, c, t)?;
        tracing::debug!(z, c, t, "issuing plane fetch");
        let source = Arc::clone(&self.source);
        Ok(self.executor.submit(move || source.plane_bytes(z, c, t)))
    }

    /// Issues a full-stack fetch at timepoint `t`: one background filler
    /// per channel, each retrieving that channel's z-stack in order.
    pub fn fetch_stack(&self, t: u32) -> FetchResult<StackStream> {
        let spec = self.source.spec();
        let dims = *spec.dims();
        dims.check_plane(0, 0, t)?;
        tracing::debug!(t, channels = dims.size_c, "issuing stack fetch");
        let fillers = (0..dims.size_c)
            .map(|c| {
                let source = Arc::clone(&self.source);
                let handle = self.executor.submit(move || {
                    let mut stack = Vec::new();
                    for z in 0..dims.size_z {
                        stack.extend_from_slice(&source.plane_bytes(z, c, t)?);
                    }
                    Ok(stack)
                });
                ChannelFiller {
                    handle,
                    data: None,
                    pos: 0,
                }
            })
            .collect();
        Ok(StackStream {
            fillers,
            current: 0,
            len: spec.stack_size() * dims.size_c as usize,
        })
    }
}

#[derive(Debug)]
struct ChannelFiller {
    handle: FetchHandle<Vec<u8>>,
    data: Option<Vec<u8>>,
    pos: usize,
}

impl ChannelFiller {
    /// Copies as many bytes as fit into `buf`, resolving the background
    /// fetch on first use. Returns 0 once this channel is exhausted.
    fn read_into(&mut self, buf: &mut [u8]) -> FetchResult<usize> {
        if self.data.is_none() {
            match self.handle.wait()? {
                FetchOutcome::Ready(bytes) => self.data = Some(bytes),
                FetchOutcome::Cancelled => return Err(FetchError::Cancelled),
            }
        }
        let data = self.data.as_deref().unwrap_or(&[]);
        let n = (data.len() - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Sequential byte stream over a multi-channel stack fetch.
///
/// Bytes arrive channel by channel, each channel's z-stack in z order;
/// the stream advances to the next channel's filler transparently when
/// the current one runs dry.
#[derive(Debug)]
pub struct StackStream {
    fillers: Vec<ChannelFiller>,
    current: usize,
    len: usize,
}

impl StackStream {
    /// Total stream length in bytes: per-channel stack size times channel
    /// count.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for a zero-channel stream.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fills `buf` from the stream.
    ///
    /// Returns the number of bytes written — blocking on the underlying
    /// fillers as needed — or `None` once the stream is exhausted.
    pub fn read(&mut self, buf: &mut [u8]) -> FetchResult<Option<usize>> {
        if buf.is_empty() {
            return Ok(Some(0));
        }
        let mut written = 0;
        while written < buf.len() && self.current < self.fillers.len() {
            let n = self.fillers[self.current].read_into(&mut buf[written..])?;
            if n == 0 {
                self.current += 1;
            } else {
                written += n;
            }
        }
        if written == 0 { Ok(None) } else { Ok(Some(written)) }
    }

    /// Cancels every outstanding filler.
    pub fn cancel(&self) {
        for filler in &self.fillers {
            filler.handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pxv_core::{PixelKind, PixelsDims};

    /// Deterministic in-memory store: every plane byte encodes its
    /// (z, c, t) address.
    struct MemoryStore {
        spec: PixelsSpec,
        fail_channel: Option<u32>,
        plane_delay: Option<std::time::Duration>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                spec: PixelsSpec::new(PixelsDims::new(4, 2, 3, 2, 2), PixelKind::UInt8),
                fail_channel: None,
                plane_delay: None,
            }
        }
    }

    impl PixelSource for MemoryStore {
        fn spec(&self) -> PixelsSpec {
            self.spec
        }

        fn plane_bytes(&self, z: u32, c: u32, t: u32) -> FetchResult<Vec<u8>> {
            if let Some(delay) = self.plane_delay {
                std::thread::sleep(delay);
            }
            if self.fail_channel == Some(c) {
                return Err(FetchError::data_source("channel unavailable"));
            }
            let marker = (100 * c + 10 * z + t) as u8;
            Ok(vec![marker; self.spec.plane_size()])
        }
    }

    #[test]
    fn test_out_of_bounds_fails_before_issuing() {
        let fetcher = PlaneFetcher::new(Arc::new(MemoryStore::new()), 2);
        assert!(matches!(
            fetcher.fetch_plane(3, 0, 0),
            Err(FetchError::Bounds(_))
        ));
        assert!(matches!(
            fetcher.fetch_plane(0, 2, 0),
            Err(FetchError::Bounds(_))
        ));
        assert!(matches!(
            fetcher.fetch_plane(0, 0, 2),
            Err(FetchError::Bounds(_))
        ));
    }

    #[test]
    fn test_fetch_plane_delivers_bytes() {
        let fetcher = PlaneFetcher::new(Arc::new(MemoryStore::new()), 2);
        let handle = fetcher.fetch_plane(2, 1, 1).unwrap();
        match handle.wait().unwrap() {
            FetchOutcome::Ready(bytes) => {
                assert_eq!(bytes.len(), 8);
                assert!(bytes.iter().all(|&b| b == 121));
            }
            FetchOutcome::Cancelled => panic!("fetch was not cancelled"),
        }
    }

    #[test]
    fn test_stack_stream_length_and_order() {
        let fetcher = PlaneFetcher::new(Arc::new(MemoryStore::new()), 2);
        let mut stream = fetcher.fetch_stack(1).unwrap();
        // 2 channels x 3 planes x 8 bytes
        assert_eq!(stream.len(), 48);

        let mut collected = Vec::new();
        let mut buf = [0u8; 7];
        while let Some(n) = stream.read(&mut buf).unwrap() {
            collected.extend_from_slice(&buf[..n]);
        }
        assert_eq!(collected.len(), 48);
        // Channel 0: z = 0, 1, 2 then channel 1.
        let expected: Vec<u8> = [1u8, 11, 21, 101, 111, 121]
            .iter()
            .flat_map(|&marker| std::iter::repeat_n(marker, 8))
            .collect();
        assert_eq!(collected, expected);
        // Exhausted stream keeps reporting end of stream.
        assert!(stream.read(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_stack_stream_surfaces_source_failure() {
        let store = MemoryStore {
            fail_channel: Some(1),
            ..MemoryStore::new()
        };
        let fetcher = PlaneFetcher::new(Arc::new(store), 2);
        let mut stream = fetcher.fetch_stack(0).unwrap();
        let mut buf = vec![0u8; 64];
        // Channel 0 reads fine; channel 1 fails when reached.
        let outcome = loop {
            match stream.read(&mut buf) {
                Ok(Some(_)) => continue,
                other => break other,
            }
        };
        assert!(matches!(outcome, Err(FetchError::DataSource { .. })));
    }

    #[test]
    fn test_cancelled_stack_reports_cancellation() {
        let store = MemoryStore {
            plane_delay: Some(std::time::Duration::from_millis(30)),
            ..MemoryStore::new()
        };
        let fetcher = PlaneFetcher::new(Arc::new(store), 1);
        let mut stream = fetcher.fetch_stack(0).unwrap();
        // The single worker is still sleeping inside the first plane, so
        // cancellation lands while every filler is unresolved.
        stream.cancel();
        let mut buf = [0u8; 8];
        assert!(matches!(
            stream.read(&mut buf),
            Err(FetchError::Cancelled)
        ));
    }
}
