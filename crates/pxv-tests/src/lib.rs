//! Integration tests for the pixelview crates.
//!
//! This crate contains end-to-end tests that verify the interaction
//! between retrieval, decoding, and quantization.

#[cfg(test)]
mod tests {
    use pxv_codec::{PixelDecoder, Plane2D};
    use pxv_core::{PixelKind, PixelsDims, PixelsSpec};
    use pxv_fetch::{FetchOutcome, FetchResult, ObjectTransfer, PixelSource, PlaneFetcher};
    use pxv_quantum::{QuantumDef, build_strategy};
    use std::sync::Arc;
    use std::thread;

    /// In-memory pixel store serving 16-bit gradient planes: pixel (x, y)
    /// of plane (z, c, t) holds `base + width * y + x` where
    /// `base = 1000 * c + 100 * z + 10 * t`.
    struct GradientStore {
        spec: PixelsSpec,
    }

    impl GradientStore {
        fn new() -> Self {
            Self {
                spec: PixelsSpec::new(PixelsDims::new(8, 4, 3, 2, 2), PixelKind::UInt16),
            }
        }

        fn base(z: u32, c: u32, t: u32) -> u16 {
            (1000 * c + 100 * z + 10 * t) as u16
        }
    }

    impl PixelSource for GradientStore {
        fn spec(&self) -> PixelsSpec {
            self.spec
        }

        fn plane_bytes(&self, z: u32, c: u32, t: u32) -> FetchResult<Vec<u8>> {
            let dims = self.spec.dims();
            let base = Self::base(z, c, t);
            let mut bytes = Vec::with_capacity(self.spec.plane_size());
            for y in 0..dims.size_y {
                for x in 0..dims.size_x {
                    let value = base + (dims.size_x * y + x) as u16;
                    bytes.extend_from_slice(&value.to_be_bytes());
                }
            }
            Ok(bytes)
        }
    }

    /// Full path: synthesize bytes, decode to a matrix, quantize into the
    /// display codomain.
    #[test]
    fn test_decode_quantize_pipeline() {
        let decoder = PixelDecoder::new(PixelKind::UInt16).unwrap();
        let width = 16u32;
        let height = 16u32;
        let mut bytes = vec![0u8; (width * height) as usize * 2];
        for i in 0..(width * height) as usize {
            decoder.encode((i * 16) as f64, &mut bytes, i * 2).unwrap();
        }

        let plane = Plane2D::new(width, height, bytes, &decoder).unwrap();
        let (min, max) = plane.min_max().unwrap();
        assert_eq!((min, max), (0.0, 4080.0));

        let strategy =
            build_strategy(&QuantumDef::linear(PixelKind::UInt16), min, max).unwrap();
        let first = strategy.quantize(plane.pixel_value(0, 0)).unwrap();
        let last = strategy
            .quantize(plane.pixel_value(width - 1, height - 1))
            .unwrap();
        assert_eq!(first, 0);
        assert_eq!(last, 255);

        // Row-major raster order is monotonic in the gradient, so the
        // quantized output must be monotonic too.
        let mut prev = 0u8;
        for y in 0..height {
            for x in 0..width {
                let q = strategy.quantize(plane.pixel_value(x, y)).unwrap();
                assert!(q >= prev);
                prev = q;
            }
        }
    }

    /// Fetch a plane from the store, decode it, and verify the decoded
    /// values against the generator formula.
    #[test]
    fn test_fetch_decode_pipeline() {
        let store = Arc::new(GradientStore::new());
        let fetcher = PlaneFetcher::new(Arc::clone(&store), 2);
        let spec = fetcher.spec();

        let handle = fetcher.fetch_plane(2, 1, 1).unwrap();
        let bytes = match handle.wait().unwrap() {
            FetchOutcome::Ready(bytes) => bytes,
            FetchOutcome::Cancelled => panic!("fetch was not cancelled"),
        };

        let decoder = PixelDecoder::new(spec.kind()).unwrap();
        let dims = spec.dims();
        let plane = Plane2D::new(dims.size_x, dims.size_y, bytes, &decoder).unwrap();

        let base = GradientStore::base(2, 1, 1) as f64;
        assert_eq!(plane.pixel_value(0, 0), base);
        assert_eq!(plane.pixel_value(3, 2), base + (dims.size_x * 2 + 3) as f64);
    }

    /// A fetch worker hands the decoded plane to a render thread through
    /// the rendezvous channel; the render thread quantizes it.
    #[test]
    fn test_rendezvous_pairs_fetch_and_render() {
        let store = Arc::new(GradientStore::new());
        let channel: Arc<ObjectTransfer<Plane2D>> = Arc::new(ObjectTransfer::new());

        let producer = {
            let store = Arc::clone(&store);
            let channel = Arc::clone(&channel);
            thread::spawn(move || {
                let spec = store.spec();
                let decoder = PixelDecoder::new(spec.kind()).unwrap();
                let bytes = store.plane_bytes(0, 0, 0).unwrap();
                let plane =
                    Plane2D::new(spec.dims().size_x, spec.dims().size_y, bytes, &decoder)
                        .unwrap();
                channel.hand_off(plane).unwrap();
            })
        };

        let plane = channel.collect().unwrap();
        let (min, max) = plane.min_max().unwrap();
        let strategy =
            build_strategy(&QuantumDef::linear(PixelKind::UInt16), min, max).unwrap();
        assert_eq!(strategy.quantize(plane.pixel_value(0, 0)).unwrap(), 0);
        let (last_x, last_y) = (plane.width() - 1, plane.height() - 1);
        assert_eq!(
            strategy.quantize(plane.pixel_value(last_x, last_y)).unwrap(),
            255
        );
        producer.join().unwrap();
    }

    /// The composed stack stream carries every channel's z-stack, in
    /// channel order, byte-identical with direct plane reads.
    #[test]
    fn test_stack_stream_matches_direct_reads() {
        let store = Arc::new(GradientStore::new());
        let fetcher = PlaneFetcher::new(Arc::clone(&store), 3);
        let spec = fetcher.spec();
        let dims = *spec.dims();

        let mut stream = fetcher.fetch_stack(0).unwrap();
        assert_eq!(stream.len(), spec.stack_size() * dims.size_c as usize);

        let mut streamed = Vec::new();
        let mut buf = [0u8; 13];
        while let Some(n) = stream.read(&mut buf).unwrap() {
            streamed.extend_from_slice(&buf[..n]);
        }

        let mut direct = Vec::new();
        for c in 0..dims.size_c {
            for z in 0..dims.size_z {
                direct.extend_from_slice(&store.plane_bytes(z, c, 0).unwrap());
            }
        }
        assert_eq!(streamed, direct);
    }

    /// Moving the contrast window changes the rendered bytes without
    /// touching the decoded plane.
    #[test]
    fn test_window_restretch_changes_rendering() {
        let decoder = PixelDecoder::new(PixelKind::UInt8).unwrap();
        let plane = Plane2D::new(4, 1, vec![0, 64, 128, 255], &decoder).unwrap();
        let mut strategy =
            build_strategy(&QuantumDef::linear(PixelKind::UInt8), 0.0, 255.0).unwrap();

        let before: Vec<u8> = plane
            .values()
            .iter()
            .map(|&v| strategy.quantize(v).unwrap())
            .collect();
        assert_eq!(before, vec![0, 64, 128, 255]);

        strategy.set_window(64.0, 128.0).unwrap();
        let after: Vec<u8> = plane
            .values()
            .iter()
            .map(|&v| strategy.quantize(v).unwrap())
            .collect();
        assert_eq!(after[0], 0);
        assert_eq!(after[1], 0);
        assert_eq!(after[2], 255);
        assert_eq!(after[3], 255);
    }

    /// Histogram buckets feed the display layer's contrast dialog; they
    /// must agree with the quantization domain.
    #[test]
    fn test_histogram_over_fetched_plane() {
        let store = Arc::new(GradientStore::new());
        let spec = store.spec();
        let decoder = PixelDecoder::new(spec.kind()).unwrap();
        let bytes = store.plane_bytes(0, 0, 0).unwrap();
        let plane =
            Plane2D::new(spec.dims().size_x, spec.dims().size_y, bytes, &decoder).unwrap();

        let (min, max) = plane.min_max().unwrap();
        let counts = plane.histogram(8, min, max);
        assert_eq!(counts.len(), 8);
        assert_eq!(
            counts.iter().sum::<u32>(),
            spec.dims().plane_pixels() as u32
        );
        // The gradient is uniform, so no bucket is empty.
        assert!(counts.iter().all(|&c| c > 0));
    }
}
