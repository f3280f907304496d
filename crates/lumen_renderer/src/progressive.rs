//! Progressive accumulation across render passes.
//!
//! Each pass traces one path per pixel and adds it to a persistent per-pixel
//! sum. The image is split into bands of whole rows that are rendered in
//! parallel with rayon; a band owns a disjoint slice of the accumulation
//! buffer, so a pass shares no mutable state between workers.

use std::time::Instant;

use image::RgbaImage;
use lumen_core::{Color, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::prepare::PreparedScene;
use crate::renderer::{color_to_rgba, trace_path, RenderConfig};

/// Row-major RGBA8 frame, top row first. Alpha is always 255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// An opaque black frame.
    pub fn black(width: u32, height: u32) -> Self {
        let data = [0, 0, 0, 255].repeat((width * height) as usize);
        Self { width, height, data }
    }

    /// Get the RGBA value at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Convert to an `image` buffer for saving.
    pub fn to_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }
}

/// Persistent accumulation buffer plus the settings used to fill it.
pub struct ProgressiveRenderer {
    config: RenderConfig,
    width: u32,
    height: u32,
    accumulation: Vec<Color>,
}

impl ProgressiveRenderer {
    /// Create a renderer with an empty (0 x 0) viewport.
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            width: 0,
            height: 0,
            accumulation: Vec::new(),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Running radiance sums, row-major.
    pub fn accumulation(&self) -> &[Color] {
        &self.accumulation
    }

    /// Allocate a zeroed accumulation buffer, discarding any prior samples.
    pub fn configure_viewport(&mut self, width: u32, height: u32) {
        log::debug!("Configuring viewport {}x{}", width, height);
        self.width = width;
        self.height = height;
        self.accumulation = vec![Color::ZERO; (width * height) as usize];
    }

    /// Trace sample number `sample_index` (1-based) for every pixel and
    /// return the running mean.
    ///
    /// Sample 1 starts a new progression. Scenes without a usable camera or
    /// light produce an opaque black frame and leave the sums untouched.
    pub fn render_sample(&mut self, sample_index: u32, scene: &Scene) -> PixelBuffer {
        let sample = if sample_index == 0 {
            log::warn!("Sample index 0 is not valid, treating it as 1");
            1
        } else {
            sample_index
        };

        if self.accumulation.is_empty() {
            return PixelBuffer::black(self.width, self.height);
        }
        let Some(prepared) = PreparedScene::new(scene, self.width, self.height) else {
            return PixelBuffer::black(self.width, self.height);
        };

        if sample == 1 {
            self.accumulation.fill(Color::ZERO);
        }

        let start = Instant::now();
        self.accumulate(sample, &prepared);

        let frame = self.resolve(sample, prepared.camera.exposure());
        log::debug!("Sample {} rendered in {:?}", sample, start.elapsed());
        frame
    }

    fn accumulate(&mut self, sample: u32, prepared: &PreparedScene) {
        let width = self.width as usize;
        let rows_per_band = self.config.rows_per_band.max(1) as usize;
        let config = &self.config;
        let correction = prepared.camera.sampling_correction();

        self.accumulation
            .par_chunks_mut(width * rows_per_band)
            .enumerate()
            .for_each(|(band, rows)| {
                for (row, slots) in rows.chunks_mut(width).enumerate() {
                    let y = band * rows_per_band + row;
                    let mut rng = StdRng::seed_from_u64(row_seed(config.seed, sample, y as u64));

                    for (x, slot) in slots.iter_mut().enumerate() {
                        let ray = prepared.camera.get_ray(x as u32, y as u32, &mut rng);
                        let estimate = trace_path(&ray, &prepared.world, &prepared.light, config, &mut rng)
                            * correction;

                        // One bad sample would poison the pixel for the rest of the progression
                        if estimate.is_finite() {
                            *slot += estimate;
                        }
                    }
                }
            });
    }

    fn resolve(&self, sample: u32, exposure: f32) -> PixelBuffer {
        let inv_samples = 1.0 / sample as f32;
        let mut data = vec![0u8; self.accumulation.len() * 4];

        data.par_chunks_mut(4)
            .zip(self.accumulation.par_iter())
            .for_each(|(pixel, sum)| {
                pixel.copy_from_slice(&color_to_rgba(*sum * inv_samples, exposure));
            });

        PixelBuffer {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

/// Independent stream per (seed, sample, row), so a pass depends neither on
/// how rayon schedules bands nor on the band height.
fn row_seed(seed: u64, sample: u32, row: u64) -> u64 {
    // SplitMix64 finalizer
    let mut z = seed
        .wrapping_add(u64::from(sample).wrapping_mul(0x9e37_79b9_7f4a_7c15))
        .wrapping_add(row.wrapping_mul(0xd1b5_4a32_d192_ed03));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
