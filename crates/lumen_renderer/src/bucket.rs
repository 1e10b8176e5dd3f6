//! Bucket-based tile partitioning for the parallel dispatcher.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use lumen_math::Color;

use crate::AccumulationBuffer;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets covering the image, sorted in spiral order from center.
///
/// Buckets never overlap, so each one owns a disjoint set of pixels.
/// A zero bucket size is treated as 1.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    // Generate grid of buckets
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center, so the middle of the
/// frame finishes first.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| {
        distance(a)
            .partial_cmp(&distance(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Render a single bucket to a vector of colors.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket<F>(bucket: &Bucket, shade: F) -> Vec<Color>
where
    F: Fn(u32, u32) -> Color,
{
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            pixels.push(shade(bucket.x + local_x, bucket.y + local_y));
        }
    }

    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Add this bucket's samples into the accumulation buffer.
    pub fn accumulate_into(&self, target: &mut AccumulationBuffer) {
        let mut samples = self.pixels.iter();
        for local_y in 0..self.bucket.height {
            for local_x in 0..self.bucket.width {
                if let Some(sample) = samples.next() {
                    target.add(self.bucket.x + local_x, self.bucket.y + local_y, *sample);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 37, 16);
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 37);
    }

    #[test]
    fn test_buckets_are_disjoint() {
        let buckets = generate_buckets(50, 30, 8);
        let mut seen = HashSet::new();
        for bucket in &buckets {
            for y in bucket.y..bucket.y + bucket.height {
                for x in bucket.x..bucket.x + bucket.width {
                    assert!(seen.insert((x, y)), "pixel ({x}, {y}) covered twice");
                }
            }
        }
        assert_eq!(seen.len(), 50 * 30);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!((first.x, first.y), (64, 64));
        assert_eq!(first.index, 0);
    }

    #[test]
    fn test_zero_sized_image_and_bucket() {
        assert!(generate_buckets(0, 10, 8).is_empty());
        assert_eq!(generate_buckets(3, 2, 0).len(), 6);
    }

    #[test]
    fn test_render_and_accumulate_bucket() {
        let bucket = Bucket::new(2, 1, 2, 2, 0);
        let pixels = render_bucket(&bucket, |x, y| Color::new(x as f32, y as f32, 0.0));
        assert_eq!(pixels.len(), 4);
        assert_eq!(pixels[1], Color::new(3.0, 1.0, 0.0));

        let mut target = AccumulationBuffer::new(4, 3);
        BucketResult::new(bucket, pixels).accumulate_into(&mut target);
        assert_eq!(target.get(3, 2), Color::new(3.0, 2.0, 0.0));
        assert_eq!(target.get(0, 0), Color::ZERO);
    }
}
