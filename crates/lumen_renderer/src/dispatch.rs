//! Frame dispatch strategies.
//!
//! A frame is one call of a shading function per pixel. `Sequential` runs
//! it on the calling thread; `Parallel` fans it out over rayon's pool using
//! disjoint partitions of the pixel grid. Both return only after every
//! pixel has been written, so the caller may read the buffer right away.

use lumen_math::Color;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::AccumulationBuffer;

/// Per-pixel shading function: (x, y) -> radiance sample.
pub type ShadeFn<'a> = dyn Fn(u32, u32) -> Color + Sync + 'a;

/// How the parallel dispatcher splits the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// One task per image row
    #[default]
    Rows,
    /// Square tiles, rendered centre-out
    Tiles { size: u32 },
}

/// A way of scheduling one frame's per-pixel work.
pub trait FrameDispatch: Send + Sync {
    /// Human readable name, for logs.
    fn name(&self) -> &'static str;

    /// Add one `shade(x, y)` sample into every cell of `target`.
    fn accumulate(&self, target: &mut AccumulationBuffer, shade: &ShadeFn<'_>);

    /// Map every accumulated sum to a display pixel.
    fn resolve(
        &self,
        sums: &[Color],
        pixels: &mut [[u8; 4]],
        map: &(dyn Fn(Color) -> [u8; 4] + Sync),
    );
}

/// Single loop over all pixels on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl FrameDispatch for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn accumulate(&self, target: &mut AccumulationBuffer, shade: &ShadeFn<'_>) {
        for y in 0..target.height() {
            for x in 0..target.width() {
                target.add(x, y, shade(x, y));
            }
        }
    }

    fn resolve(
        &self,
        sums: &[Color],
        pixels: &mut [[u8; 4]],
        map: &(dyn Fn(Color) -> [u8; 4] + Sync),
    ) {
        for (pixel, sum) in pixels.iter_mut().zip(sums) {
            *pixel = map(*sum);
        }
    }
}

/// Rayon fan-out over disjoint partitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parallel {
    pub partition: Partition,
}

impl FrameDispatch for Parallel {
    fn name(&self) -> &'static str {
        match self.partition {
            Partition::Rows => "parallel rows",
            Partition::Tiles { .. } => "parallel tiles",
        }
    }

    fn accumulate(&self, target: &mut AccumulationBuffer, shade: &ShadeFn<'_>) {
        let width = target.width() as usize;
        if width == 0 || target.is_empty() {
            return;
        }

        match self.partition {
            Partition::Rows => {
                // Each row slice is owned by exactly one task
                target
                    .as_mut_slice()
                    .par_chunks_mut(width)
                    .enumerate()
                    .for_each(|(y, row)| {
                        for (x, cell) in row.iter_mut().enumerate() {
                            *cell += shade(x as u32, y as u32);
                        }
                    });
            }
            Partition::Tiles { size } => {
                let buckets = generate_buckets(target.width(), target.height(), size);
                let results: Vec<BucketResult> = buckets
                    .par_iter()
                    .map(|bucket| BucketResult::new(*bucket, render_bucket(bucket, shade)))
                    .collect();

                for result in &results {
                    result.accumulate_into(target);
                }
            }
        }
    }

    fn resolve(
        &self,
        sums: &[Color],
        pixels: &mut [[u8; 4]],
        map: &(dyn Fn(Color) -> [u8; 4] + Sync),
    ) {
        pixels
            .par_iter_mut()
            .zip(sums.par_iter())
            .for_each(|(pixel, sum)| *pixel = map(*sum));
    }
}

/// Pick the strategy for a frame.
pub fn dispatch_for(multi_threaded: bool, partition: Partition) -> Box<dyn FrameDispatch> {
    if multi_threaded {
        Box::new(Parallel { partition })
    } else {
        Box::new(Sequential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(x: u32, y: u32) -> Color {
        Color::new(x as f32 * 0.1, y as f32 * 0.01, (x * y) as f32)
    }

    fn run(dispatch: &dyn FrameDispatch, width: u32, height: u32) -> AccumulationBuffer {
        let mut target = AccumulationBuffer::new(width, height);
        dispatch.accumulate(&mut target, &gradient);
        target
    }

    #[test]
    fn test_strategies_agree() {
        let reference = run(&Sequential, 37, 23);
        let rows = run(&Parallel { partition: Partition::Rows }, 37, 23);
        let tiles = run(&Parallel { partition: Partition::Tiles { size: 8 } }, 37, 23);

        assert_eq!(reference.as_slice(), rows.as_slice());
        assert_eq!(reference.as_slice(), tiles.as_slice());
        assert_eq!(reference.get(5, 7), gradient(5, 7));
    }

    #[test]
    fn test_each_cell_written_once() {
        let mut target = AccumulationBuffer::new(16, 9);
        Parallel { partition: Partition::Tiles { size: 4 } }
            .accumulate(&mut target, &|_, _| Color::ONE);
        assert!(target.as_slice().iter().all(|c| *c == Color::ONE));
    }

    #[test]
    fn test_zero_area_is_noop() {
        for dispatch in [dispatch_for(false, Partition::Rows), dispatch_for(true, Partition::Rows)] {
            let target = run(dispatch.as_ref(), 0, 0);
            assert!(target.is_empty());
        }
    }

    #[test]
    fn test_resolve_maps_every_pixel() {
        let sums = vec![Color::ONE; 10];
        let mut a = vec![[0u8; 4]; 10];
        let mut b = vec![[0u8; 4]; 10];
        Sequential.resolve(&sums, &mut a, &|_| [1, 2, 3, 4]);
        Parallel::default().resolve(&sums, &mut b, &|_| [1, 2, 3, 4]);
        assert_eq!(a, b);
        assert!(a.iter().all(|p| *p == [1, 2, 3, 4]));
    }

    #[test]
    fn test_dispatch_for_selects() {
        assert_eq!(dispatch_for(false, Partition::Rows).name(), "sequential");
        assert_eq!(dispatch_for(true, Partition::Rows).name(), "parallel rows");
        assert_eq!(
            dispatch_for(true, Partition::Tiles { size: 16 }).name(),
            "parallel tiles"
        );
    }
}
