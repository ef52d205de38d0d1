// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper mathematics.


use std::sync::Arc;

use ndarray::prelude::*;
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

#[allow(non_camel_case_types)]
pub(crate) type c64 = Complex<f64>;

/// Forward and inverse 2D FFTs of a fixed size. The transforms are done
/// row-column: 1D FFTs over every row, then over every column.
///
/// The plans are shareable between threads, so one of these can be used to
/// transform many planes in parallel.
pub(crate) struct Fft2d {
    nx: usize,
    ny: usize,
    forward_x: Arc<dyn Fft<f64>>,
    forward_y: Arc<dyn Fft<f64>>,
    inverse_x: Arc<dyn Fft<f64>>,
    inverse_y: Arc<dyn Fft<f64>>,
}

impl Fft2d {
    /// Plan FFTs for planes with `ny` rows and `nx` columns.
    pub(crate) fn new(nx: usize, ny: usize) -> Fft2d {
        let mut planner = FftPlanner::new();
        Fft2d {
            nx,
            ny,
            forward_x: planner.plan_fft_forward(nx),
            forward_y: planner.plan_fft_forward(ny),
            inverse_x: planner.plan_fft_inverse(nx),
            inverse_y: planner.plan_fft_inverse(ny),
        }
    }

    /// The forward transform of a real plane (indexed `[y, x]`).
    pub(crate) fn forward(&self, plane: ArrayView2<f64>) -> Array2<c64> {
        let mut data = plane.mapv(|v| c64::new(v, 0.0));
        self.process(&mut data, &self.forward_x, &self.forward_y);
        data
    }

    /// The inverse transform, normalised such that `inverse(forward(x)) ==
    /// x`. Only the real part is returned.
    pub(crate) fn inverse_real(&self, mut data: Array2<c64>) -> Array2<f64> {
        self.process(&mut data, &self.inverse_x, &self.inverse_y);
        let norm = (self.nx * self.ny) as f64;
        data.mapv(|c| c.re / norm)
    }

    fn process(&self, data: &mut Array2<c64>, fft_x: &Arc<dyn Fft<f64>>, fft_y: &Arc<dyn Fft<f64>>) {
        debug_assert_eq!(data.dim(), (self.ny, self.nx));
        let mut scratch = vec![
            c64::default();
            fft_x
                .get_inplace_scratch_len()
                .max(fft_y.get_inplace_scratch_len())
        ];

        // Rows are contiguous in a standard-layout array.
        for mut row in data.rows_mut() {
            match row.as_slice_mut() {
                Some(row) => fft_x.process_with_scratch(row, &mut scratch),
                None => {
                    let mut buf = row.to_vec();
                    fft_x.process_with_scratch(&mut buf, &mut scratch);
                    row.assign(&ArrayView1::from(&buf));
                }
            }
        }

        // Columns aren't; copy each one out and back.
        let mut buf = vec![c64::default(); self.ny];
        for mut col in data.columns_mut() {
            for (b, c) in buf.iter_mut().zip(col.iter()) {
                *b = *c;
            }
            fft_y.process_with_scratch(&mut buf, &mut scratch);
            col.assign(&ArrayView1::from(&buf));
        }
    }
}

/// The sample frequencies of an `n`-point FFT [cycles per sample], in the
/// order that the FFT outputs them (zero, then positive, then negative
/// frequencies).
pub(crate) fn fft_freqs(n: usize) -> Vec<f64> {
    let n_f = n as f64;
    (0..n)
        .map(|k| {
            if k < (n + 1) / 2 {
                k as f64 / n_f
            } else {
                (k as f64 - n_f) / n_f
            }
        })
        .collect()
}
