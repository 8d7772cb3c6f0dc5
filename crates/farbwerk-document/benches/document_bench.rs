// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the farbwerk-document crate: pixel-buffer
// extraction under the surface lock, and content-stream emission.

use std::rc::Rc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use farbwerk_core::types::PixelFormat;
use farbwerk_document::{BitmapSurface, ContentCanvas, GraphicsState, extract};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark extraction of a 1024x768 RGB24 surface with padded rows.
///
/// 1024 pixels of RGB8 are 3072 bytes per row; the stride is padded to 3076
/// so the copy includes padding, matching what a real platform surface
/// reports. The measured work is lock, bulk copy, unlock.
fn bench_extract(c: &mut Criterion) {
    let (width, height) = (1024u32, 768u32);
    let stride = 3076i32;
    let data = vec![0x5Au8; stride as usize * height as usize];
    let surface = BitmapSurface::from_raw(width, height, stride, PixelFormat::Rgb8, data)
        .expect("valid surface layout");

    c.bench_function("extract (1024x768 RGB24, padded stride)", |b| {
        b.iter(|| {
            let buffer = extract(black_box(&surface)).expect("extraction succeeds");
            black_box(buffer.into_bytes());
        });
    });
}

/// Benchmark emitting and encoding a content stream of 200 filled rectangles,
/// with a graphics-state splice between save/restore pairs.
fn bench_canvas_emission(c: &mut Criterion) {
    c.bench_function("content stream (200 rects + state splice)", |b| {
        b.iter(|| {
            let mut canvas = ContentCanvas::new();
            let spliced = Rc::new(GraphicsState::default());
            for i in 0..200 {
                canvas.save_state();
                canvas.set_fill_rgb(0.1, 0.5, 0.9);
                canvas.rectangle(f64::from(i), 0.0, 10.0, 10.0);
                canvas.fill();
                canvas.restore_state().expect("stack is balanced");
                canvas.set_graphics_state(Rc::clone(&spliced));
            }
            black_box(canvas.finish().expect("encoding succeeds"));
        });
    });
}

criterion_group!(benches, bench_extract, bench_canvas_emission);
criterion_main!(benches);
