// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — lockable bitmap surfaces and raw pixel-buffer extraction.

pub mod extract;
pub mod surface;

pub use extract::{PixelBuffer, extract};
pub use surface::BitmapSurface;
