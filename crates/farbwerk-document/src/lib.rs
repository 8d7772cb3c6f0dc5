// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// farbwerk-document — Low-level interop for the Farbwerk pipeline.
//
// Provides raw pixel-buffer extraction from in-memory bitmap surfaces
// (stride/padding preserved verbatim) and a PDF content-stream canvas whose
// tracked graphics state can be spliced directly, bypassing the normal
// save/restore stack.

pub mod image;
pub mod pdf;

// Re-export the primary types so callers can use `farbwerk_document::BitmapSurface` etc.
pub use image::extract::{PixelBuffer, extract};
pub use image::surface::{BitmapSurface, LockedBits, LockedBitsMut};
pub use pdf::canvas::ContentCanvas;
pub use pdf::state::{Color, GraphicsState, LineCap, LineJoin};
