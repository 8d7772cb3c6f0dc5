// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — content-stream canvas with a spliceable graphics state.

pub mod canvas;
pub mod state;

pub use canvas::ContentCanvas;
pub use state::GraphicsState;
