// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Surface construction configuration.

use serde::{Deserialize, Serialize};

/// Settings applied when building a bitmap surface from decoded image data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Byte alignment of each scanline in the backing allocation. Rows shorter
    /// than the alignment are padded with zero bytes. The default of 4 matches
    /// the DWORD row alignment used by common raster backends.
    pub row_alignment: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self { row_alignment: 4 }
    }
}

impl SurfaceConfig {
    /// The alignment actually applied; zero is treated as unaligned (1).
    pub fn effective_alignment(&self) -> usize {
        self.row_alignment.max(1) as usize
    }

    /// Stride in bytes for a row of `min_bytes`, padded up to the alignment.
    pub fn aligned_stride(&self, min_bytes: usize) -> usize {
        let align = self.effective_alignment();
        min_bytes.div_ceil(align) * align
    }
}
