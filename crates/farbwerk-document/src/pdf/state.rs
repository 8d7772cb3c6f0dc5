// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Graphics state — the drawing parameters a content-stream writer tracks.

/// A device colour in one of the PDF base colour spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// DeviceGray, 0.0 (black) to 1.0 (white).
    Gray(f64),
    /// DeviceRGB.
    Rgb(f64, f64, f64),
    /// DeviceCMYK.
    Cmyk(f64, f64, f64, f64),
}

/// Line cap style (`J` operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    ProjectingSquare,
}

impl LineCap {
    /// Integer operand value of the `J` operator.
    pub fn operand(&self) -> i64 {
        match self {
            Self::Butt => 0,
            Self::Round => 1,
            Self::ProjectingSquare => 2,
        }
    }
}

/// Line join style (`j` operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    /// Integer operand value of the `j` operator.
    pub fn operand(&self) -> i64 {
        match self {
            Self::Miter => 0,
            Self::Round => 1,
            Self::Bevel => 2,
        }
    }
}

/// The set of drawing parameters tracked while a content stream is written:
/// current transformation matrix, colours, line style, and text parameters.
///
/// A canvas holds exactly one current state at a time. Values are updated as
/// operators are emitted; `Default` is the PDF-defined initial state at the
/// start of a content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    /// Current transformation matrix `[a b c d e f]`.
    pub ctm: [f64; 6],
    pub stroke_color: Color,
    pub fill_color: Color,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    /// Dash array and phase (`d` operator); empty array means solid.
    pub dash_pattern: (Vec<f64>, f64),
    pub char_spacing: f64,
    pub word_spacing: f64,
    /// Horizontal scaling in percent (`Tz`), 100 = unscaled.
    pub horizontal_scaling: f64,
    pub leading: f64,
    pub text_rise: f64,
    pub font_size: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: IDENTITY,
            stroke_color: Color::Gray(0.0),
            fill_color: Color::Gray(0.0),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            dash_pattern: (Vec::new(), 0.0),
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 100.0,
            leading: 0.0,
            text_rise: 0.0,
            font_size: 0.0,
        }
    }
}

/// The identity matrix.
pub const IDENTITY: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Concatenate two transformation matrices: the result maps coordinates
/// through `m` first, then through `ctm` — the semantics of the `cm` operator.
pub fn concat(m: &[f64; 6], ctm: &[f64; 6]) -> [f64; 6] {
    [
        m[0] * ctm[0] + m[1] * ctm[2],
        m[0] * ctm[1] + m[1] * ctm[3],
        m[2] * ctm[0] + m[3] * ctm[2],
        m[2] * ctm[1] + m[3] * ctm[3],
        m[4] * ctm[0] + m[5] * ctm[2] + ctm[4],
        m[4] * ctm[1] + m[5] * ctm[3] + ctm[5],
    ]
}
