// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-stream canvas — an in-memory PDF content-stream writer built on
// `lopdf::content`, tracking the current graphics state and exposing a
// mutator that splices a caller-supplied state in directly.

use std::rc::Rc;

use lopdf::Object;
use lopdf::content::{Content, Operation};
use tracing::{debug, instrument};

use farbwerk_core::error::{FarbwerkError, Result};

use super::state::{self, Color, GraphicsState, LineCap, LineJoin};

/// An in-memory writer for a PDF page content stream.
///
/// Drawing methods append operators and keep the tracked [`GraphicsState`] in
/// step; `save_state`/`restore_state` implement the `q`/`Q` stack protocol.
///
/// The one deliberate hole in that protocol is
/// [`ContentCanvas::set_graphics_state`], which replaces the tracked state
/// outright — typically with a state saved from a separate rendering context —
/// without emitting anything or touching the stack. Callers using it take over
/// responsibility for the stack invariant themselves.
pub struct ContentCanvas {
    operations: Vec<Operation>,
    /// States saved by `q`, restored by `Q`.
    state_stack: Vec<Rc<GraphicsState>>,
    /// The single current state. Shared mutation is copy-on-write, so a
    /// reference installed via `set_graphics_state` stays identity-stable
    /// until the next state-changing operator.
    current: Rc<GraphicsState>,
}

impl ContentCanvas {
    /// Create an empty canvas with the PDF initial graphics state.
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
            state_stack: Vec::new(),
            current: Rc::new(GraphicsState::default()),
        }
    }

    // -- State stack ----------------------------------------------------------

    /// Emit `q`: push the current state onto the save stack.
    pub fn save_state(&mut self) {
        self.state_stack.push(Rc::clone(&self.current));
        self.push_op("q", vec![]);
    }

    /// Emit `Q`: pop the save stack and reinstate the saved state.
    ///
    /// Fails with [`FarbwerkError::PdfError`] if nothing was saved — the only
    /// writer misuse that is detectable at call time.
    pub fn restore_state(&mut self) -> Result<()> {
        let saved = self.state_stack.pop().ok_or_else(|| {
            FarbwerkError::PdfError("restore_state without a matching save_state".into())
        })?;
        self.current = saved;
        self.push_op("Q", vec![]);
        Ok(())
    }

    // -- Graphics state override ----------------------------------------------

    /// Replace the tracked current graphics state with `gs`.
    ///
    /// This bypasses the `q`/`Q` discipline entirely: no operator is emitted,
    /// the save stack is untouched, and the previous current state is simply
    /// discarded without being restored. No validation is performed — `gs` is
    /// not checked against the stream position, resource dictionary, or
    /// nesting depth, so installing an incompatible state yields a content
    /// stream that only fails downstream, when a consumer renders it.
    ///
    /// A subsequent [`ContentCanvas::graphics_state`] call returns this exact
    /// reference (same allocation), not a copy.
    pub fn set_graphics_state(&mut self, gs: Rc<GraphicsState>) {
        debug!("splicing caller-supplied graphics state into canvas");
        self.current = gs;
    }

    /// The currently tracked graphics state.
    pub fn graphics_state(&self) -> &Rc<GraphicsState> {
        &self.current
    }

    // -- Coordinate system ----------------------------------------------------

    /// Emit `cm`: concatenate `m` onto the current transformation matrix.
    pub fn concat_matrix(&mut self, m: [f64; 6]) {
        self.mutate(|gs| gs.ctm = state::concat(&m, &gs.ctm));
        self.push_op("cm", m.iter().map(|&v| real(v)).collect());
    }

    // -- Line style -----------------------------------------------------------

    /// Emit `w`: set the line width.
    pub fn set_line_width(&mut self, width: f64) {
        self.mutate(|gs| gs.line_width = width);
        self.push_op("w", vec![real(width)]);
    }

    /// Emit `J`: set the line cap style.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.mutate(|gs| gs.line_cap = cap);
        self.push_op("J", vec![Object::Integer(cap.operand())]);
    }

    /// Emit `j`: set the line join style.
    pub fn set_line_join(&mut self, join: LineJoin) {
        self.mutate(|gs| gs.line_join = join);
        self.push_op("j", vec![Object::Integer(join.operand())]);
    }

    /// Emit `M`: set the miter limit.
    pub fn set_miter_limit(&mut self, limit: f64) {
        self.mutate(|gs| gs.miter_limit = limit);
        self.push_op("M", vec![real(limit)]);
    }

    /// Emit `d`: set the dash array and phase. An empty array means solid.
    pub fn set_dash_pattern(&mut self, array: Vec<f64>, phase: f64) {
        self.mutate(|gs| gs.dash_pattern = (array.clone(), phase));
        let dashes = Object::Array(array.iter().map(|&v| real(v)).collect());
        self.push_op("d", vec![dashes, real(phase)]);
    }

    // -- Colour ---------------------------------------------------------------

    /// Emit `G`: set the stroking colour in DeviceGray.
    pub fn set_stroke_gray(&mut self, gray: f64) {
        self.mutate(|gs| gs.stroke_color = Color::Gray(gray));
        self.push_op("G", vec![real(gray)]);
    }

    /// Emit `g`: set the non-stroking colour in DeviceGray.
    pub fn set_fill_gray(&mut self, gray: f64) {
        self.mutate(|gs| gs.fill_color = Color::Gray(gray));
        self.push_op("g", vec![real(gray)]);
    }

    /// Emit `RG`: set the stroking colour in DeviceRGB.
    pub fn set_stroke_rgb(&mut self, r: f64, g: f64, b: f64) {
        self.mutate(|gs| gs.stroke_color = Color::Rgb(r, g, b));
        self.push_op("RG", vec![real(r), real(g), real(b)]);
    }

    /// Emit `rg`: set the non-stroking colour in DeviceRGB.
    pub fn set_fill_rgb(&mut self, r: f64, g: f64, b: f64) {
        self.mutate(|gs| gs.fill_color = Color::Rgb(r, g, b));
        self.push_op("rg", vec![real(r), real(g), real(b)]);
    }

    /// Emit `K`: set the stroking colour in DeviceCMYK.
    pub fn set_stroke_cmyk(&mut self, c: f64, m: f64, y: f64, k: f64) {
        self.mutate(|gs| gs.stroke_color = Color::Cmyk(c, m, y, k));
        self.push_op("K", vec![real(c), real(m), real(y), real(k)]);
    }

    /// Emit `k`: set the non-stroking colour in DeviceCMYK.
    pub fn set_fill_cmyk(&mut self, c: f64, m: f64, y: f64, k: f64) {
        self.mutate(|gs| gs.fill_color = Color::Cmyk(c, m, y, k));
        self.push_op("k", vec![real(c), real(m), real(y), real(k)]);
    }

    // -- Path construction and painting ---------------------------------------

    /// Emit `m`: begin a new subpath at `(x, y)`.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.push_op("m", vec![real(x), real(y)]);
    }

    /// Emit `l`: append a straight segment to `(x, y)`.
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.push_op("l", vec![real(x), real(y)]);
    }

    /// Emit `re`: append a rectangle subpath.
    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push_op("re", vec![real(x), real(y), real(width), real(height)]);
    }

    /// Emit `h`: close the current subpath.
    pub fn close_path(&mut self) {
        self.push_op("h", vec![]);
    }

    /// Emit `S`: stroke the current path.
    pub fn stroke(&mut self) {
        self.push_op("S", vec![]);
    }

    /// Emit `f`: fill the current path (nonzero winding).
    pub fn fill(&mut self) {
        self.push_op("f", vec![]);
    }

    /// Emit `n`: end the path without painting.
    pub fn end_path(&mut self) {
        self.push_op("n", vec![]);
    }

    // -- Introspection and output ---------------------------------------------

    /// Number of operators emitted so far.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Depth of the `q`/`Q` save stack.
    pub fn saved_depth(&self) -> usize {
        self.state_stack.len()
    }

    /// Serialise the accumulated operators into content-stream bytes.
    #[instrument(skip(self), fields(operations = self.operations.len()))]
    pub fn finish(self) -> Result<Vec<u8>> {
        let content = Content {
            operations: self.operations,
        };
        content
            .encode()
            .map_err(|err| FarbwerkError::PdfError(format!("content encoding failed: {}", err)))
    }

    // -- Helpers --------------------------------------------------------------

    fn push_op(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn mutate(&mut self, f: impl FnOnce(&mut GraphicsState)) {
        f(Rc::make_mut(&mut self.current));
    }
}

impl Default for ContentCanvas {
    fn default() -> Self {
        Self::new()
    }
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

// -- Tests --------------------------------------------------------------------
