//! Workout report pipeline
//!
//! A logbook result goes through four stages: the row normalizer turns it
//! into formatted table rows, the layout engine turns rows into a plan of
//! draw operations, and the renderer rasterizes that plan into a PNG.

pub mod error;
pub mod layout;
pub mod pace;
pub mod renderer;
pub mod rows;
pub mod style;

use rowbot_common::RawResult;

pub use error::ReportError;
pub use layout::{DrawOp, LayoutEngine, LayoutPlan, ReportHeader};
pub use renderer::ReportRenderer;
pub use rows::{DisplayRow, Segment};
pub use style::{ReportStyle, StyleName};

/// A style bound to a renderer
#[derive(Clone)]
pub struct WorkoutReport {
    style: ReportStyle,
    renderer: ReportRenderer,
}

impl WorkoutReport {
    pub fn new(style: ReportStyle, renderer: ReportRenderer) -> Self {
        Self { style, renderer }
    }

    pub fn rows(&self, result: &RawResult) -> Vec<DisplayRow> {
        rows::normalize(result)
    }

    pub fn plan(&self, result: &RawResult) -> LayoutPlan {
        let header = ReportHeader::for_result(result);
        LayoutEngine::new(&self.style).plan(&header, &self.rows(result))
    }

    /// Render a result to PNG bytes
    pub fn render(&self, result: &RawResult) -> Result<Vec<u8>, ReportError> {
        let plan = self.plan(result);
        tracing::debug!(
            "Rendering result {} as {} rows on a {}x{} canvas",
            result.id,
            plan.row_count,
            plan.canvas_width,
            plan.canvas_height
        );
        self.renderer.render(&plan)
    }
}

/// Render a result with the default style
pub fn render_workout_report(
    renderer: &ReportRenderer,
    result: &RawResult,
) -> Result<Vec<u8>, ReportError> {
    WorkoutReport::new(ReportStyle::default(), renderer.clone()).render(result)
}
