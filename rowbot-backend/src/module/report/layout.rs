//! Turns a header and a list of display rows into an ordered list of
//! drawing operations on a canvas sized to fit every row.

use chrono::NaiveDateTime;
use rowbot_common::RawResult;

use super::rows::DisplayRow;
use super::style::{Color, FontSpec, ReportStyle, RowStyle, TextAlign};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x: x as f32,
            y: y as f32,
            w: w as f32,
            h: h as f32,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// One drawing instruction. Coordinates are canvas pixels, y grows down.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Color,
        opacity: f32,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
        glow: Option<f32>,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
        width: f32,
        opacity: f32,
        /// Dash and gap length
        dash: Option<(f32, f32)>,
    },
    Text {
        x: f32,
        y: f32,
        content: String,
        font: FontSpec,
        color: Color,
        align: TextAlign,
        glow: Option<f32>,
    },
}

impl DrawOp {
    /// Vertical extent covered by the operation, as (top, bottom).
    /// Text is approximated from its font size around the baseline.
    pub fn vertical_extent(&self) -> (f32, f32) {
        match self {
            DrawOp::FillRect { rect, .. } | DrawOp::StrokeRect { rect, .. } => {
                (rect.y, rect.bottom())
            }
            DrawOp::Line { from, to, .. } => (from.1.min(to.1), from.1.max(to.1)),
            DrawOp::Text { y, font, .. } => (y - font.size, y + font.size * 0.25),
        }
    }
}

/// Title block shown above the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHeader {
    pub title: String,
    pub date: String,
}

impl ReportHeader {
    /// Placeholder shown when the logbook sends no date
    pub const UNKNOWN_DATE: &'static str = "----------";

    pub fn for_result(result: &RawResult) -> Self {
        Self {
            title: format!("{}m", result.distance),
            date: Self::format_date(result.date),
        }
    }

    pub fn format_date(date: Option<NaiveDateTime>) -> String {
        date.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| Self::UNKNOWN_DATE.to_string())
    }
}

/// Canvas size plus the operations to run on it, in order
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub row_count: usize,
    /// Top edge of row 0
    pub rows_top: u32,
    pub row_height: u32,
    pub elements: Vec<DrawOp>,
}

impl LayoutPlan {
    pub fn row_top(&self, index: usize) -> u32 {
        self.rows_top + index as u32 * self.row_height
    }

    /// Lower edge of the last row; equals `rows_top` for an empty table
    pub fn rows_bottom(&self) -> u32 {
        self.row_top(self.row_count)
    }
}

pub struct LayoutEngine<'a> {
    style: &'a ReportStyle,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(style: &'a ReportStyle) -> Self {
        Self { style }
    }

    pub fn base_height(&self) -> u32 {
        self.style.geometry.base_height()
    }

    pub fn canvas_height(&self, row_count: usize) -> u32 {
        self.style.geometry.canvas_height(row_count)
    }

    pub fn plan(&self, header: &ReportHeader, rows: &[DisplayRow]) -> LayoutPlan {
        let g = &self.style.geometry;
        let mut plan = LayoutPlan {
            canvas_width: g.canvas_width,
            canvas_height: self.canvas_height(rows.len()),
            row_count: rows.len(),
            rows_top: g.rows_top(),
            row_height: g.row_height,
            elements: Vec::new(),
        };

        self.push_background(&mut plan);
        self.push_title_block(&mut plan, header);
        self.push_header_band(&mut plan);
        self.push_rows(&mut plan, rows);
        self.push_footer(&mut plan);

        plan
    }

    fn push_background(&self, plan: &mut LayoutPlan) {
        let style = self.style;
        let (width, height) = (plan.canvas_width, plan.canvas_height);
        let ops = &mut plan.elements;

        ops.push(DrawOp::FillRect {
            rect: Rect::new(0, 0, width, height),
            color: style.palette.background,
            opacity: 1.0,
        });

        if style.chrome.scanlines {
            let step = style.chrome.scanline_step.max(1) as usize;
            for y in (0..height).step_by(step) {
                ops.push(DrawOp::Line {
                    from: (0.0, y as f32),
                    to: (width as f32, y as f32),
                    color: style.palette.scanline,
                    width: 1.0,
                    opacity: 0.3,
                    dash: None,
                });
            }
        }

        let outer = style.geometry.outer_margin;
        ops.push(DrawOp::StrokeRect {
            rect: Rect::new(outer, outer, width - 2 * outer, height - 2 * outer),
            color: style.palette.outer_border,
            width: 4.0,
            glow: style.chrome.glow.map(|g| g * 1.5),
        });

        if style.chrome.inner_border {
            let inner = style.geometry.inner_margin;
            ops.push(DrawOp::StrokeRect {
                rect: Rect::new(inner, inner, width - 2 * inner, height - 2 * inner),
                color: style.palette.inner_border,
                width: 2.0,
                glow: style.chrome.glow,
            });
        }
    }

    fn push_title_block(&self, plan: &mut LayoutPlan, header: &ReportHeader) {
        let style = self.style;
        let g = &style.geometry;
        let left = g.content_left as f32;
        let ops = &mut plan.elements;

        ops.push(DrawOp::Text {
            x: left,
            y: g.title_baseline as f32,
            content: format!(
                "{}{}{}",
                style.chrome.title_prefix, header.title, style.chrome.title_suffix
            ),
            font: style.fonts.title,
            color: style.palette.title,
            align: TextAlign::Start,
            glow: style.chrome.glow,
        });
        ops.push(DrawOp::Text {
            x: left,
            y: g.date_baseline as f32,
            content: header.date.clone(),
            font: style.fonts.date,
            color: style.palette.date,
            align: TextAlign::Start,
            glow: None,
        });

        if style.chrome.title_bars {
            for (i, len) in [200, 150, 100].into_iter().enumerate() {
                ops.push(DrawOp::FillRect {
                    rect: Rect::new(g.content_left, g.title_bars_top + i as u32 * 4, len, 2),
                    color: style.palette.title_bars,
                    opacity: 1.0,
                });
            }
        }
    }

    fn push_header_band(&self, plan: &mut LayoutPlan) {
        let style = self.style;
        let g = &style.geometry;
        let band = Rect::new(g.content_left, g.header_top, g.content_width(), g.header_height);
        let ops = &mut plan.elements;

        ops.push(DrawOp::FillRect {
            rect: band,
            color: style.palette.header_band,
            opacity: 1.0,
        });
        ops.push(DrawOp::StrokeRect {
            rect: band,
            color: style.palette.header_border,
            width: 2.0,
            glow: style.chrome.glow,
        });

        // labels sit slightly below the band's vertical center
        let baseline = band.y + band.h / 2.0 + style.fonts.header.size * 0.35;
        for column in style.columns {
            ops.push(DrawOp::Text {
                x: column.x as f32,
                y: baseline,
                content: column.label.to_string(),
                font: style.fonts.header,
                color: style.palette.header_text,
                align: style.align,
                glow: style.chrome.glow.map(|g| g * 0.6),
            });
        }
    }

    fn row_style(&self, index: usize) -> &RowStyle {
        let palette = &self.style.palette;
        match index {
            0 => &palette.summary,
            i if i % 2 == 0 => &palette.row_even,
            _ => &palette.row_odd,
        }
    }

    fn push_rows(&self, plan: &mut LayoutPlan, rows: &[DisplayRow]) {
        let style = self.style;
        let g = &style.geometry;

        for (index, row) in rows.iter().enumerate() {
            let top = plan.row_top(index);
            let slot = Rect::new(g.content_left, top, g.content_width(), g.row_height);
            let row_style = *self.row_style(index);
            let ops = &mut plan.elements;

            if let Some(band) = row_style.band {
                ops.push(DrawOp::FillRect {
                    rect: slot,
                    color: band,
                    opacity: row_style.band_opacity,
                });
            }
            if let Some(outline) = row_style.outline {
                ops.push(DrawOp::StrokeRect {
                    rect: slot,
                    color: outline,
                    width: 2.0,
                    glow: style.chrome.glow.map(|g| g * 0.75),
                });
            }

            let cells = [&row.time, &row.distance, &row.pace, &row.stroke_rate];
            let baseline = (top + g.row_baseline) as f32;
            let glow = style.chrome.glow.map(|g| if index == 0 { g * 0.5 } else { g * 0.375 });
            for (column, value) in style.columns.iter().zip(cells) {
                ops.push(DrawOp::Text {
                    x: column.x as f32,
                    y: baseline,
                    content: value.clone(),
                    font: style.fonts.row,
                    color: row_style.text,
                    align: style.align,
                    glow,
                });
            }

            if index + 1 < rows.len() {
                let y = (top + g.row_height) as f32;
                ops.push(DrawOp::Line {
                    from: (g.content_left as f32, y),
                    to: (g.content_right as f32, y),
                    color: style.palette.separator,
                    width: 1.0,
                    opacity: 1.0,
                    dash: style.chrome.dotted_separators.then_some((4.0, 4.0)),
                });
            }
        }
    }

    fn push_footer(&self, plan: &mut LayoutPlan) {
        let style = self.style;
        let g = &style.geometry;
        let marks_top = plan.rows_bottom() + g.marks_offset;
        let height = plan.canvas_height;
        let ops = &mut plan.elements;

        if style.chrome.corner_marks {
            // (x offset from the table edge, y offset, height)
            let marks = [(0, 0, 15), (10, 5, 10), (20, 10, 8)];
            for (dx, dy, h) in marks {
                ops.push(DrawOp::FillRect {
                    rect: Rect::new(g.content_left + dx, marks_top + dy, 4, h),
                    color: style.palette.mark_left,
                    opacity: 1.0,
                });
            }
            for (dx, dy, h) in marks {
                ops.push(DrawOp::FillRect {
                    rect: Rect::new(g.content_right - 20 - dx, marks_top + dy, 4, h),
                    color: style.palette.mark_right,
                    opacity: 1.0,
                });
            }
        }

        if let Some(caption) = style.chrome.caption {
            ops.push(DrawOp::Text {
                x: g.content_left as f32,
                y: (height - g.caption_from_bottom) as f32,
                content: caption.to_string(),
                font: style.fonts.caption,
                color: style.palette.caption,
                align: TextAlign::Start,
                glow: style.chrome.glow.map(|g| g * 0.75),
            });
        }
    }
}
