//! Executes a layout plan: plan -> SVG -> pixmap -> PNG bytes.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use resvg::tiny_skia;
use resvg::usvg::{fontdb, Options, Tree};

use super::error::ReportError;
use super::layout::{DrawOp, LayoutPlan};
use super::style::TextAlign;

const DEFAULT_FONT_FAMILY: &str = "DejaVu Sans Mono";

/// Rasterizes layout plans. Holds only a read-only font database, so one
/// renderer can serve any number of threads; every call owns its surface.
#[derive(Clone)]
pub struct ReportRenderer {
    fontdb: Arc<fontdb::Database>,
    font_family: String,
}

impl ReportRenderer {
    pub fn new(fontdb: fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(fontdb),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }

    /// Load fonts from a directory and, optionally, from the system.
    /// Fails when neither source yields a single face.
    pub fn with_fonts(fonts_dir: Option<&Path>, load_system_fonts: bool) -> Result<Self, ReportError> {
        let mut db = fontdb::Database::new();
        if let Some(dir) = fonts_dir {
            db.load_fonts_dir(dir);
            tracing::debug!("Loaded {} font faces from {:?}", db.len(), dir);
        }
        if load_system_fonts {
            db.load_system_fonts();
        }
        if db.len() == 0 {
            return Err(ReportError::NoFonts);
        }

        let family = fill_generic_families(&mut db);
        tracing::info!(
            "Report renderer ready with {} font faces, fallback family '{}'",
            db.len(),
            family
        );
        Ok(Self::new(db).with_font_family(family))
    }

    /// Fallback family for text whose requested families are all missing
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Render a plan to PNG bytes
    pub fn render(&self, plan: &LayoutPlan) -> Result<Vec<u8>, ReportError> {
        // usvg drops text it has no face for
        if self.fontdb.len() == 0 {
            return Err(ReportError::NoFonts);
        }
        let svg = to_svg(plan);

        let mut options = Options::default();
        options.font_family = self.font_family.clone();
        options.fontdb = self.fontdb.clone();

        let tree = Tree::from_str(&svg, &options)?;

        let mut pixmap = tiny_skia::Pixmap::new(plan.canvas_width, plan.canvas_height).ok_or(
            ReportError::Surface {
                width: plan.canvas_width,
                height: plan.canvas_height,
            },
        )?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| ReportError::Encode(e.to_string()))
    }
}

/// Point the generic `monospace` / `sans-serif` families at faces that are
/// actually loaded. Returns the monospace pick.
fn fill_generic_families(db: &mut fontdb::Database) -> String {
    const MONO: [&str; 4] = ["DejaVu Sans Mono", "Consolas", "Courier New", "Liberation Mono"];
    const SANS: [&str; 4] = ["DejaVu Sans", "Helvetica", "Arial", "Liberation Sans"];

    let has = |db: &fontdb::Database, family: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(name, _)| name == family))
    };
    let first = db
        .faces()
        .next()
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string());

    let mono = MONO
        .into_iter()
        .find(|f| has(db, *f))
        .map_or_else(|| first.clone(), str::to_string);
    let sans = SANS
        .into_iter()
        .find(|f| has(db, *f))
        .map_or_else(|| first.clone(), str::to_string);

    db.set_monospace_family(mono.clone());
    db.set_sans_serif_family(sans);
    mono
}

fn glow_id(blur: f32) -> String {
    format!("glow-{}", (blur * 10.0).round() as u32)
}

fn glow_attr(glow: Option<f32>) -> String {
    match glow {
        Some(blur) if blur > 0.0 => format!(r#" filter="url(#{})""#, glow_id(blur)),
        _ => String::new(),
    }
}

/// Serialize a plan into a standalone SVG document, one element per op
pub fn to_svg(plan: &LayoutPlan) -> String {
    let (width, height) = (plan.canvas_width, plan.canvas_height);
    let mut svg = String::with_capacity(plan.elements.len() * 160);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height,
    );
    svg.push('\n');

    // one blur filter per distinct glow radius; canvas-style blur is about
    // twice the gaussian standard deviation
    let blurs: BTreeSet<u32> = plan
        .elements
        .iter()
        .filter_map(|op| match op {
            DrawOp::StrokeRect { glow, .. } | DrawOp::Text { glow, .. } => *glow,
            _ => None,
        })
        .filter(|blur| *blur > 0.0)
        .map(|blur| (blur * 10.0).round() as u32)
        .collect();
    if !blurs.is_empty() {
        svg.push_str("<defs>\n");
        for key in blurs {
            let _ = writeln!(
                svg,
                r#"<filter id="glow-{key}" x="-50%" y="-50%" width="200%" height="200%"><feGaussianBlur in="SourceGraphic" stdDeviation="{sd}" result="blur"/><feMerge><feMergeNode in="blur"/><feMergeNode in="SourceGraphic"/></feMerge></filter>"#,
                key = key,
                sd = key as f32 / 20.0,
            );
        }
        svg.push_str("</defs>\n");
    }

    for op in &plan.elements {
        match op {
            DrawOp::FillRect { rect, color, opacity } => {
                let _ = writeln!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="{}"/>"#,
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    color.to_hex(),
                    opacity,
                );
            }
            DrawOp::StrokeRect { rect, color, width, glow } => {
                let _ = writeln!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{}"{}/>"#,
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    color.to_hex(),
                    width,
                    glow_attr(*glow),
                );
            }
            DrawOp::Line { from, to, color, width, opacity, dash } => {
                let dash_attr = dash
                    .map(|(on, off)| format!(r#" stroke-dasharray="{} {}""#, on, off))
                    .unwrap_or_default();
                let _ = writeln!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-opacity="{}"{}/>"#,
                    from.0,
                    from.1,
                    to.0,
                    to.1,
                    color.to_hex(),
                    width,
                    opacity,
                    dash_attr,
                );
            }
            DrawOp::Text { x, y, content, font, color, align, glow } => {
                let anchor = match align {
                    TextAlign::Start => "start",
                    TextAlign::End => "end",
                };
                let weight = if font.bold { "bold" } else { "normal" };
                let _ = writeln!(
                    svg,
                    r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" text-anchor="{}" fill="{}"{}>{}</text>"#,
                    x,
                    y,
                    escape_xml(font.family),
                    font.size,
                    weight,
                    anchor,
                    color.to_hex(),
                    glow_attr(*glow),
                    escape_xml(content),
                );
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
