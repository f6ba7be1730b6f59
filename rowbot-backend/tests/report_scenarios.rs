use std::path::PathBuf;

use rowbot_backend::module::report::{
    render_workout_report, rows, DrawOp, LayoutEngine, ReportHeader, ReportRenderer, ReportStyle, StyleName,
    WorkoutReport,
};
use rowbot_common::{Interval, IntervalKind, LogbookEnvelope, RawResult, Split, Workout};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn bundled_fonts() -> ReportRenderer {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources/fonts");
    ReportRenderer::with_fonts(Some(&dir), false).unwrap()
}

fn steady_state() -> RawResult {
    RawResult {
        id: 1,
        distance: 8000,
        time: 21671,
        stroke_rate: Some(19),
        workout: Workout {
            splits: Some(vec![
                Split::new(4357, 1600, 18),
                Split::new(4334, 1600, 19),
                Split::new(4313, 1600, 19),
                Split::new(4354, 1600, 19),
                Split::new(4312, 1600, 20),
            ]),
            intervals: None,
        },
        ..Default::default()
    }
}

fn twenty_intervals() -> RawResult {
    let intervals: Vec<Interval> = (0..20)
        .map(|i| Interval::new(IntervalKind::Distance, 1150 + i as u64, 500, 28))
        .collect();
    RawResult {
        id: 3,
        distance: 10000,
        time: intervals.iter().map(|i| i.time).sum(),
        stroke_rate: Some(28),
        workout: Workout {
            splits: None,
            intervals: Some(intervals),
        },
        ..Default::default()
    }
}

fn png_size(bytes: &[u8]) -> (u32, u32) {
    let w = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let h = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    (w, h)
}

/// (content, baseline) of every data cell, in emission order
fn cells(plan: &rowbot_backend::module::report::LayoutPlan, style: &ReportStyle) -> Vec<(String, f32)> {
    plan.elements
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { content, y, font, .. }
                if *font == style.fonts.row && *y > plan.rows_top as f32 =>
            {
                Some((content.clone(), *y))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn steady_state_with_splits() {
    let result = steady_state();
    let table = rows::normalize(&result);
    assert_eq!(table.len(), 6);
    assert_eq!(table[0].time, "36:07.1");
    assert_eq!(table[0].distance, "8000");
    assert_eq!(table[0].pace, "02:15.4");
    assert_eq!(table[0].stroke_rate, "19");

    let style = ReportStyle::default();
    let engine = LayoutEngine::new(&style);
    let plan = engine.plan(&ReportHeader::for_result(&result), &table);
    assert_eq!(plan.canvas_height, engine.base_height() + 6 * style.geometry.row_height);
    assert_eq!(plan.canvas_width, 550);
}

#[test]
fn single_row_workout() {
    let result = RawResult {
        id: 2,
        distance: 1000,
        time: 2000,
        stroke_rate: Some(30),
        ..Default::default()
    };
    let table = rows::normalize(&result);
    assert_eq!(table.len(), 1);
    assert_eq!(table[0].pace, "01:40.0");

    for name in StyleName::ALL {
        let style = ReportStyle::named(name);
        let engine = LayoutEngine::new(&style);
        let plan = engine.plan(&ReportHeader::for_result(&result), &table);
        assert_eq!(plan.canvas_height, engine.base_height() + style.geometry.row_height);
    }
}

#[test]
fn twenty_intervals_do_not_collide() {
    let result = twenty_intervals();
    let table = rows::normalize(&result);
    assert_eq!(table.len(), 21);

    for name in StyleName::ALL {
        let style = ReportStyle::named(name);
        let plan = LayoutEngine::new(&style).plan(&ReportHeader::for_result(&result), &table);
        let cells = cells(&plan, &style);
        assert_eq!(cells.len(), 21 * 4, "{}", name);

        for (i, row) in cells.chunks(4).enumerate() {
            let top = plan.row_top(i) as f32;
            let bottom = plan.row_top(i + 1) as f32;
            for (content, y) in row {
                assert!(*y > top && *y < bottom, "{} row {} '{}' at {}", name, i, content, y);
            }
            assert_eq!(row[0].0, table[i].time);
        }

        let footer_top = plan.rows_bottom() as f32;
        for op in &plan.elements {
            if let DrawOp::Text { font, .. } = op {
                if *font == style.fonts.caption {
                    assert!(op.vertical_extent().0 >= footer_top, "{}", name);
                }
            }
        }
    }
}

#[test]
fn splits_take_precedence_over_intervals() {
    let mut both = steady_state();
    both.workout.intervals = twenty_intervals().workout.intervals;
    assert_eq!(rows::normalize(&both), rows::normalize(&steady_state()));
}

#[test]
fn plans_are_idempotent() {
    let result = twenty_intervals();
    let report = WorkoutReport::new(ReportStyle::default(), bundled_fonts());
    assert_eq!(report.plan(&result), report.plan(&result));
    assert_eq!(report.rows(&result), rows::normalize(&result));
    assert_eq!(report.render(&result).unwrap(), report.render(&result).unwrap());
}

#[test]
fn different_results_render_differently() {
    let report = WorkoutReport::new(ReportStyle::forest(), bundled_fonts());
    let fast = steady_state();
    let mut slow = steady_state();
    slow.time += 600;
    // same row count and canvas, only the digits differ
    assert_eq!(report.plan(&fast).canvas_height, report.plan(&slow).canvas_height);
    assert_ne!(report.render(&fast).unwrap(), report.render(&slow).unwrap());
}

#[test]
fn rendered_png_matches_canvas() {
    let report = WorkoutReport::new(ReportStyle::forest(), bundled_fonts());
    for result in [steady_state(), twenty_intervals(), RawResult::default()] {
        let plan = report.plan(&result);
        let png = report.render(&result).unwrap();
        assert_eq!(png[..8], PNG_MAGIC);
        assert_eq!(png_size(&png), (plan.canvas_width, plan.canvas_height));
    }
}

#[test]
fn logbook_json_to_png() {
    let json = r#"{"data":{
        "id": 9,
        "user_id": 1688,
        "date": "2026-02-04 11:53:00",
        "distance": 4000,
        "time": 9543,
        "stroke_rate": 26,
        "workout": {"intervals": [
            {"type": "distance", "time": 2396, "distance": 1000, "stroke_rate": 27},
            {"type": "rest", "time": 600, "distance": 0},
            {"type": "distance", "time": 2371, "distance": 1000, "stroke_rate": 27}
        ]}
    }}"#;
    let result = serde_json::from_str::<LogbookEnvelope<RawResult>>(json)
        .unwrap()
        .data;

    let report = WorkoutReport::new(ReportStyle::default(), bundled_fonts());
    let table = report.rows(&result);
    assert_eq!(table.len(), 4);
    assert_eq!(table[2].pace, rows::PACE_PLACEHOLDER);
    assert_eq!(ReportHeader::for_result(&result).date, "2026-02-04");

    let png = report.render(&result).unwrap();
    assert_eq!(png[..8], PNG_MAGIC);
}

#[test]
fn default_entry_point_renders_forest_report() {
    let result = steady_state();
    let png = render_workout_report(&bundled_fonts(), &result).unwrap();
    assert_eq!(png[..8], PNG_MAGIC);

    let style = ReportStyle::default();
    let expected_height = LayoutEngine::new(&style).canvas_height(6);
    assert_eq!(png_size(&png), (550, expected_height));
}
