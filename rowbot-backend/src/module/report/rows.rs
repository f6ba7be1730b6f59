//! Normalizes a logbook result into the rows shown in the report table.

use rowbot_common::{Interval, RawResult, Split, Tenths};

use super::pace::{calculate_pace, format_distance, format_stroke_rate, format_time};

/// Shown in the pace column when pace cannot be computed, e.g. rest intervals
pub const PACE_PLACEHOLDER: &str = "--:--.-";

/// One formatted table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub time: String,
    pub distance: String,
    pub pace: String,
    pub stroke_rate: String,
}

/// A source of one table row
#[derive(Debug, Clone, Copy)]
pub enum Segment<'a> {
    Summary(&'a RawResult),
    Split(&'a Split),
    Interval(&'a Interval),
}

impl Segment<'_> {
    fn measurements(&self) -> (Tenths, u32, Option<u32>) {
        match self {
            Segment::Summary(r) => (r.time, r.distance, r.stroke_rate),
            Segment::Split(s) => (s.time, s.distance, s.stroke_rate),
            Segment::Interval(i) => (i.time, i.distance, i.stroke_rate),
        }
    }

    pub fn to_row(&self) -> DisplayRow {
        let (time, distance, stroke_rate) = self.measurements();
        // zero distance, or a time too large to scale
        let pace = calculate_pace(distance, time)
            .map_or_else(|_| PACE_PLACEHOLDER.to_string(), format_time);

        DisplayRow {
            time: format_time(time),
            distance: format_distance(distance),
            pace,
            stroke_rate: format_stroke_rate(stroke_rate),
        }
    }
}

/// Segments of a result in table order: the summary, then either every
/// split or every interval. Splits win when both lists are populated.
pub fn segments(result: &RawResult) -> Vec<Segment<'_>> {
    let mut out = vec![Segment::Summary(result)];

    let splits = result.splits();
    let intervals = result.intervals();
    if !splits.is_empty() {
        out.extend(splits.iter().map(Segment::Split));
    } else if !intervals.is_empty() {
        out.extend(intervals.iter().map(Segment::Interval));
    }

    out
}

pub fn normalize(result: &RawResult) -> Vec<DisplayRow> {
    segments(result).iter().map(Segment::to_row).collect()
}
