pub mod hook;
pub mod workout;

pub use hook::{HookEvent, HookResultRef};
pub use workout::{
    HeartRate, Interval, IntervalKind, LogbookEnvelope, RawResult, Split, Tenths, Workout,
};
