//! The fixed timetable of a teaching day: five periods with two breaks.

use serde::Serialize;

pub const FIRST_PERIOD: i32 = 1;
pub const LAST_PERIOD: i32 = 5;

/// A single class slot.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTiming {
    pub period: i32,
    pub name: &'static str,
    pub start: &'static str,
    pub end: &'static str,
}

/// A gap in the timetable that falls after `after_period`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Break {
    pub after_period: i32,
    pub start: &'static str,
    pub end: &'static str,
}

pub const PERIOD_TIMINGS: [PeriodTiming; 5] = [
    PeriodTiming {
        period: 1,
        name: "Period 1",
        start: "09:00",
        end: "09:50",
    },
    PeriodTiming {
        period: 2,
        name: "Period 2",
        start: "09:50",
        end: "10:40",
    },
    PeriodTiming {
        period: 3,
        name: "Period 3",
        start: "11:00",
        end: "11:50",
    },
    PeriodTiming {
        period: 4,
        name: "Period 4",
        start: "11:50",
        end: "12:40",
    },
    PeriodTiming {
        period: 5,
        name: "Period 5",
        start: "13:30",
        end: "15:10",
    },
];

pub const BREAKS: [Break; 2] = [
    Break {
        after_period: 2,
        start: "10:40",
        end: "11:00",
    },
    Break {
        after_period: 4,
        start: "12:40",
        end: "13:30",
    },
];

/// Every period number in order.
pub fn period_numbers() -> impl Iterator<Item = i32> {
    FIRST_PERIOD..=LAST_PERIOD
}

/// Looks up the timing of a period, if it exists.
pub fn timing(period: i32) -> Option<&'static PeriodTiming> {
    PERIOD_TIMINGS.iter().find(|timing| timing.period == period)
}
