//! Date-derived seeds and the manual seed control.

/// A calendar day. `month` is 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

/// Pack a date into `year*10000 + month*100 + day`.
///
/// Distinct calendar days map to distinct seeds and the value is stable for
/// the whole day, so everybody sees the same composition until midnight.
#[inline]
pub fn daily_seed(date: CalendarDate) -> i32 {
    date.year
        .wrapping_mul(10_000)
        .wrapping_add(date.month as i32 * 100)
        .wrapping_add(date.day as i32)
}

/// Seed for a derived layer (`page seed + offset`).
#[inline]
pub fn layer_seed(seed: i32, offset: i32) -> i32 {
    seed.wrapping_add(offset)
}

/// Debug control for previewing neighbouring compositions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedControl {
    seed: i32,
}

impl SeedControl {
    pub fn for_date(date: CalendarDate) -> Self {
        Self {
            seed: daily_seed(date),
        }
    }

    pub fn with_seed(seed: i32) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn previous(&mut self) -> i32 {
        self.seed = self.seed.wrapping_sub(1);
        self.seed
    }

    pub fn next(&mut self) -> i32 {
        self.seed = self.seed.wrapping_add(1);
        self.seed
    }

    pub fn set(&mut self, seed: i32) {
        self.seed = seed;
    }

    pub fn reset_to(&mut self, date: CalendarDate) {
        self.seed = daily_seed(date);
    }
}
