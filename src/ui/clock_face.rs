use std::fmt;

/// Day/hour/minute breakdown of a raw clock value, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockFace {
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
}

impl ClockFace {
    pub fn from_time(time: f32) -> Self {
        // Stay in f32 until the end; the casts saturate instead of overflowing.
        let day = (time / 24.0).trunc();
        let into_day = time - day * 24.0;
        let hour = into_day.trunc();
        let minute = ((into_day - hour) * 60.0).trunc();
        Self {
            day: day as i32,
            hour: hour as i32,
            minute: minute as i32,
        }
    }

    /// The session spans one weekend; anything past Saturday reads as Sunday.
    pub fn weekday(&self) -> &'static str {
        match self.day {
            0 => "Fri",
            1 => "Sat",
            _ => "Sun",
        }
    }
}

impl fmt::Display for ClockFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {:02}:{:02}", self.weekday(), self.hour, self.minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_saturday_morning() {
        let face = ClockFace::from_time(33.5);
        assert_eq!(face, ClockFace { day: 1, hour: 9, minute: 30 });
        assert_eq!(face.weekday(), "Sat");
        assert_eq!(face.to_string(), "Sat, 09:30");
    }

    #[test]
    fn extreme_times_format_without_overflow() {
        let far = ClockFace::from_time(3.0e9);
        assert_eq!(far.day, 125_000_000);
        assert_eq!(far.weekday(), "Sun");
        assert!((0..24).contains(&far.hour));

        for time in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN, -1.0e12] {
            let face = ClockFace::from_time(time);
            assert!(!face.to_string().is_empty());
        }
    }

    #[test]
    fn start_of_session_is_friday() {
        assert_eq!(ClockFace::from_time(9.0).to_string(), "Fri, 09:00");
        assert_eq!(ClockFace::from_time(60.0).to_string(), "Sun, 12:00");
    }
}
