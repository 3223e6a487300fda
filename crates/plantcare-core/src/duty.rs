use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which care duties a plant is due for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyCheck {
    pub water: bool,
    pub sun: bool,
}

impl DutyCheck {
    pub fn any(self) -> bool {
        self.water || self.sun
    }

    /// Duties in `self` that `covered` does not already take care of.
    pub fn without(self, covered: DutyCheck) -> DutyCheck {
        DutyCheck {
            water: self.water && !covered.water,
            sun: self.sun && !covered.sun,
        }
    }

    /// Human label used in notifications, e.g. `💧 Water & ☀️ Move to sun`.
    pub fn label(self) -> String {
        let mut parts = Vec::with_capacity(2);
        if self.water {
            parts.push("💧 Water");
        }
        if self.sun {
            parts.push("☀️ Move to sun");
        }
        parts.join(" & ")
    }
}

/// Decide which duties are due on `today`.
///
/// A duty is due once `last + requirement_days <= today`; reaching the due
/// date exactly counts as due.
pub fn resolve_duty(
    last_watered: NaiveDate,
    last_sunlit: NaiveDate,
    water_requirement_days: u32,
    sun_requirement_days: u32,
    today: NaiveDate,
) -> DutyCheck {
    DutyCheck {
        water: is_due(last_watered, water_requirement_days, today),
        sun: is_due(last_sunlit, sun_requirement_days, today),
    }
}

fn is_due(last: NaiveDate, requirement_days: u32, today: NaiveDate) -> bool {
    // Past the end of the calendar is never due.
    match last.checked_add_signed(Duration::days(i64::from(requirement_days))) {
        Some(next_due) => next_due <= today,
        None => false,
    }
}

/// Today's date in UTC.
pub fn utc_today() -> NaiveDate {
    utc_midnight(Utc::now())
}

/// Truncate an instant to its UTC calendar day.
pub fn utc_midnight(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn due_exactly_on_the_due_date() {
        let check = resolve_duty(d("2026-03-10"), d("2026-03-10"), 2, 2, d("2026-03-12"));
        assert!(check.water);
        assert!(check.sun);
    }

    #[test]
    fn not_due_before_the_due_date() {
        let check = resolve_duty(d("2026-03-11"), d("2026-03-01"), 2, 30, d("2026-03-12"));
        assert_eq!(
            check,
            DutyCheck {
                water: false,
                sun: false
            }
        );
        assert!(!check.any());
    }

    #[test]
    fn overdue_is_due() {
        let check = resolve_duty(d("2026-01-01"), d("2026-03-11"), 3, 7, d("2026-03-12"));
        assert!(check.water);
        assert!(!check.sun);
    }

    #[test]
    fn zero_interval_is_always_due() {
        let today = d("2026-03-12");
        assert!(resolve_duty(today, today, 0, 0, today).any());
    }

    #[test]
    fn without_removes_covered_duties() {
        let due = DutyCheck {
            water: true,
            sun: true,
        };
        let covered = DutyCheck {
            water: true,
            sun: false,
        };
        assert_eq!(
            due.without(covered),
            DutyCheck {
                water: false,
                sun: true
            }
        );
        assert!(!due.without(due).any());
    }

    #[test]
    fn label_joins_duties() {
        let both = DutyCheck {
            water: true,
            sun: true,
        };
        assert_eq!(both.label(), "💧 Water & ☀️ Move to sun");
        assert_eq!(
            DutyCheck {
                water: false,
                sun: true
            }
            .label(),
            "☀️ Move to sun"
        );
    }

    #[test]
    fn midnight_truncates_to_utc_day() {
        let late = Utc.with_ymd_and_hms(2026, 3, 12, 23, 59, 59).unwrap();
        assert_eq!(utc_midnight(late), d("2026-03-12"));
    }
}
