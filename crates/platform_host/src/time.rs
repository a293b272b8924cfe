//! Wall-clock helpers shared across host contracts and adapters.

use chrono::NaiveDateTime;

/// Returns the current local wall-clock time.
///
/// In the browser the reading comes from `Date`, which already applies the user's time zone.
/// Returns `None` only when the host reports a date chrono cannot represent.
pub fn local_wall_clock() -> Option<NaiveDateTime> {
    #[cfg(target_arch = "wasm32")]
    {
        let now = js_sys::Date::new_0();
        chrono::NaiveDate::from_ymd_opt(
            now.get_full_year() as i32,
            now.get_month() + 1,
            now.get_date(),
        )?
        .and_hms_opt(now.get_hours(), now.get_minutes(), now.get_seconds())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Some(chrono::Local::now().naive_local())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;

    #[test]
    fn native_wall_clock_is_available() {
        let now = local_wall_clock().expect("native clock");
        assert!(now.year() >= 2020);
    }
}
