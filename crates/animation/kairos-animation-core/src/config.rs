//! Updater configuration.

use serde::{Deserialize, Serialize};

use crate::interval::Interval;
use crate::time::{Time, MAX_TIME, MIN_TIME};

/// How far around the current time a binder asks its curve for constant
/// spans when its cache misses. `None` means "to the end of time" in that
/// direction, so a curve is queried once until its definition changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    /// Window length after the current time.
    pub lookahead: Option<f64>,
    /// Window length before the current time.
    pub lookbehind: Option<f64>,
}

impl UpdaterConfig {
    /// The closed query window around `time`.
    pub fn window(&self, time: Time) -> Interval {
        let lower = self
            .lookbehind
            .map_or(MIN_TIME, |d| time.offset(-d.max(0.0)));
        let upper = self.lookahead.map_or(MAX_TIME, |d| time.offset(d.max(0.0)));
        Interval::closed(lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_universal() {
        let cfg = UpdaterConfig::default();
        assert!(cfg.window(Time::from_number(3.0)).is_universal());
    }

    #[test]
    fn bounded_window_surrounds_time() {
        let cfg = UpdaterConfig {
            lookahead: Some(2.0),
            lookbehind: Some(0.5),
        };
        let w = cfg.window(Time::from_number(1.0));
        assert_eq!(
            w,
            Interval::closed(Time::from_number(0.5), Time::from_number(3.0))
        );
    }

    #[test]
    fn deserializes_partial_json() {
        let cfg: UpdaterConfig = serde_json::from_str(r#"{ "lookahead": 4.0 }"#).unwrap();
        assert_eq!(cfg.lookahead, Some(4.0));
        assert_eq!(cfg.lookbehind, None);
    }
}
