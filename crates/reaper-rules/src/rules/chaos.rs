//! Chaos rule: flag pods for reaping at random
//!
//! The default probability comes from `CHAOS_CHANCE`; a pod can override it
//! with the `chaos-chance` annotation. Overrides that do not parse as a float
//! are ignored with a warning and the loaded default applies. Overrides that
//! parse are used as-is, without a range check: values at or above 1.0 always
//! reap, values at or below 0.0 never reap, and `NaN` never reaps because no
//! draw compares below it.

use reaper_common::{Decision, Pod, RuleError};
use tracing::{debug, instrument, warn};

use super::{read_chance, LoadStatus, Rule};
use crate::config::{is_explicitly_loaded, ConfigSource};
use crate::random::{default_source, SharedChanceSource};

pub const RULE_CHAOS: &str = "chaos";
pub const ENV_CHAOS_CHANCE: &str = "CHAOS_CHANCE";
pub const ANNOTATION_CHAOS_CHANCE: &str = "chaos-chance";
pub const REASON_CHAOS: &str = "was flagged for chaos";

/// Loaded chaos settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaosConfig {
    /// Probability a pod without an override is flagged
    pub chance: f64,
    /// Whether the rule participates in evaluation
    pub enabled: bool,
}

#[derive(Debug)]
pub struct ChaosRule {
    config: Option<ChaosConfig>,
    random: SharedChanceSource,
}

impl ChaosRule {
    pub fn new(random: SharedChanceSource) -> Self {
        Self {
            config: None,
            random,
        }
    }

    /// Loaded settings, `None` until a successful `load`
    pub fn config(&self) -> Option<ChaosConfig> {
        self.config
    }

    /// Probability that applies to this pod
    fn effective_chance(&self, pod: &Pod, default: f64) -> f64 {
        let Some(raw) = pod.annotation(ANNOTATION_CHAOS_CHANCE) else {
            return default;
        };

        match raw.parse::<f64>() {
            Ok(chance) => chance,
            Err(err) => {
                warn!(
                    pod = %pod,
                    value = raw,
                    error = %err,
                    "ignoring malformed {} annotation", ANNOTATION_CHAOS_CHANCE
                );
                default
            }
        }
    }
}

impl Default for ChaosRule {
    fn default() -> Self {
        Self::new(default_source())
    }
}

impl Rule for ChaosRule {
    fn name(&self) -> &'static str {
        RULE_CHAOS
    }

    fn load(&mut self, config: &dyn ConfigSource) -> Result<LoadStatus, RuleError> {
        self.config = None;

        let status = match read_chance(config, RULE_CHAOS, ENV_CHAOS_CHANCE)? {
            Some(setting) => {
                self.config = Some(ChaosConfig {
                    chance: setting.value,
                    enabled: true,
                });
                LoadStatus::Loaded {
                    message: format!("{} chance {}", RULE_CHAOS, setting.raw),
                }
            }
            None if is_explicitly_loaded(config, RULE_CHAOS) => {
                self.config = Some(ChaosConfig {
                    chance: 0.0,
                    enabled: true,
                });
                LoadStatus::Loaded {
                    message: format!("{} (no default)", RULE_CHAOS),
                }
            }
            None => {
                self.config = Some(ChaosConfig {
                    chance: 0.0,
                    enabled: false,
                });
                LoadStatus::NotLoaded
            }
        };

        Ok(status)
    }

    #[instrument(level = "debug", skip_all, fields(rule = RULE_CHAOS, pod = %pod))]
    fn should_reap(&self, pod: &Pod) -> Decision {
        let default = match self.config {
            Some(ChaosConfig {
                chance,
                enabled: true,
            }) => chance,
            _ => return Decision::spare(),
        };

        let chance = self.effective_chance(pod, default);
        let draw = self.random.draw();
        debug!(chance, draw, "chaos draw");

        if draw < chance {
            Decision::reap(REASON_CHAOS)
        } else {
            Decision::spare()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;
    use reaper_common::ENV_EXPLICIT_LOAD;

    use super::*;
    use crate::config::MapSource;
    use crate::random::FixedSource;

    fn loaded(config: &MapSource) -> ChaosRule {
        let mut rule = ChaosRule::default();
        rule.load(config).unwrap();
        rule
    }

    fn with_chance(chance: &str) -> MapSource {
        MapSource::new().with(ENV_CHAOS_CHANCE, chance)
    }

    #[test]
    fn test_load() {
        let status = ChaosRule::default().load(&with_chance("0.5")).unwrap();
        assert!(status.is_loaded());
        assert_eq!(status.message(), "chaos chance 0.5");
    }

    #[test]
    fn test_no_load() {
        let mut rule = ChaosRule::default();
        let status = rule.load(&MapSource::new()).unwrap();
        assert!(!status.is_loaded());
        assert_eq!(status.message(), "");
        assert!(!rule.config().unwrap().enabled);
    }

    #[test]
    fn test_invalid_chance() {
        let mut rule = ChaosRule::default();
        let err = rule.load(&with_chance("not-a-number")).unwrap_err();
        assert!(matches!(err, RuleError::InvalidChance { .. }));
        assert!(rule.config().is_none());
    }

    #[test]
    fn test_out_of_range_chance() {
        assert!(ChaosRule::default().load(&with_chance("1.5")).is_err());
        assert!(ChaosRule::default().load(&with_chance("-0.5")).is_err());
    }

    #[test]
    fn test_explicit_load_without_default() {
        let config = MapSource::new().with(ENV_EXPLICIT_LOAD, RULE_CHAOS);
        let mut rule = ChaosRule::default();
        let status = rule.load(&config).unwrap();
        assert!(status.is_loaded());
        assert_eq!(status.message(), "chaos (no default)");
        assert_eq!(
            rule.config(),
            Some(ChaosConfig {
                chance: 0.0,
                enabled: true
            })
        );
    }

    #[test]
    fn test_chance_wins_over_explicit_load() {
        let config = with_chance("0.25").with(ENV_EXPLICIT_LOAD, RULE_CHAOS);
        let status = ChaosRule::default().load(&config).unwrap();
        assert_eq!(status.message(), "chaos chance 0.25");
    }

    #[test]
    fn test_failed_reload_clears_state() {
        let mut rule = loaded(&with_chance("1.0"));
        assert!(rule.load(&with_chance("bogus")).is_err());
        assert!(rule.config().is_none());
        assert!(!rule.should_reap(&Pod::default()).should_reap);
    }

    #[test]
    fn test_load_idempotent() {
        for config in [
            with_chance("0.3"),
            MapSource::new(),
            MapSource::new().with(ENV_EXPLICIT_LOAD, RULE_CHAOS),
        ] {
            let mut rule = ChaosRule::default();
            let first = rule.load(&config);
            let first_config = rule.config();
            let second = rule.load(&config);
            assert_eq!(first, second);
            assert_eq!(first_config, rule.config());
        }
    }

    #[test]
    fn test_reap() {
        let rule = loaded(&with_chance("1.0"));
        for _ in 0..100 {
            let decision = rule.should_reap(&Pod::default());
            assert!(decision.should_reap);
            assert_eq!(decision.reason, REASON_CHAOS);
        }
    }

    #[test]
    fn test_no_reap() {
        let rule = loaded(&with_chance("0.0"));
        for _ in 0..100 {
            assert_eq!(rule.should_reap(&Pod::default()), Decision::spare());
        }
    }

    #[test]
    fn test_annotation_override_reap() {
        let rule = loaded(&with_chance("0.0"));
        let pod = Pod::new("default", "victim").with_annotation(ANNOTATION_CHAOS_CHANCE, "1.0");
        let decision = rule.should_reap(&pod);
        assert!(decision.should_reap);
        assert_eq!(decision.reason, REASON_CHAOS);
    }

    #[test]
    fn test_annotation_override_no_reap() {
        let rule = loaded(&with_chance("1.0"));
        let pod = Pod::new("default", "pet").with_annotation(ANNOTATION_CHAOS_CHANCE, "0.0");
        assert!(!rule.should_reap(&pod).should_reap);
    }

    #[test]
    fn test_explicit_load_no_annotation() {
        let rule = loaded(&MapSource::new().with(ENV_EXPLICIT_LOAD, RULE_CHAOS));
        for _ in 0..100 {
            assert_eq!(rule.should_reap(&Pod::default()), Decision::spare());
        }
    }

    #[test]
    fn test_malformed_annotation_falls_back_to_default() {
        let always = loaded(&with_chance("1.0"));
        let never = loaded(&with_chance("0.0"));
        let pod = Pod::new("default", "odd").with_annotation(ANNOTATION_CHAOS_CHANCE, "often");
        assert!(always.should_reap(&pod).should_reap);
        assert!(!never.should_reap(&pod).should_reap);
    }

    #[test]
    fn test_draw_must_be_strictly_below_chance() {
        let mut rule = ChaosRule::new(Arc::new(FixedSource::new(0.5)));
        rule.load(&with_chance("0.5")).unwrap();
        assert!(!rule.should_reap(&Pod::default()).should_reap);

        rule.load(&with_chance("0.51")).unwrap();
        assert!(rule.should_reap(&Pod::default()).should_reap);
    }

    #[test]
    fn test_unloaded_rule_spares() {
        let rule = ChaosRule::default();
        let pod = Pod::default().with_annotation(ANNOTATION_CHAOS_CHANCE, "1.0");
        assert_eq!(rule.should_reap(&pod), Decision::spare());
    }

    #[test]
    fn test_load_message_echoes_configured_text() {
        for (raw, message) in [
            ("1.0", "chaos chance 1.0"),
            ("0.0", "chaos chance 0.0"),
            ("0.50", "chaos chance 0.50"),
            ("1e-1", "chaos chance 1e-1"),
            ("  .25\t", "chaos chance .25"),
        ] {
            let status = ChaosRule::default().load(&with_chance(raw)).unwrap();
            assert_eq!(status.message(), message);
        }
    }

    #[test]
    fn test_nan_annotation_never_reaps() {
        let rule = loaded(&with_chance("1.0"));
        let pod = Pod::new("default", "nan").with_annotation(ANNOTATION_CHAOS_CHANCE, "NaN");
        assert!(!rule.should_reap(&pod).should_reap);
    }

    fn chance_text() -> impl Strategy<Value = String> {
        // Fixed-point renderings with trailing zeros and optional padding
        (0u32..=1000, 1usize..=4, any::<bool>()).prop_map(|(thousandths, places, padded)| {
            let text = format!("{:.*}", places, f64::from(thousandths) / 1000.0);
            if padded {
                format!(" {} ", text)
            } else {
                text
            }
        })
    }

    proptest! {
        #[test]
        fn test_load_accepts_any_valid_chance(raw in chance_text()) {
            let mut rule = ChaosRule::default();
            let status = rule.load(&with_chance(&raw)).unwrap();
            prop_assert!(status.is_loaded());
            prop_assert_eq!(status.message(), format!("chaos chance {}", raw.trim()));
            prop_assert_eq!(
                rule.config().map(|c| c.chance),
                Some(raw.trim().parse::<f64>().unwrap())
            );
        }
    }
}
