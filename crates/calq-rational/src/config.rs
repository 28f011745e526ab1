//! Process-wide configuration.
//!
//! A [`Config`] is a plain value: functions that need a setting take it
//! explicitly. The process-wide default that hosts consult when a caller
//! omits an epsilon or rounding word lives behind a read-write lock and is
//! changed only through [`set`] and [`reset`].

use num_traits::Zero;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use tracing::debug;

use calq_integers::{CalcError, Result, Rounding};

use crate::{DisplayMode, Rational};

/// Default output digit count.
pub const DEFAULT_DISPLAY: usize = 20;

/// Names accepted by [`Config::get`] and [`Config::set`].
pub const NAMES: [&str; 11] = [
    "mode", "display", "epsilon", "quomod", "quo", "mod", "sqrt", "appr", "cfappr", "cfsim", "round",
];

/// Calculator settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Output display mode.
    pub mode: DisplayMode,
    /// Decimal places printed by the decimal and scientific modes.
    pub display: usize,
    /// Default error bound for transcendental functions.
    pub epsilon: Rational,
    /// Rounding for `quomod`.
    pub quomod: Rounding,
    /// Rounding for integer quotients.
    pub quo: Rounding,
    /// Rounding for `mod`.
    pub modulo: Rounding,
    /// Rounding for square roots.
    pub sqrt: Rounding,
    /// Rounding for `appr`.
    pub appr: Rounding,
    /// Rounding for `cfappr`.
    pub cfappr: Rounding,
    /// Rounding for `cfsim`.
    pub cfsim: Rounding,
    /// Rounding for `round` and `bround`.
    pub round: Rounding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Decimal,
            display: DEFAULT_DISPLAY,
            epsilon: Rational::power_of_ten(-20),
            quomod: Rounding::FLOOR,
            quo: Rounding::TRUNC,
            modulo: Rounding::FLOOR,
            sqrt: Rounding::NEAREST_EVEN,
            appr: Rounding::NEAREST_EVEN,
            cfappr: Rounding::FLOOR,
            cfsim: Rounding::new(8),
            round: Rounding::NEAREST_EVEN,
        }
    }
}

/// A setting's value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigValue {
    /// Display mode setting.
    Mode(DisplayMode),
    /// Numeric setting (digit count, epsilon or rounding word).
    Number(Rational),
}

impl From<DisplayMode> for ConfigValue {
    fn from(mode: DisplayMode) -> Self {
        ConfigValue::Mode(mode)
    }
}

impl From<Rational> for ConfigValue {
    fn from(value: Rational) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Number(Rational::from(value))
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Mode(mode) => write!(f, "{mode}"),
            ConfigValue::Number(n) => f.write_str(&n.to_display_string(DisplayMode::Fraction, 0)),
        }
    }
}

fn small_count(name: &str, value: &Rational) -> Result<u32> {
    let n = value
        .to_integer()
        .ok_or_else(|| CalcError::domain(format!("non-integer value for {name}")))?;
    if n.is_negative() {
        return Err(CalcError::domain(format!("negative value for {name}")));
    }
    match n.to_u64() {
        Ok(v) if v < Rounding::LIMIT => Ok(v as u32),
        _ => Err(CalcError::domain(format!("value too large for {name}"))),
    }
}

impl Config {
    fn rounding_slot(&mut self, name: &str) -> Option<&mut Rounding> {
        Some(match name {
            "quomod" => &mut self.quomod,
            "quo" => &mut self.quo,
            "mod" => &mut self.modulo,
            "sqrt" => &mut self.sqrt,
            "appr" => &mut self.appr,
            "cfappr" => &mut self.cfappr,
            "cfsim" => &mut self.cfsim,
            "round" => &mut self.round,
            _ => return None,
        })
    }

    /// Reads a setting by name.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Argument`] for an unknown name.
    pub fn get(&self, name: &str) -> Result<ConfigValue> {
        let rounding = |r: Rounding| ConfigValue::Number(Rational::from(i64::from(r.bits())));
        Ok(match name {
            "mode" => ConfigValue::Mode(self.mode),
            "display" => ConfigValue::Number(Rational::from(self.display as i64)),
            "epsilon" => ConfigValue::Number(self.epsilon.clone()),
            "quomod" => rounding(self.quomod),
            "quo" => rounding(self.quo),
            "mod" => rounding(self.modulo),
            "sqrt" => rounding(self.sqrt),
            "appr" => rounding(self.appr),
            "cfappr" => rounding(self.cfappr),
            "cfsim" => rounding(self.cfsim),
            "round" => rounding(self.round),
            _ => return Err(CalcError::argument(format!("unknown configuration name {name:?}"))),
        })
    }

    /// Changes a setting and returns its previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Argument`] for an unknown name or a value of the
    /// wrong kind, and [`CalcError::Domain`] for a value out of range.
    pub fn set(&mut self, name: &str, value: ConfigValue) -> Result<ConfigValue> {
        let old = self.get(name)?;
        match (name, value) {
            ("mode", ConfigValue::Mode(mode)) => {
                self.mode = if mode == DisplayMode::Default { DisplayMode::Decimal } else { mode };
            }
            ("mode", ConfigValue::Number(_)) => {
                return Err(CalcError::argument("mode must be a display mode name"));
            }
            (_, ConfigValue::Mode(_)) => {
                return Err(CalcError::argument(format!("{name} is not a display mode")));
            }
            ("display", ConfigValue::Number(n)) => self.display = small_count(name, &n)? as usize,
            ("epsilon", ConfigValue::Number(eps)) => {
                if !eps.is_positive() {
                    return Err(CalcError::domain("epsilon must be positive"));
                }
                self.epsilon = eps;
            }
            (_, ConfigValue::Number(n)) => {
                let bits = small_count(name, &n)?;
                if let Some(slot) = self.rounding_slot(name) {
                    *slot = Rounding::new(bits);
                }
            }
        }
        Ok(old)
    }

    /// Changes a setting given as text: a mode name for `mode`, a number
    /// otherwise.
    ///
    /// # Errors
    ///
    /// As [`Config::set`], plus [`CalcError::Parse`] for malformed numbers.
    pub fn set_str(&mut self, name: &str, value: &str) -> Result<ConfigValue> {
        let value = if name == "mode" {
            ConfigValue::Mode(DisplayMode::from_name(value)?)
        } else {
            ConfigValue::Number(value.parse()?)
        };
        self.set(name, value)
    }
}

static GLOBAL: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

/// A snapshot of the process-wide configuration.
#[must_use]
pub fn current() -> Config {
    GLOBAL.read().clone()
}

/// Runs `f` with the process-wide configuration read-locked.
pub fn with<R>(f: impl FnOnce(&Config) -> R) -> R {
    f(&GLOBAL.read())
}

/// The process-wide default epsilon.
#[must_use]
pub fn epsilon() -> Rational {
    GLOBAL.read().epsilon.clone()
}

/// Reads a process-wide setting.
///
/// # Errors
///
/// Returns [`CalcError::Argument`] for an unknown name.
pub fn get(name: &str) -> Result<ConfigValue> {
    GLOBAL.read().get(name)
}

/// Changes a process-wide setting, returning its previous value.
///
/// # Errors
///
/// See [`Config::set`].
pub fn set(name: &str, value: impl Into<ConfigValue>) -> Result<ConfigValue> {
    let value = value.into();
    let old = GLOBAL.write().set(name, value.clone())?;
    debug!(name, %old, new = %value, "configuration changed");
    Ok(old)
}

/// Restores every process-wide setting to its default.
pub fn reset() {
    *GLOBAL.write() = Config::default();
    debug!("configuration reset");
}

impl Config {
    /// Checks that `eps` may be used as an error bound.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] when `eps` is zero or negative.
    pub fn check_epsilon(eps: &Rational) -> Result<()> {
        if eps.is_zero() || eps.is_negative() {
            Err(CalcError::domain("epsilon must be positive"))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calq_integers::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.get("display").unwrap(), ConfigValue::from(20));
        assert_eq!(config.get("quo").unwrap(), ConfigValue::from(2));
        assert_eq!(config.get("cfsim").unwrap(), ConfigValue::from(8));
        assert_eq!(config.get("mode").unwrap(), ConfigValue::Mode(DisplayMode::Decimal));
        assert_eq!(config.get("epsilon").unwrap().to_string(), "1/100000000000000000000");
        for name in NAMES {
            assert!(config.get(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_set_returns_previous() {
        let mut config = Config::default();
        let old = config.set("appr", ConfigValue::from(3)).unwrap();
        assert_eq!(old, ConfigValue::from(24));
        assert_eq!(config.appr, Rounding::AWAY);
        config.set_str("mode", "fraction").unwrap();
        assert_eq!(config.mode, DisplayMode::Fraction);
        config.set_str("epsilon", "1e-5").unwrap();
        assert_eq!(config.epsilon, Rational::power_of_ten(-5));
        config.set("mode", ConfigValue::Mode(DisplayMode::Default)).unwrap();
        assert_eq!(config.mode, DisplayMode::Decimal);
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        let kind = |r: Result<ConfigValue>| r.unwrap_err().kind();
        assert_eq!(kind(config.set("bogus", ConfigValue::from(1))), ErrorKind::ArgumentError);
        assert_eq!(kind(config.set_str("mode", "roman")), ErrorKind::ArgumentError);
        assert_eq!(kind(config.set("mode", ConfigValue::from(1))), ErrorKind::ArgumentError);
        assert_eq!(kind(config.set("display", ConfigValue::from(-1))), ErrorKind::DomainError);
        assert_eq!(kind(config.set_str("sqrt", "1/2")), ErrorKind::DomainError);
        assert_eq!(kind(config.set("round", ConfigValue::from(1 << 31))), ErrorKind::DomainError);
        assert_eq!(kind(config.set("epsilon", ConfigValue::from(0))), ErrorKind::DomainError);
        assert_eq!(kind(config.set_str("epsilon", "-1e-3")), ErrorKind::DomainError);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_epsilon_check() {
        assert!(Config::check_epsilon(&Rational::power_of_ten(-3)).is_ok());
        assert!(Config::check_epsilon(&Rational::zero()).is_err());
    }
}
