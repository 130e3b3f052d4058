//! Divisor catalog for the highest-averages method.
//!
//! Each divisor maps the number of units an entity already holds, `a`, to the
//! value its size is divided by when competing for the next unit. All seven
//! are increasing in `a`, so an entity's quotient `size / f(a)` strictly
//! decreases as it wins units.
//!
//! | Name | f(a) | Also known as |
//! |------|------|---------------|
//! | Adams | a | smallest divisors |
//! | Dean | a(a+1)/(a+½) | harmonic mean |
//! | Huntington-Hill | √(a(a+1)) | equal proportions |
//! | Webster | a + ½ | Sainte-Laguë |
//! | D'Hondt | a + 1 | Jefferson |
//! | Imperiali | a + 2 | |
//! | Danish | a + ⅓ | |
//!
//! Adams, Dean and Huntington-Hill are zero at `a = 0`; the first unit is then
//! free and the quotient is infinite for every entity with a positive size.

use crate::error::{ApportionError, ApportionResult};
use std::fmt;
use std::str::FromStr;

/// A named divisor function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Divisor {
    /// `a`, smallest divisors
    Adams,
    /// `a(a+1)/(a+½)`, harmonic mean
    Dean,
    /// `√(a(a+1))`, equal proportions
    HuntingtonHill,
    /// `a + ½`, Sainte-Laguë
    Webster,
    /// `a + 1`, Jefferson
    #[default]
    DHondt,
    /// `a + 2`
    Imperiali,
    /// `a + ⅓`
    Danish,
}

impl Divisor {
    /// Every catalog entry, in canonical order.
    pub const ALL: [Divisor; 7] = [
        Divisor::Adams,
        Divisor::Dean,
        Divisor::HuntingtonHill,
        Divisor::Webster,
        Divisor::DHondt,
        Divisor::Imperiali,
        Divisor::Danish,
    ];

    /// Canonical lower-case name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Divisor::Adams => "adams",
            Divisor::Dean => "dean",
            Divisor::HuntingtonHill => "huntington-hill",
            Divisor::Webster => "webster",
            Divisor::DHondt => "d'hondt",
            Divisor::Imperiali => "imperiali",
            Divisor::Danish => "danish",
        }
    }

    /// Evaluates `f(a)`.
    pub fn divisor(self, a: u64) -> f64 {
        let a = a as f64;
        match self {
            Divisor::Adams => a,
            Divisor::Dean => a * (a + 1.0) / (a + 0.5),
            Divisor::HuntingtonHill => (a * (a + 1.0)).sqrt(),
            Divisor::Webster => a + 0.5,
            Divisor::DHondt => a + 1.0,
            Divisor::Imperiali => a + 2.0,
            Divisor::Danish => a + 1.0 / 3.0,
        }
    }

    /// Priority of an entity of `size` currently holding `a` units.
    ///
    /// A zero divisor makes the next unit free: the quotient is `+inf` for a
    /// positive size and `0` for an empty one.
    pub fn quotient(self, size: f64, a: u64) -> f64 {
        let divisor = self.divisor(a);
        if divisor > 0.0 {
            size / divisor
        } else if size > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }

    /// The divisor as a plain function value.
    pub fn function(self) -> impl Fn(u64) -> f64 {
        move |a| self.divisor(a)
    }
}

impl fmt::Display for Divisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Divisor {
    type Err = ApportionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Divisor::ALL.into_iter().find(|d| d.name() == wanted).ok_or_else(|| {
            let valid: Vec<&str> = Divisor::ALL.iter().map(|d| d.name()).collect();
            ApportionError::invalid_argument(
                "divisor",
                format!("unknown divisor '{s}'; expected one of: {}", valid.join(", ")),
            )
        })
    }
}

/// Looks a divisor up by name, case-insensitively.
pub fn divisor(name: &str) -> ApportionResult<Divisor> {
    name.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(divisor("Webster").unwrap(), Divisor::Webster);
        assert_eq!(divisor("D'HONDT").unwrap(), Divisor::DHondt);
        assert_eq!(divisor("Huntington-Hill").unwrap(), Divisor::HuntingtonHill);
        assert_eq!(divisor("  danish ").unwrap(), Divisor::Danish);
    }

    #[test]
    fn unknown_name_lists_valid_names() {
        let err = divisor("sainte-lague").unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.argument(), Some("divisor"));
        let message = err.to_string();
        for d in Divisor::ALL {
            assert!(message.contains(d.name()), "{message} should mention {d}");
        }
    }

    #[test]
    fn names_round_trip() {
        for d in Divisor::ALL {
            assert_eq!(d.to_string().parse::<Divisor>().unwrap(), d);
        }
    }

    #[test]
    fn table_values() {
        assert_eq!(Divisor::Adams.divisor(3), 3.0);
        assert!((Divisor::Dean.divisor(1) - 2.0 / 1.5).abs() < 1e-12);
        assert!((Divisor::HuntingtonHill.divisor(2) - 6f64.sqrt()).abs() < 1e-12);
        assert_eq!(Divisor::Webster.divisor(2), 2.5);
        assert_eq!(Divisor::DHondt.divisor(2), 3.0);
        assert_eq!(Divisor::Imperiali.divisor(0), 2.0);
        assert!((Divisor::Danish.divisor(1) - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn first_unit_is_free_for_zero_divisors() {
        for d in [Divisor::Adams, Divisor::Dean, Divisor::HuntingtonHill] {
            assert_eq!(d.divisor(0), 0.0);
            assert_eq!(d.quotient(5.0, 0), f64::INFINITY);
            assert_eq!(d.quotient(0.0, 0), 0.0);
        }
    }

    #[test]
    fn quotients_strictly_decrease() {
        for d in Divisor::ALL {
            let mut previous = d.quotient(100.0, 0);
            for a in 1..50 {
                let next = d.quotient(100.0, a);
                assert!(next > 0.0);
                assert!(next < previous, "{d}: q({a}) = {next} !< {previous}");
                previous = next;
            }
        }
    }

    #[test]
    fn function_value_matches_method() {
        let f = Divisor::Webster.function();
        assert_eq!(f(4), Divisor::Webster.divisor(4));
    }

    #[test]
    fn default_is_dhondt() {
        assert_eq!(Divisor::default(), Divisor::DHondt);
    }
}
