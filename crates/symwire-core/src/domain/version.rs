//! Semantic versions, npm-style constraints and resolution.
//!
//! A constraint is parsed into a half-open [`VersionRange`]: `min` is
//! inclusive, `max` is exclusive. Inclusive upper bounds (`<=1.2.3`) and
//! exclusive lower bounds (`>1.2.3`) are expressed through
//! [`SemVer::next_patch`], which is sound because versions carry no
//! pre-release component.
//!
//! | Constraint | Range |
//! |------------|-------|
//! | `1.2.3` / `=1.2.3` | `[1.2.3, 1.2.4)` |
//! | `^1.2.3` | `[1.2.3, 2.0.0)` |
//! | `~1.2.3` | `[1.2.3, 1.3.0)` |
//! | `>=1.2.3` | `[1.2.3, ∞)` |
//! | `>1.2.3` | `[1.2.4, ∞)` |
//! | `<=1.2.3` | `[0.0.0, 1.2.4)` |
//! | `<1.2.3` | `[0.0.0, 1.2.3)` |
//! | `*`, `x`, empty | unconstrained |

use std::fmt;
use std::str::FromStr;

use crate::domain::{error::DomainError, value_objects::BumpType};

/// A `MAJOR.MINOR.PATCH` version.
///
/// The derived ordering is lexicographic on (major, minor, patch) because of
/// the field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemVer {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Smallest version strictly greater than `self`.
    pub fn next_patch(self) -> Result<Self, DomainError> {
        self.bump(BumpType::Patch)
    }

    /// Increment one component, zeroing the components after it. Fails when
    /// the component is already `u64::MAX`.
    pub fn bump(self, bump: BumpType) -> Result<Self, DomainError> {
        let overflow = || DomainError::InvalidVersion {
            input: self.to_string(),
            reason: format!("{bump:?} component overflows").to_lowercase(),
        };
        let next = match bump {
            BumpType::Major => Self::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0),
            BumpType::Minor => {
                Self::new(self.major, self.minor.checked_add(1).ok_or_else(overflow)?, 0)
            }
            BumpType::Patch => Self::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        };
        Ok(next)
    }

    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidVersion {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid("expected MAJOR.MINOR.PATCH"));
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("components must be non-negative integers"));
            }
            *slot = part
                .parse()
                .map_err(|_| invalid("component out of range"))?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SemVer {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A half-open version interval `[min, max)`; `None` bounds are open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    pub min: Option<SemVer>,
    pub max: Option<SemVer>,
    pub constraint: String,
}

impl VersionRange {
    /// The range that admits every version.
    pub fn any() -> Self {
        Self {
            min: None,
            max: None,
            constraint: "*".into(),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, version: &SemVer) -> bool {
        self.min.is_none_or(|min| *version >= min) && self.max.is_none_or(|max| *version < max)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.constraint)
    }
}

/// Parse an npm-style constraint into a [`VersionRange`].
pub fn parse_constraint(constraint: &str) -> Result<VersionRange, DomainError> {
    let text = constraint.trim();

    if text.is_empty() || matches!(text, "*" | "x" | "X") {
        return Ok(VersionRange {
            min: None,
            max: None,
            constraint: text.to_string(),
        });
    }

    let invalid = |e: DomainError| DomainError::InvalidConstraint {
        constraint: text.to_string(),
        reason: e.to_string(),
    };
    let version = |rest: &str| SemVer::parse(rest).map_err(invalid);
    let next = |v: SemVer, bump: BumpType| v.bump(bump).map_err(invalid);

    let range = |min: Option<SemVer>, max: Option<SemVer>| VersionRange {
        min,
        max,
        constraint: text.to_string(),
    };

    // Two-character operators must be tried before their one-character prefixes.
    if let Some(rest) = text.strip_prefix(">=") {
        return Ok(range(Some(version(rest)?), None));
    }
    if let Some(rest) = text.strip_prefix("<=") {
        return Ok(range(None, Some(next(version(rest)?, BumpType::Patch)?)));
    }
    if let Some(rest) = text.strip_prefix('>') {
        return Ok(range(Some(next(version(rest)?, BumpType::Patch)?), None));
    }
    if let Some(rest) = text.strip_prefix('<') {
        return Ok(range(None, Some(version(rest)?)));
    }
    if let Some(rest) = text.strip_prefix('=') {
        let v = version(rest)?;
        return Ok(range(Some(v), Some(next(v, BumpType::Patch)?)));
    }
    if let Some(rest) = text.strip_prefix('^') {
        let v = version(rest)?;
        return Ok(range(Some(v), Some(next(v, BumpType::Major)?)));
    }
    if let Some(rest) = text.strip_prefix('~') {
        let v = version(rest)?;
        return Ok(range(Some(v), Some(next(v, BumpType::Minor)?)));
    }
    if text.starts_with(|c: char| c.is_ascii_digit() || c == 'v') {
        let v = version(text)?;
        return Ok(range(Some(v), Some(next(v, BumpType::Patch)?)));
    }

    Err(DomainError::InvalidConstraint {
        constraint: text.to_string(),
        reason: "unrecognised operator".into(),
    })
}

/// Whether `version` lies inside `range`.
pub fn satisfies(version: &SemVer, range: &VersionRange) -> bool {
    range.contains(version)
}

/// Highest candidate satisfying `constraint`, if any.
pub fn find_best_match(candidates: &[SemVer], constraint: &str) -> Result<Option<SemVer>, DomainError> {
    let range = parse_constraint(constraint)?;
    let mut matching: Vec<SemVer> = candidates
        .iter()
        .copied()
        .filter(|v| satisfies(v, &range))
        .collect();
    matching.sort_by(|a, b| b.cmp(a));
    Ok(matching.into_iter().next())
}

pub fn bump_version(version: SemVer, bump: BumpType) -> Result<SemVer, DomainError> {
    version.bump(bump)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> SemVer {
        SemVer::parse(s).unwrap()
    }

    #[test]
    fn parses_and_prints() {
        assert_eq!(v("1.2.3"), SemVer::new(1, 2, 3));
        assert_eq!(v("v0.10.0").to_string(), "0.10.0");
        assert!(SemVer::parse("1.2").is_err());
        assert!(SemVer::parse("1.2.x").is_err());
        assert!(SemVer::parse("1.-2.3").is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(v("1.10.0") > v("1.9.9"));
        assert!(v("2.0.0") > v("1.99.99"));
        assert!(v("1.0.1") > v("1.0.0"));
    }

    #[test]
    fn caret_range() {
        let r = parse_constraint("^1.2.0").unwrap();
        assert_eq!(r.min, Some(v("1.2.0")));
        assert_eq!(r.max, Some(v("2.0.0")));
        assert!(satisfies(&v("1.9.9"), &r));
        assert!(!satisfies(&v("2.0.0"), &r));
        assert!(!satisfies(&v("1.1.9"), &r));
    }

    #[test]
    fn tilde_range() {
        let r = parse_constraint("~1.2.3").unwrap();
        assert!(satisfies(&v("1.2.9"), &r));
        assert!(!satisfies(&v("1.3.0"), &r));
    }

    #[test]
    fn exact_and_equals_match_one_version() {
        for c in ["1.2.3", "=1.2.3"] {
            let r = parse_constraint(c).unwrap();
            assert!(satisfies(&v("1.2.3"), &r));
            assert!(!satisfies(&v("1.2.4"), &r));
            assert!(!satisfies(&v("1.2.2"), &r));
        }
    }

    #[test]
    fn comparison_operators() {
        let gt = parse_constraint(">1.2.3").unwrap();
        assert!(!satisfies(&v("1.2.3"), &gt));
        assert!(satisfies(&v("1.2.4"), &gt));

        let le = parse_constraint("<=1.2.3").unwrap();
        assert!(satisfies(&v("1.2.3"), &le));
        assert!(!satisfies(&v("1.2.4"), &le));

        let lt = parse_constraint("<1.2.3").unwrap();
        assert!(!satisfies(&v("1.2.3"), &lt));
        assert!(satisfies(&v("0.0.1"), &lt));

        let ge = parse_constraint(">=1.2.3").unwrap();
        assert!(satisfies(&v("1.2.3"), &ge));
        assert!(satisfies(&v("9.0.0"), &ge));
    }

    #[test]
    fn wildcards_are_unconstrained() {
        for c in ["*", "x", "X", ""] {
            assert!(parse_constraint(c).unwrap().is_unconstrained());
        }
    }

    #[test]
    fn unknown_syntax_is_rejected() {
        assert!(matches!(
            parse_constraint("!1.0.0"),
            Err(DomainError::InvalidConstraint { .. })
        ));
        assert!(parse_constraint("^1.0").is_err());
        assert!(parse_constraint("latest").is_err());
    }

    #[test]
    fn best_match_prefers_highest_in_range() {
        let versions = [v("1.0.0"), v("1.2.0"), v("1.3.5"), v("2.0.0")];
        assert_eq!(find_best_match(&versions, "^1.2.0").unwrap(), Some(v("1.3.5")));
        assert_eq!(find_best_match(&versions, "*").unwrap(), Some(v("2.0.0")));
        assert_eq!(find_best_match(&versions, "^3.0.0").unwrap(), None);
    }

    #[test]
    fn bump_resets_trailing_components() {
        let base = v("1.4.7");
        assert_eq!(bump_version(base, BumpType::Major).unwrap(), v("2.0.0"));
        assert_eq!(bump_version(base, BumpType::Minor).unwrap(), v("1.5.0"));
        assert_eq!(bump_version(base, BumpType::Patch).unwrap(), v("1.4.8"));
    }

    #[test]
    fn component_at_u64_max_cannot_be_incremented() {
        let top = u64::MAX;
        let edge = SemVer::new(top, top, top);
        for bump in [BumpType::Major, BumpType::Minor, BumpType::Patch] {
            assert!(matches!(
                bump_version(edge, bump),
                Err(DomainError::InvalidVersion { .. })
            ));
        }
        assert_eq!(
            bump_version(SemVer::new(1, top, 3), BumpType::Major).unwrap(),
            v("2.0.0")
        );

        for c in [
            format!("<=1.2.{top}"),
            format!(">1.2.{top}"),
            format!("=1.2.{top}"),
            format!("1.2.{top}"),
            format!("^{top}.0.0"),
            format!("~1.{top}.0"),
        ] {
            assert!(
                matches!(parse_constraint(&c), Err(DomainError::InvalidConstraint { .. })),
                "{c} should be rejected"
            );
        }
        let ge = parse_constraint(&format!(">=1.2.{top}")).unwrap();
        assert!(satisfies(&SemVer::new(1, 2, top), &ge));
    }
}
