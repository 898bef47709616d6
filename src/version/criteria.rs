//! Version criteria expressions
//!
//! A criteria is a single comparison such as `>=2.0`, `!= 5.0` or the
//! exclusive range `2.0.5<>4.0.3`. There is no nesting and no `AND`/`OR`.

use std::fmt;
use std::iter;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::version::error::CriteriaError;
use crate::version::loose::Version;
use crate::version::operator::Operator;

/// A parsed version constraint: operator plus one or two sentries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Criteria {
    operator: Operator,
    sentry: Version,
    sentry2: Option<Version>,
}

impl Criteria {
    /// Build a criteria from an operator token and its sentries.
    ///
    /// Fails with `InvalidCriteriaOperation` for an unknown token, with
    /// `ArityMismatch` when the sentry count does not fit the operator, and
    /// with `InvalidSentry` for an empty sentry or one containing operator
    /// characters (`=`, `!`, `<`, `>`).
    pub fn new(
        op: &str,
        sentry: Version,
        sentry2: Option<Version>,
    ) -> Result<Self, CriteriaError> {
        let operator = Operator::from_token(op)?;
        let found = 1 + usize::from(sentry2.is_some());
        if found != operator.arity() {
            return Err(CriteriaError::ArityMismatch {
                op: op.to_string(),
                expected: operator.arity(),
                found,
            });
        }

        // sentries must not contain operator text, or Display would not re-parse
        if let Some(bad) = iter::once(&sentry)
            .chain(sentry2.as_ref())
            .find(|v| v.as_str().is_empty() || v.as_str().contains(['=', '!', '<', '>']))
        {
            return Err(CriteriaError::InvalidSentry {
                sentry: bad.to_string(),
            });
        }

        Ok(Self {
            operator,
            sentry,
            sentry2,
        })
    }

    /// Parse an expression like `>=1.0` or `2.0.5<>4.0.3`.
    pub fn parse(expr: &str) -> Result<Self, CriteriaError> {
        let Some(&op) = Operator::TOKENS.iter().find(|op| expr.contains(**op)) else {
            return Err(CriteriaError::InvalidVersionCriteria {
                criteria: expr.to_string(),
            });
        };

        let mut sentries: Vec<Version> = expr
            .split(op)
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(Version::parse)
            .collect();

        let expected = Operator::from_token(op)?.arity();
        if sentries.len() != expected {
            return Err(CriteriaError::ArityMismatch {
                op: op.to_string(),
                expected,
                found: sentries.len(),
            });
        }

        let sentry2 = if sentries.len() == 2 { sentries.pop() } else { None };
        let sentry = sentries.remove(0);
        Self::new(op, sentry, sentry2)
    }

    /// Does `version` satisfy this criteria? An unknown version always does.
    pub fn test(&self, version: Option<&str>) -> bool {
        match version {
            None => true,
            Some(text) => self.test_version(Some(&Version::parse(text))),
        }
    }

    /// Same as [`Criteria::test`] for an already parsed version.
    pub fn test_version(&self, version: Option<&Version>) -> bool {
        let Some(version) = version else {
            return true;
        };
        self.operator
            .evaluate(version, &self.sentry, self.sentry2.as_ref())
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn sentry(&self) -> &Version {
        &self.sentry
    }

    pub fn sentry2(&self) -> Option<&Version> {
        self.sentry2.as_ref()
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sentry2 {
            Some(upper) => write!(f, "{}{}{}", self.sentry, self.operator, upper),
            None => write!(f, "{}{}", self.operator, self.sentry),
        }
    }
}

impl FromStr for Criteria {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Criteria {
    type Error = CriteriaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Criteria> for String {
    fn from(c: Criteria) -> Self {
        c.to_string()
    }
}
