//! Comparison operators for version criteria

use std::fmt;

use crate::version::error::CriteriaError;
use crate::version::loose::Version;

/// Comparison operators understood by criteria expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal (`=` or `==`)
    Eq,
    /// Not equal (`!=`)
    Ne,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    Le,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    Ge,
    /// Strictly between two versions (`<>`)
    Between,
}

impl Operator {
    /// Every accepted token, longest first so `>=` is found before `>`.
    pub const TOKENS: &'static [&'static str] = &["==", "!=", "<=", ">=", "<>", "=", "<", ">"];

    /// Look up an operator by its token
    pub fn from_token(token: &str) -> Result<Self, CriteriaError> {
        match token {
            "=" | "==" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            "<>" => Ok(Operator::Between),
            _ => Err(CriteriaError::InvalidCriteriaOperation {
                op: token.to_string(),
            }),
        }
    }

    /// Canonical token
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Between => "<>",
        }
    }

    /// Number of sentries the operator compares against
    pub fn arity(&self) -> usize {
        match self {
            Operator::Between => 2,
            _ => 1,
        }
    }

    /// Apply the operator to `version`.
    ///
    /// `upper` is only read by `Between`; a missing upper bound never matches.
    pub fn evaluate(&self, version: &Version, sentry: &Version, upper: Option<&Version>) -> bool {
        match self {
            Operator::Eq => version == sentry,
            Operator::Ne => version != sentry,
            Operator::Lt => version < sentry,
            Operator::Le => version <= sentry,
            Operator::Gt => version > sentry,
            Operator::Ge => version >= sentry,
            Operator::Between => upper.is_some_and(|upper| sentry < version && version < upper),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
