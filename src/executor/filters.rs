//! Predicate parsing and evaluation
//!
//! The predicate grammar is exactly one comparison: `<column> <op> <value>`
//! with `op` in `{=, !=, >, <, LIKE}` and no boolean composition. Parsing
//! this fixed shape is the engine's job; full SQL parsing is not.
//!
//! Evaluation policy, in priority order:
//! 1. Both sides parse as integers: numeric comparison for `=,!=,>,<`
//! 2. Both sides parse as timestamps: chronological comparison
//! 3. Text: `=`/`!=` case-insensitive equality, `LIKE` with `%` as a
//!    wildcard run; `>`/`<` on text is an unsupported comparison

use regex::{Regex, RegexBuilder};

use crate::schema::{column_position, Column, Value};

use super::errors::{ExecutorError, ExecutorResult};

/// Comparison operators accepted in a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    Like,
}

impl CompareOp {
    /// Operator spelling used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Like => "LIKE",
        }
    }
}

/// A parsed single-comparison predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// Column the comparison reads
    pub column: String,
    /// Comparison operator
    pub op: CompareOp,
    /// Literal with surrounding single quotes stripped
    pub literal: String,
}

impl Predicate {
    /// Parses a predicate string.
    ///
    /// Returns `Ok(None)` for an absent or blank condition, which matches
    /// every row (unconditional Select/Update/Delete).
    pub fn parse(condition: Option<&str>) -> ExecutorResult<Option<Predicate>> {
        let text = match condition {
            Some(t) if !t.trim().is_empty() => t.trim(),
            _ => return Ok(None),
        };

        // Fixed shape: column, operator, literal. `!=` before `=` so the
        // two-character operator wins.
        let shape = Regex::new(r"^(\w+)\s*(!=|=|>|<|LIKE)\s*(.+)$")
            .map_err(|e| ExecutorError::InvalidPredicate(e.to_string()))?;
        let captures = shape
            .captures(text)
            .ok_or_else(|| ExecutorError::InvalidPredicate(text.to_string()))?;

        let op = match &captures[2] {
            "=" => CompareOp::Eq,
            "!=" => CompareOp::NotEq,
            ">" => CompareOp::Gt,
            "<" => CompareOp::Lt,
            "LIKE" => CompareOp::Like,
            other => return Err(ExecutorError::InvalidPredicate(other.to_string())),
        };

        let mut literal = captures[3].trim().to_string();
        if literal.len() >= 2 && literal.starts_with('\'') && literal.ends_with('\'') {
            literal = literal[1..literal.len() - 1].to_string();
        }

        Ok(Some(Predicate {
            column: captures[1].to_string(),
            op,
            literal,
        }))
    }

    /// Evaluates the predicate against one decoded row.
    ///
    /// Referencing a column the row does not have is an evaluation failure,
    /// not a non-match.
    pub fn matches(&self, columns: &[Column], values: &[Value]) -> ExecutorResult<bool> {
        let position = column_position(columns, &self.column)
            .ok_or_else(|| ExecutorError::ColumnNotFound(self.column.clone()))?;
        let stored = values[position].to_string();

        match self.op {
            CompareOp::Like => self.matches_like(&stored),
            CompareOp::Eq | CompareOp::NotEq | CompareOp::Gt | CompareOp::Lt => {
                // Integer comparison first, then chronological, then text.
                if let (Ok(lhs), Ok(rhs)) =
                    (stored.trim().parse::<i64>(), self.literal.trim().parse::<i64>())
                {
                    return Ok(self.compare_ordered(lhs.cmp(&rhs)));
                }
                if let (Some(lhs), Some(rhs)) = (
                    Value::parse_timestamp(&stored),
                    Value::parse_timestamp(&self.literal),
                ) {
                    return Ok(self.compare_ordered(lhs.cmp(&rhs)));
                }
                self.compare_text(&stored)
            }
        }
    }

    fn compare_ordered(&self, ordering: std::cmp::Ordering) -> bool {
        match self.op {
            CompareOp::Eq => ordering.is_eq(),
            CompareOp::NotEq => !ordering.is_eq(),
            CompareOp::Gt => ordering.is_gt(),
            CompareOp::Lt => ordering.is_lt(),
            CompareOp::Like => false,
        }
    }

    fn compare_text(&self, stored: &str) -> ExecutorResult<bool> {
        match self.op {
            CompareOp::Eq => Ok(stored.eq_ignore_ascii_case(&self.literal)),
            CompareOp::NotEq => Ok(!stored.eq_ignore_ascii_case(&self.literal)),
            _ => Err(ExecutorError::UnsupportedComparison {
                op: self.op.as_str().to_string(),
                value: stored.to_string(),
            }),
        }
    }

    fn matches_like(&self, stored: &str) -> ExecutorResult<bool> {
        // Escape everything, then turn the escaped `%` back into a
        // match-any run. The rest of the pattern matches literally.
        let pattern = format!("^{}$", regex::escape(&self.literal).replace('%', ".*"));
        let matcher = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ExecutorError::InvalidPredicate(e.to_string()))?;
        Ok(matcher.is_match(stored))
    }
}
