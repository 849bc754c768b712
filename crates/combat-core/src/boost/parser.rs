//! Parser for the boost DSL and its embedded condition sub-language.
//!
//! A boost string is a `;`-separated list of clauses. Each clause is
//! optionally prefixed `IF(<condition>):`, followed by `<TypeName>(<args>)`.
//! Conditions reuse the same call-style grammar (`HasStatus('RAGING')`,
//! `And(HasTag('x'), HasStatus('y'))`) so one recursive-descent parser
//! covers both.

use std::str::FromStr;

use crate::combatant::Ability;
use crate::error::{CoreError, ErrorContext, ErrorSeverity};
use crate::modifier::ModifierPredicate;

use super::{BoostOrigin, BoostType, ParsedBoost};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoostParseError {
    #[error("unknown boost or condition type '{name}' in '{offending}'")]
    UnknownType {
        name: String,
        offending: String,
        context: ErrorContext,
    },
    #[error("unmatched parenthesis in '{offending}'")]
    UnmatchedParen {
        offending: String,
        context: ErrorContext,
    },
    #[error("missing ':' after IF(...) in '{offending}'")]
    MissingColon {
        offending: String,
        context: ErrorContext,
    },
    #[error("malformed clause '{offending}': {reason}")]
    Malformed {
        offending: String,
        reason: &'static str,
        context: ErrorContext,
    },
}

impl CoreError for BoostParseError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            BoostParseError::UnknownType { context, .. }
            | BoostParseError::UnmatchedParen { context, .. }
            | BoostParseError::MissingColon { context, .. }
            | BoostParseError::Malformed { context, .. } => Some(context),
        }
    }
}

/// Finds the index of the `)` matching the `(` at `open`, accounting for
/// nesting. `None` if unmatched.
fn find_matching_paren(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits `s` on top-level occurrences of `delim`, ignoring delimiters that
/// fall inside a parenthesized or quoted sub-expression.
fn split_top_level(s: &str, delim: char) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut start = 0usize;
    let mut parts = Vec::new();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\'' => in_quotes = !in_quotes,
            b'(' if !in_quotes => depth += 1,
            b')' if !in_quotes => depth -= 1,
            c if c == delim as u8 && depth == 0 && !in_quotes => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn unquote(arg: &str) -> String {
    let trimmed = arg.trim();
    trimmed
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .unwrap_or(trimmed)
        .to_string()
}

/// Parses a `TypeName(args)` or `FuncName(args)` call, returning the type
/// name and the raw (unsplit) argument substring.
fn parse_call(clause: &str) -> Result<(&str, &str), BoostParseError> {
    let malformed = |reason: &'static str| BoostParseError::Malformed {
        offending: clause.to_string(),
        reason,
        context: ErrorContext::new(),
    };
    let open = clause.find('(').ok_or_else(|| malformed("missing '('"))?;
    let close = find_matching_paren(clause, open).ok_or_else(|| {
        BoostParseError::UnmatchedParen {
            offending: clause.to_string(),
            context: ErrorContext::new(),
        }
    })?;
    if close != clause.len() - 1 {
        return Err(malformed("trailing characters after closing ')'"));
    }
    let name = clause[..open].trim();
    let args = &clause[open + 1..close];
    Ok((name, args))
}

/// Parses a condition expression into a [`ModifierPredicate`] AST.
pub fn parse_condition(expr: &str) -> Result<ModifierPredicate, BoostParseError> {
    let expr = expr.trim();
    let (name, args_str) = parse_call(expr)?;
    let args = split_top_level(args_str, ',');

    let unknown = || BoostParseError::UnknownType {
        name: name.to_string(),
        offending: expr.to_string(),
        context: ErrorContext::new(),
    };
    let malformed = |reason: &'static str| BoostParseError::Malformed {
        offending: expr.to_string(),
        reason,
        context: ErrorContext::new(),
    };

    match name {
        "HasTag" => Ok(ModifierPredicate::HasTag(unquote(
            args.first().ok_or_else(|| malformed("HasTag requires one argument"))?,
        ))),
        "HasStatus" => Ok(ModifierPredicate::HasStatus(unquote(
            args.first().ok_or_else(|| malformed("HasStatus requires one argument"))?,
        ))),
        "AbilityIs" => {
            let raw = unquote(args.first().ok_or_else(|| malformed("AbilityIs requires one argument"))?);
            let ability = Ability::from_str(&raw).map_err(|_| malformed("unknown ability name"))?;
            Ok(ModifierPredicate::AbilityIs(ability))
        }
        "AttackerIs" => {
            let raw = unquote(args.first().ok_or_else(|| malformed("AttackerIs requires one argument"))?);
            let id: u64 = raw.parse().map_err(|_| malformed("AttackerIs argument is not a combatant id"))?;
            Ok(ModifierPredicate::AttackerIs(id.into()))
        }
        "DefenderIs" => {
            let raw = unquote(args.first().ok_or_else(|| malformed("DefenderIs requires one argument"))?);
            let id: u64 = raw.parse().map_err(|_| malformed("DefenderIs argument is not a combatant id"))?;
            Ok(ModifierPredicate::DefenderIs(id.into()))
        }
        "DataEquals" => {
            if args.len() != 2 {
                return Err(malformed("DataEquals requires two arguments"));
            }
            Ok(ModifierPredicate::DataEquals(unquote(args[0]), unquote(args[1])))
        }
        "And" => {
            let parsed: Result<Vec<_>, _> = args.iter().map(|a| parse_condition(a)).collect();
            Ok(ModifierPredicate::And(parsed?))
        }
        "Or" => {
            let parsed: Result<Vec<_>, _> = args.iter().map(|a| parse_condition(a)).collect();
            Ok(ModifierPredicate::Or(parsed?))
        }
        "Not" => {
            let inner = args.first().ok_or_else(|| malformed("Not requires one argument"))?;
            Ok(ModifierPredicate::Not(Box::new(parse_condition(inner)?)))
        }
        _ => Err(unknown()),
    }
}

/// Parses a single boost clause, i.e. one `;`-separated segment of a full
/// boost string, already trimmed and non-empty.
fn parse_clause(clause: &str, origin: &BoostOrigin) -> Result<ParsedBoost, BoostParseError> {
    let (condition, body) = if clause.starts_with("IF(") {
        let full_open = clause.find('(').expect("prefix guarantees '('");
        let close = find_matching_paren(clause, full_open).ok_or_else(|| BoostParseError::UnmatchedParen {
            offending: clause.to_string(),
            context: ErrorContext::new(),
        })?;
        let condition_str = &clause[full_open + 1..close];
        let after = &clause[close + 1..];
        let body = after.strip_prefix(':').ok_or_else(|| BoostParseError::MissingColon {
            offending: clause.to_string(),
            context: ErrorContext::new(),
        })?;
        (Some(parse_condition(condition_str)?), body.trim())
    } else {
        (None, clause)
    };

    let (type_name, args_str) = parse_call(body)?;
    let boost_type = BoostType::from_str(type_name).map_err(|_| BoostParseError::UnknownType {
        name: type_name.to_string(),
        offending: clause.to_string(),
        context: ErrorContext::new(),
    })?;
    let args = if args_str.trim().is_empty() {
        Vec::new()
    } else {
        split_top_level(args_str, ',').into_iter().map(unquote).collect()
    };

    Ok(ParsedBoost {
        boost_type,
        args,
        condition,
        origin: origin.clone(),
    })
}

/// Parses a full boost string (`;`-separated clauses) into its component
/// [`ParsedBoost`]s. Never silently drops a clause: any parse failure
/// aborts the whole string with the offending substring attached.
pub fn parse_boost_string(source: &str, origin: BoostOrigin) -> Result<Vec<ParsedBoost>, BoostParseError> {
    source
        .split(';')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|clause| parse_clause(clause, &origin))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> BoostOrigin {
        BoostOrigin::new("item", "ring_of_fire")
    }

    #[test]
    fn parses_simple_clauses() {
        let boosts = parse_boost_string("AC(2);Advantage(AttackRoll)", origin()).unwrap();
        assert_eq!(boosts.len(), 2);
        assert_eq!(boosts[0].boost_type, BoostType::AC);
        assert_eq!(boosts[0].args, vec!["2"]);
        assert_eq!(boosts[1].boost_type, BoostType::Advantage);
    }

    #[test]
    fn parses_conditional_clause() {
        let boosts = parse_boost_string("IF(HasStatus('RAGING')):DamageBonus(2,Slashing)", origin()).unwrap();
        assert_eq!(boosts.len(), 1);
        assert!(boosts[0].is_conditional());
        assert_eq!(
            boosts[0].condition,
            Some(ModifierPredicate::HasStatus("RAGING".to_string()))
        );
        assert_eq!(boosts[0].args, vec!["2", "Slashing"]);
    }

    #[test]
    fn full_example_from_the_rules_parses() {
        let boosts = parse_boost_string(
            "AC(2);Advantage(AttackRoll);Resistance(Fire,Resistant);IF(HasStatus('RAGING')):DamageBonus(2,Slashing)",
            origin(),
        )
        .unwrap();
        assert_eq!(boosts.len(), 4);
    }

    #[test]
    fn unknown_type_fails() {
        let err = parse_boost_string("Frobnicate(1)", origin()).unwrap_err();
        assert!(matches!(err, BoostParseError::UnknownType { .. }));
    }

    #[test]
    fn missing_closing_paren_fails() {
        let err = parse_boost_string("AC(2", origin()).unwrap_err();
        assert!(matches!(err, BoostParseError::UnmatchedParen { .. }));
    }

    #[test]
    fn missing_colon_after_if_fails() {
        let err = parse_boost_string("IF(HasStatus('X'))AC(2)", origin()).unwrap_err();
        assert!(matches!(err, BoostParseError::MissingColon { .. }));
    }

    #[test]
    fn nested_and_or_not_conditions_parse() {
        let boosts = parse_boost_string(
            "IF(And(HasStatus('RAGING'),Not(HasTag('DISARMED')))):DamageBonus(2,Slashing)",
            origin(),
        )
        .unwrap();
        assert!(boosts[0].is_conditional());
    }
}
