//! Extraction of candidate type names from declared field types

use crate::types::DeclaredType;

/// Candidate type names for a declared type, in priority order, deduplicated
///
/// ```
/// use datamap_core::{resolve_type_names, DeclaredType};
///
/// assert_eq!(resolve_type_names(&"Optional[int]".into()), vec!["int"]);
/// assert_eq!(resolve_type_names(&"Union[int, NoneType]".into()), vec!["int", "NoneType"]);
/// assert_eq!(
///     resolve_type_names(&DeclaredType::optional("datetime")),
///     vec!["datetime", "NoneType"]
/// );
/// ```
pub fn resolve_type_names(declared: &DeclaredType) -> Vec<String> {
    let names = match declared {
        DeclaredType::Expr(expr) => expression_names(expr),
        DeclaredType::Named { name } => vec![name.clone()],
        DeclaredType::Generic { name, args } => {
            let named: Vec<String> = args
                .iter()
                .filter_map(argument_name)
                .collect();
            if named.is_empty() {
                vec![name.clone()]
            } else {
                named
            }
        }
    };
    dedup_preserving_order(names)
}

/// Name exposed by a generic argument: plain names, and bare expressions
/// without a bracket group
fn argument_name(arg: &DeclaredType) -> Option<String> {
    match arg {
        DeclaredType::Named { name } => Some(name.clone()),
        DeclaredType::Expr(expr) if !expr.contains('[') => {
            let expr = expr.trim();
            (!expr.is_empty()).then(|| expr.to_string())
        }
        _ => None,
    }
}

/// Names inside the outermost bracket group, split on top-level commas
fn expression_names(expr: &str) -> Vec<String> {
    let expr = expr.trim();
    let Some(inner) = outer_bracket_content(expr) else {
        return if expr.is_empty() {
            Vec::new()
        } else {
            vec![expr.to_string()]
        };
    };

    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in inner.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                names.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    names.push(&inner[start..]);

    names
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn outer_bracket_content(expr: &str) -> Option<&str> {
    let open = expr.find('[')?;
    let close = expr.rfind(']')?;
    (close > open).then(|| &expr[open + 1..close])
}

fn dedup_preserving_order(names: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}
