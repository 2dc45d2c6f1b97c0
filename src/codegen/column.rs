//! Column descriptor to `addColumn` translation.

use std::fmt;

use crate::models::schema::ColumnDescriptor;

use super::options::{php_string, OptionBag, OptionValue};

const CURRENT_TIMESTAMP: &str = "CURRENT_TIMESTAMP";

/// A translated `->addColumn(...)` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDeclaration {
    pub name: String,
    pub column_type: String,
    pub options: OptionBag,
}

impl fmt::Display for ColumnDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "->addColumn({}, {}{})",
            php_string(&self.name),
            php_string(&self.column_type),
            self.options.render_argument()
        )
    }
}

/// A column the translator could not express; rendered as a comment line so
/// the generated file still loads and the column can be written by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationGap {
    pub column: String,
    pub raw_type: String,
    pub reason: String,
}

impl TranslationGap {
    fn new(column: &ColumnDescriptor, reason: impl Into<String>) -> Self {
        Self {
            column: column.name.clone(),
            raw_type: column.raw_type.clone(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TranslationGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "// phinxgen: could not translate column '{}' ({}): {}",
            self.column, self.raw_type, self.reason
        )
    }
}

/// Raw column type split into its parts, e.g. `int(10) unsigned`.
#[derive(Debug, PartialEq)]
struct ParsedType<'a> {
    base: &'a str,
    params: Option<&'a str>,
    unsigned: bool,
}

fn parse_raw_type(raw: &str) -> Result<ParsedType<'_>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("empty column type".to_string());
    }
    // Modifiers live outside the parameter list; enum/set values may spell "unsigned".
    let (head, params, modifiers) = match raw.find('(') {
        Some(open) => {
            let close = raw
                .rfind(')')
                .filter(|close| *close > open)
                .ok_or_else(|| "unbalanced parentheses".to_string())?;
            (&raw[..open], Some(raw[open + 1..close].trim()), &raw[close + 1..])
        }
        None if raw.contains(')') => return Err("unbalanced parentheses".to_string()),
        None => (raw, None, raw),
    };
    let unsigned = modifiers
        .split_whitespace()
        .any(|word| word.eq_ignore_ascii_case("unsigned"));

    let base = head
        .split_whitespace()
        .next()
        .ok_or_else(|| "missing base type".to_string())?;

    Ok(ParsedType {
        base,
        params,
        unsigned,
    })
}

/// Phinx type for a catalog base type; unknown types pass through unchanged.
pub fn map_base_type(base: &str) -> &str {
    match base {
        "varchar" => "string",
        "int" | "mediumint" => "integer",
        "bigint" => "biginteger",
        "tinyint" => "tinyinteger",
        other => other,
    }
}

fn is_decimal_family(base: &str) -> bool {
    matches!(base, "float" | "double" | "decimal")
}

/// Numeric only if the text formats back unchanged, so `08`, `+5` or `1e3`
/// never reach PHP as bare literals.
fn is_numeric_literal(value: &str) -> bool {
    value.parse::<i64>().map_or(false, |n| n.to_string() == value)
        || value
            .parse::<f64>()
            .map_or(false, |f| f.is_finite() && f.to_string() == value)
}

fn is_unsigned_integer(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Default option for a raw catalog default, if it is expressible.
fn resolve_default(default: Option<&str>) -> Option<OptionValue> {
    match default? {
        "NULL" => None,
        value if is_numeric_literal(value) => Some(OptionValue::Number(value.to_string())),
        "current_timestamp()" | "now()" => Some(OptionValue::Str(CURRENT_TIMESTAMP.to_string())),
        _ => None,
    }
}

/// Parses an enum/set value list such as `'draft','it''s'`.
fn parse_value_list(params: &str) -> Option<Vec<String>> {
    let mut values = Vec::new();
    let mut chars = params.trim().chars().peekable();

    loop {
        if chars.next()? != '\'' {
            return None;
        }
        let mut value = String::new();
        loop {
            match chars.next()? {
                '\'' if chars.peek() == Some(&'\'') => {
                    chars.next();
                    value.push('\'');
                }
                '\'' => break,
                '\\' => value.push(chars.next()?),
                c => value.push(c),
            }
        }
        values.push(value);

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => return Some(values),
            Some(',') => {
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
            }
            Some(_) => return None,
        }
    }
}

/// Translates one column into a Phinx `addColumn` declaration.
///
/// Options are inserted in the order `null`, `default`, `comment`, then
/// `limit` (or `precision`/`scale`, or `values`), `update`, `signed`.
pub fn translate_column(column: &ColumnDescriptor) -> Result<ColumnDeclaration, TranslationGap> {
    let parsed = parse_raw_type(&column.raw_type).map_err(|e| TranslationGap::new(column, e))?;

    let mut options = OptionBag::new();
    options.insert("null", OptionValue::Bool(column.is_nullable()));

    if let Some(default) = resolve_default(column.default.as_deref()) {
        options.insert("default", default);
    }

    if !column.comment.is_empty() {
        options.insert("comment", OptionValue::Str(column.comment.clone()));
    }

    if let Some(params) = parsed.params {
        if is_decimal_family(parsed.base) {
            let mut parts = params.split(',').map(str::trim);
            let precision = parts.next().unwrap_or_default();
            if !is_unsigned_integer(precision) {
                return Err(TranslationGap::new(column, "non-numeric precision"));
            }
            options.insert("precision", OptionValue::Number(precision.to_string()));

            if let Some(scale) = parts.next() {
                if !is_unsigned_integer(scale) {
                    return Err(TranslationGap::new(column, "non-numeric scale"));
                }
                options.insert("scale", OptionValue::Number(scale.to_string()));
            }
        } else if matches!(parsed.base, "enum" | "set") {
            let values = parse_value_list(params)
                .ok_or_else(|| TranslationGap::new(column, "malformed value list"))?;
            options.insert("values", OptionValue::List(values));
        } else {
            let length = params.replace("unsigned", "");
            let length = length.trim();
            if !length.is_empty() {
                if !is_unsigned_integer(length) {
                    return Err(TranslationGap::new(column, "non-numeric length"));
                }
                options.insert("limit", OptionValue::Number(length.to_string()));
            }
        }
    }

    if column
        .extra
        .to_ascii_lowercase()
        .contains("on update current_timestamp")
    {
        options.insert("update", OptionValue::Str(CURRENT_TIMESTAMP.to_string()));
    }

    if parsed.unsigned {
        options.insert("signed", OptionValue::Bool(false));
    }

    Ok(ColumnDeclaration {
        name: column.name.clone(),
        column_type: map_base_type(parsed.base).to_string(),
        options,
    })
}

/// The line emitted for a column: a declaration, or a comment for a gap.
pub fn render_column(column: &ColumnDescriptor) -> String {
    match translate_column(column) {
        Ok(declaration) => declaration.to_string(),
        Err(gap) => {
            log::warn!("{}", gap);
            gap.to_string()
        }
    }
}
