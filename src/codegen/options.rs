/// Escapes `value` for use inside a single-quoted PHP string.
pub fn php_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Single-quoted PHP string literal.
pub fn php_string(value: &str) -> String {
    format!("'{}'", php_escape(value))
}

/// A literal on the right-hand side of an option entry.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    /// Numeric literal, emitted unquoted exactly as written.
    Number(String),
    Str(String),
    List(Vec<String>),
}

impl OptionValue {
    pub fn render(&self) -> String {
        match self {
            OptionValue::Bool(value) => value.to_string(),
            OptionValue::Number(value) => value.clone(),
            OptionValue::Str(value) => php_string(value),
            OptionValue::List(values) => {
                let items: Vec<String> = values.iter().map(|v| php_string(v)).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }
}

/// Ordered option map rendered as a PHP array literal.
///
/// Entries keep insertion order; inserting an existing key replaces its value
/// without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionBag {
    entries: Vec<(String, OptionValue)>,
}

impl OptionBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: OptionValue) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `['key' => value, ...]`
    pub fn render(&self) -> String {
        let items: Vec<String> = self
            .entries
            .iter()
            .map(|(key, value)| format!("{} => {}", php_string(key), value.render()))
            .collect();
        format!("[{}]", items.join(", "))
    }

    /// The bag as a trailing call argument: empty bags add nothing.
    pub fn render_argument(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(", {}", self.render())
        }
    }
}
