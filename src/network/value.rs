use std::fmt;

/// Tri-state logic value carried by a pin
///
/// Written as `0`, `1` or `X` in text.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
pub enum Value {
    /// Logic zero
    Zero,
    /// Logic one
    One,
    /// Unknown value
    #[default]
    Undefined,
}

impl Value {
    /// Returns true if the value is Zero or One
    pub fn is_defined(&self) -> bool {
        !matches!(self, Value::Undefined)
    }

    /// Convert to a boolean, if defined
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Zero => Some(false),
            Value::One => Some(true),
            Value::Undefined => None,
        }
    }

    /// Character representation: 0, 1 or X
    pub fn to_char(&self) -> char {
        match self {
            Value::Zero => '0',
            Value::One => '1',
            Value::Undefined => 'X',
        }
    }

    /// Parse a single character; both x and X are accepted for Undefined
    pub fn from_char(c: char) -> Option<Value> {
        match c {
            '0' => Some(Value::Zero),
            '1' => Some(Value::One),
            'x' | 'X' => Some(Value::Undefined),
            _ => None,
        }
    }

    /// Parse a whole pattern such as `01X`; `-` is the empty pattern
    pub fn parse_pattern(s: &str) -> Option<Vec<Value>> {
        if s == "-" {
            return Some(Vec::new());
        }
        s.chars().map(Value::from_char).collect()
    }

    /// Format a pattern such as `01X`; the empty pattern is written `-`
    pub fn format_pattern(values: &[Value]) -> String {
        if values.is_empty() {
            "-".to_string()
        } else {
            values.iter().map(Value::to_char).collect()
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        if b {
            Value::One
        } else {
            Value::Zero
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
