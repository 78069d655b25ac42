//! Line-preserving `.env` document.

/// An `.env` document held as its original lines.
///
/// Parsing never normalizes the document: rendering an unmodified `EnvFile`
/// reproduces the input byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    lines: Vec<String>,
}

impl EnvFile {
    /// Parse `.env` content.
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.split('\n').map(str::to_string).collect(),
        }
    }

    /// Look up the value of the first assignment to `key`.
    ///
    /// Surrounding whitespace and one pair of matching quotes are stripped.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .find_map(|line| parse_assignment(line).filter(|(k, _)| *k == key))
            .map(|(_, value)| unquote(value))
    }

    /// Set `key` to `value`.
    ///
    /// Replaces the first assignment to `key` in place, otherwise appends a new
    /// line at the end of the document (before a trailing newline, if any).
    pub fn set(&mut self, key: &str, value: &str) {
        let assignment = format!("{}={}", key, value);

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| parse_assignment(line).is_some_and(|(k, _)| k == key))
        {
            *line = assignment;
            return;
        }

        match self.lines.last() {
            Some(last) if last.is_empty() => {
                let at = self.lines.len() - 1;
                self.lines.insert(at, assignment);
            }
            _ => self.lines.push(assignment),
        }
    }

    /// Render the document back to text.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Split `KEY=value` (optionally prefixed with `export `) into key and raw value.
fn parse_assignment(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return None;
    }

    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key, value))
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
