//! Line tokenizer for workout cell text.
//!
//! Each step line looks like `  - run: 2:00 @z4; keep it smooth` and is
//! split into indentation depth, keyword, value text and an optional note.

/// One tokenized step line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedLine {
    /// Nesting depth; two leading spaces per level
    pub indent_level: usize,
    /// Lowercased keyword before the first `:`
    pub keyword: String,
    /// Text after the keyword, without any `;` note
    pub value: String,
    /// Non-empty text after the first `;`
    pub notes: Option<String>,
}

impl ParsedLine {
    pub fn new(indent_level: usize, keyword: &str, value: &str, notes: Option<&str>) -> Self {
        Self {
            indent_level,
            keyword: keyword.to_string(),
            value: value.to_string(),
            notes: notes.map(str::to_string),
        }
    }
}

/// Indentation level of a line: leading whitespace characters / 2, rounded down
pub fn indent_level(line: &str) -> usize {
    let leading = line.chars().take_while(|c| c.is_whitespace()).count();
    leading / 2
}

/// Tokenize a single line.
///
/// Returns `None` for blank lines and for lines without a `:`.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim_end();
    if line.is_empty() {
        return None;
    }

    let indent_level = indent_level(line);

    let content = line.trim_start();
    let content = content
        .strip_prefix("- ")
        .or_else(|| content.strip_prefix('-'))
        .unwrap_or(content);

    let (keyword, rest) = content.split_once(':')?;
    let keyword = keyword.trim().to_lowercase();

    let (value, notes) = match rest.split_once(';') {
        Some((value, notes)) => {
            let notes = notes.trim();
            (value.trim(), (!notes.is_empty()).then(|| notes.to_string()))
        }
        None => (rest.trim(), None),
    };

    Some(ParsedLine {
        indent_level,
        keyword,
        value: value.to_string(),
        notes,
    })
}

/// Tokenize every line of a block, dropping the ones that are not steps
pub fn parse_lines<'a, I>(lines: I) -> Vec<ParsedLine>
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().filter_map(parse_line).collect()
}
