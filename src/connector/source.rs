//! Lexical helpers for scanning Ballerina sources without a full parser
//!
//! Scanning works on a *masked* copy of the source in which comments,
//! documentation lines and string/template contents are blanked out. The
//! masked copy keeps every byte offset and newline of the original, so
//! positions found in one can be used to slice the other.

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    DocLine,
    String,
    Template,
}

/// Blanks comments, documentation lines and literal contents with spaces
pub fn mask(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut state = State::Code;
    let mut at_line_start = true;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b == b'\n' {
            out.push(b'\n');
            if matches!(state, State::LineComment | State::DocLine) {
                state = State::Code;
            }
            at_line_start = true;
            i += 1;
            continue;
        }

        match state {
            State::Code => {
                if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
                    state = State::LineComment;
                    out.push(b' ');
                } else if b == b'#' && at_line_start {
                    state = State::DocLine;
                    out.push(b' ');
                } else if b == b'"' {
                    state = State::String;
                    out.push(b'"');
                } else if b == b'`' {
                    state = State::Template;
                    out.push(b'`');
                } else {
                    out.push(b);
                }
            }
            State::LineComment | State::DocLine => out.push(b' '),
            State::String => {
                if b == b'\\' && i + 1 < bytes.len() && bytes[i + 1] != b'\n' {
                    out.extend_from_slice(b"  ");
                    i += 2;
                    at_line_start = false;
                    continue;
                }
                if b == b'"' {
                    state = State::Code;
                    out.push(b'"');
                } else {
                    out.push(b' ');
                }
            }
            State::Template => {
                if b == b'`' {
                    state = State::Code;
                    out.push(b'`');
                } else {
                    out.push(b' ');
                }
            }
        }

        if b != b' ' && b != b'\t' && b != b'\r' {
            at_line_start = false;
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Index of the delimiter closing the one at `open`
pub fn matching_close(masked: &str, open: usize) -> Option<usize> {
    let bytes = masked.as_bytes();
    let open_ch = *bytes.get(open)?;
    let close_ch = match open_ch {
        b'{' => b'}',
        b'(' => b')',
        b'[' => b']',
        _ => return None,
    };

    let mut depth = 0usize;
    for (offset, &b) in bytes[open..].iter().enumerate() {
        if b == open_ch {
            depth += 1;
        } else if b == close_ch {
            depth -= 1;
            if depth == 0 {
                return Some(open + offset);
            }
        }
    }

    None
}

/// Net `{`/`(`/`[` nesting of `masked[from..to]`
pub fn nesting_depth(masked: &str, from: usize, to: usize) -> i32 {
    masked.as_bytes()[from..to].iter().fold(0, |depth, b| match b {
        b'{' | b'(' | b'[' => depth + 1,
        b'}' | b')' | b']' => depth - 1,
        _ => depth,
    })
}

/// Splits `masked[from..to]` on top-level occurrences of `separator`,
/// returning `(start, end)` ranges
pub fn split_top_level(masked: &str, from: usize, to: usize, separator: u8) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut depth = 0i32;
    let mut start = from;

    for (offset, &b) in masked.as_bytes()[from..to].iter().enumerate() {
        match b {
            b'{' | b'(' | b'[' | b'<' => depth += 1,
            b'}' | b')' | b']' | b'>' => depth -= 1,
            _ if b == separator && depth == 0 => {
                ranges.push((start, from + offset));
                start = from + offset + 1;
            }
            _ => {}
        }
    }
    ranges.push((start, to));

    ranges
}

/// Documentation and annotations written directly above a definition
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LeadingMetadata {
    /// Documentation lines with the leading `#` removed, top to bottom
    pub doc_lines: Vec<String>,
    /// Annotation source text, top to bottom
    pub annotations: String,
}

/// Collects documentation lines and annotations immediately preceding `start`
pub fn leading_metadata(source: &str, masked: &str, start: usize) -> LeadingMetadata {
    let original_lines: Vec<&str> = source[..start].split('\n').collect();
    let masked_lines: Vec<&str> = masked[..start].split('\n').collect();

    let mut doc_lines = Vec::new();
    let mut annotation_lines: Vec<&str> = Vec::new();
    let mut idx = original_lines.len();

    // The last element is the text between the line start and `start`.
    if idx > 0 {
        idx -= 1;
        if !original_lines[idx].trim().is_empty() {
            return LeadingMetadata::default();
        }
    }

    while idx > 0 {
        idx -= 1;
        let line = original_lines[idx].trim();

        if line.is_empty() {
            continue;
        }
        if let Some(doc) = line.strip_prefix('#') {
            doc_lines.push(doc.strip_prefix(' ').unwrap_or(doc).trim_end().to_string());
            continue;
        }

        // Candidate annotation block: walk up until braces balance, then
        // require the topmost line to start with `@`.
        let mut depth = 0i32;
        let mut block_start = idx;
        loop {
            let masked_line = masked_lines[block_start];
            depth += masked_line.matches('}').count() as i32;
            depth -= masked_line.matches('{').count() as i32;
            if depth <= 0 || block_start == 0 {
                break;
            }
            block_start -= 1;
        }

        if depth == 0 && original_lines[block_start].trim_start().starts_with('@') {
            annotation_lines.extend(original_lines[block_start..=idx].iter().rev().copied());
            idx = block_start;
            continue;
        }

        break;
    }

    doc_lines.reverse();
    annotation_lines.reverse();

    LeadingMetadata {
        doc_lines,
        annotations: annotation_lines.join("\n"),
    }
}

/// Parsed documentation lines
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Documentation {
    pub description: Option<String>,
    pub parameters: Vec<(String, String)>,
    pub returns: Option<String>,
}

impl Documentation {
    /// Parses `# text`, `# + name - text` and `# + return - text` lines
    pub fn parse(lines: &[String]) -> Self {
        let mut description = Vec::new();
        let mut parameters = Vec::new();
        let mut returns = None;

        for line in lines {
            let Some(rest) = line.trim_start().strip_prefix('+') else {
                description.push(line.trim());
                continue;
            };

            let (name, text) = match rest.split_once(" - ") {
                Some((name, text)) => (name.trim(), text.trim()),
                None => (rest.trim(), ""),
            };

            if name == "return" {
                returns = Some(text.to_string());
            } else {
                parameters.push((name.to_string(), text.to_string()));
            }
        }

        let description = description.join("\n").trim().to_string();

        Self {
            description: (!description.is_empty()).then_some(description),
            parameters,
            returns,
        }
    }

    pub fn parameter(&self, name: &str) -> Option<String> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.clone())
    }
}
