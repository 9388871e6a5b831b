//! Lenient `go.mod` parsing.
//!
//! Only the `require` directives matter to the audit; everything else
//! (module/go/replace/exclude directives, comments, unknown syntax) is
//! passed over without error so that one odd line never aborts a scan.

/// One declared dependency entry from a manifest, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub module: String,
    pub version: String,
    pub indirect: bool,
}

/// Parse manifest bytes into ordered requirements.
///
/// Handles both single-line requires and `require ( ... )` blocks, quoted
/// module paths, and `// indirect` markers. Invalid UTF-8 is replaced
/// rather than rejected.
pub fn parse_go_mod(data: &[u8]) -> Vec<Requirement> {
    let text = String::from_utf8_lossy(data);
    let mut requirements = Vec::new();
    let mut in_require_block = false;

    for raw_line in text.lines() {
        let (line, comment) = split_comment(raw_line);
        let line = line.trim();
        let indirect = comment.map(|c| c.trim() == "indirect").unwrap_or(false);

        if in_require_block {
            if line == ")" {
                in_require_block = false;
                continue;
            }
            if let Some(req) = parse_require_line(line, indirect) {
                requirements.push(req);
            }
            continue;
        }

        match line.strip_prefix("require") {
            Some(rest) => {
                let rest = rest.trim_start();
                if rest == "(" {
                    in_require_block = true;
                } else if let Some(req) = parse_require_line(rest, indirect) {
                    requirements.push(req);
                }
            }
            None => continue,
        }
    }

    requirements
}

/// Parse a `module version` pair; anything else yields None.
fn parse_require_line(line: &str, indirect: bool) -> Option<Requirement> {
    let mut fields = line.split_whitespace();
    let module = fields.next()?;
    let version = fields.next()?;

    let module = module.trim_matches('"');
    if module.is_empty() || version.is_empty() {
        return None;
    }

    Some(Requirement {
        module: module.to_string(),
        version: version.to_string(),
        indirect,
    })
}

/// Split a line at a `//` comment, returning the code part and the
/// comment text (if any).
fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.find("//") {
        Some(idx) => (&line[..idx], Some(&line[idx + 2..])),
        None => (line, None),
    }
}
