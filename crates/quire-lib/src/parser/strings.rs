//! String literal decoding.

/// Decode a quoted string token. On a bad escape, returns the offending escape text.
pub fn string_value(token: &str) -> Result<String, String> {
    let inner = token
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(token);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            return Err("\\".to_string());
        };
        match escaped {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '/' => out.push('/'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => out.push(ch),
                    None => return Err(format!("\\u{hex}")),
                }
            }
            other => return Err(format!("\\{other}")),
        }
    }
    Ok(out)
}

/// Decode a block string token: strip delimiters, unescape `\"""`, remove
/// common indentation and surrounding blank lines.
pub fn block_string_value(token: &str) -> String {
    let inner = token.strip_prefix(r#"""""#).unwrap_or(token);
    let inner = inner.strip_suffix(r#"""""#).unwrap_or(inner);
    let raw = inner.replace(r#"\""""#, r#"""""#);

    let lines: Vec<&str> = raw.split("\r\n").flat_map(|l| l.split(['\n', '\r'])).collect();

    fn indent_of(line: &str) -> usize {
        line.len() - line.trim_start_matches([' ', '\t']).len()
    }
    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim_start_matches([' ', '\t']).is_empty())
        .map(|line| indent_of(line))
        .min();

    let mut dedented: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| match common_indent {
            Some(indent) if i > 0 => line.get(indent.min(line.len())..).unwrap_or(""),
            _ => line,
        })
        .collect();

    let is_blank = |line: &&str| line.trim_matches([' ', '\t']).is_empty();
    while dedented.first().is_some_and(is_blank) {
        dedented.remove(0);
    }
    while dedented.last().is_some_and(is_blank) {
        dedented.pop();
    }

    dedented.join("\n")
}
