#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    pub message: String,
}

pub fn format_scss(source: &str) -> Result<String, FormatError> {
    check_balance(source)?;
    let quoted = normalize_quotes(source);
    Ok(normalize_whitespace(&quoted))
}

fn check_balance(source: &str) -> Result<(), FormatError> {
    let bytes = source.as_bytes();
    let mut parens = 0i64;
    let mut braces = 0i64;
    let mut idx = 0;

    while idx < bytes.len() {
        match bytes[idx] {
            b'/' if idx + 1 < bytes.len() && bytes[idx + 1] == b'/' => {
                while idx < bytes.len() && bytes[idx] != b'\n' {
                    idx += 1;
                }
            }
            quote @ (b'\'' | b'"') => {
                idx += 1;
                while idx < bytes.len() && bytes[idx] != quote && bytes[idx] != b'\n' {
                    idx += 1;
                }
            }
            b'(' => parens += 1,
            b')' => {
                parens -= 1;
                if parens < 0 {
                    return Err(FormatError {
                        message: "unbalanced parenthesis in generated stylesheet".to_string(),
                    });
                }
            }
            b'{' => braces += 1,
            b'}' => {
                braces -= 1;
                if braces < 0 {
                    return Err(FormatError {
                        message: "unbalanced brace in generated stylesheet".to_string(),
                    });
                }
            }
            _ => {}
        }
        idx += 1;
    }

    if parens != 0 {
        return Err(FormatError {
            message: "unbalanced parenthesis in generated stylesheet".to_string(),
        });
    }
    if braces != 0 {
        return Err(FormatError {
            message: "unbalanced brace in generated stylesheet".to_string(),
        });
    }
    Ok(())
}

fn normalize_quotes(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut idx = 0;

    while idx < bytes.len() {
        match bytes[idx] {
            b'/' if idx + 1 < bytes.len() && bytes[idx + 1] == b'/' => {
                let start = idx;
                while idx < bytes.len() && bytes[idx] != b'\n' {
                    idx += 1;
                }
                out.push_str(&source[start..idx]);
            }
            b'\'' => {
                let start = idx;
                idx += 1;
                while idx < bytes.len() && bytes[idx] != b'\'' && bytes[idx] != b'\n' {
                    idx += 1;
                }
                if idx < bytes.len() && bytes[idx] == b'\'' {
                    idx += 1;
                }
                out.push_str(&source[start..idx]);
            }
            b'"' => {
                let start = idx;
                idx += 1;
                while idx < bytes.len() && bytes[idx] != b'"' && bytes[idx] != b'\n' {
                    idx += 1;
                }
                if idx < bytes.len() && bytes[idx] == b'"' {
                    let contents = &source[start + 1..idx];
                    idx += 1;
                    if contents.contains('\'') || contents.contains('\\') {
                        out.push_str(&source[start..idx]);
                    } else {
                        out.push('\'');
                        out.push_str(contents);
                        out.push('\'');
                    }
                } else {
                    out.push_str(&source[start..idx]);
                }
            }
            _ => {
                let rest = &bytes[idx..];
                let run = rest
                    .iter()
                    .position(|byte| matches!(byte, b'/' | b'\'' | b'"'))
                    .unwrap_or(rest.len());
                let run = run.max(1);
                out.push_str(&source[idx..idx + run]);
                idx += run;
            }
        }
    }
    out
}

fn normalize_whitespace(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 1);
    let mut blank_run = 0usize;

    for line in source.lines() {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run == 1 && !out.is_empty() {
                out.push('\n');
            }
        } else {
            blank_run = 0;
            out.push_str(trimmed);
            out.push('\n');
        }
    }

    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}
