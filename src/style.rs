//! Inline `style` attribute handling.
//!
//! The widget only ever touches `display`, `top`, and `left`, but declaration
//! scanning stays quote- and paren-aware so values like
//! `background: url("a;b.png")` survive a round trip.

pub(crate) fn parse_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let Some(style_attr) = style_attr else {
        return out;
    };

    let mut start = 0usize;
    let mut paren_depth = 0isize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in style_attr.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (Some(_), '\\') => escaped = true,
            (Some(q), _) if ch == q => quote = None,
            (Some(_), _) => {}
            (None, '\'') | (None, '"') => quote = Some(ch),
            (None, '(') => paren_depth += 1,
            (None, ')') => paren_depth = paren_depth.saturating_sub(1),
            (None, ';') if paren_depth == 0 => {
                push_declaration(&style_attr[start..i], &mut out);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_declaration(&style_attr[start..], &mut out);

    out
}

fn push_declaration(raw: &str, out: &mut Vec<(String, String)>) {
    let decl = raw.trim();
    if decl.is_empty() {
        return;
    }
    let Some(colon) = find_top_level_colon(decl) else {
        return;
    };
    let name = decl[..colon].trim().to_ascii_lowercase();
    if name.is_empty() {
        return;
    }
    let value = decl[colon + 1..].trim().to_string();
    set_declaration_owned(out, name, value);
}

fn find_top_level_colon(decl: &str) -> Option<usize> {
    let mut paren_depth = 0isize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, ch) in decl.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (Some(_), '\\') => escaped = true,
            (Some(q), _) if ch == q => quote = None,
            (Some(_), _) => {}
            (None, '\'') | (None, '"') => quote = Some(ch),
            (None, '(') => paren_depth += 1,
            (None, ')') => paren_depth = paren_depth.saturating_sub(1),
            (None, ':') if paren_depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

pub(crate) fn set_declaration(decls: &mut Vec<(String, String)>, name: &str, value: &str) {
    set_declaration_owned(decls, name.to_ascii_lowercase(), value.to_string());
}

fn set_declaration_owned(decls: &mut Vec<(String, String)>, name: String, value: String) {
    if let Some(pos) = decls.iter().position(|(existing, _)| existing == &name) {
        decls[pos].1 = value;
    } else {
        decls.push((name, value));
    }
}

pub(crate) fn serialize_declarations(decls: &[(String, String)]) -> String {
    let mut out = String::new();
    for (idx, (name, value)) in decls.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}
