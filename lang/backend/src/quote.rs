/// Render `s` as a double-quoted Codon string literal.
pub fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() && (c as u32) < 0x100 => {
                out.push_str(&format!("\\x{:02x}", c as u32))
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::quote_str;

    #[test]
    fn escapes() {
        assert_eq!(quote_str("plain"), r#""plain""#);
        assert_eq!(quote_str(r#"say "hi"\n"#), r#""say \"hi\"\\n""#);
        assert_eq!(quote_str("a\nb\tc\r"), r#""a\nb\tc\r""#);
        assert_eq!(quote_str("\x07é"), "\"\\x07é\"");
    }
}
