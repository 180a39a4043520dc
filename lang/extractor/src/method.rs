use std::fmt;

/// HTTP methods a route can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Patch,
        Method::Head,
        Method::Options,
    ];

    /// The upper-case token used on the wire and in registration keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    /// Parse a method name, ignoring case. Used for `methods=[...]` elements.
    pub fn parse(s: &str) -> Option<Method> {
        Method::ALL.into_iter().find(|m| m.as_str().eq_ignore_ascii_case(s))
    }

    /// The method named by a shorthand decorator such as `app.post`.
    pub fn from_shorthand(attr: &str) -> Option<Method> {
        Method::ALL.into_iter().find(|m| m.as_str().to_ascii_lowercase() == attr)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Method;

    #[test]
    fn parse_ignores_case() {
        assert_eq!(Method::parse("post"), Some(Method::Post));
        assert_eq!(Method::parse("Options"), Some(Method::Options));
        assert_eq!(Method::parse("TRACE"), None);
    }

    #[test]
    fn shorthand_is_lower_case_only() {
        assert_eq!(Method::from_shorthand("delete"), Some(Method::Delete));
        assert_eq!(Method::from_shorthand("DELETE"), None);
        assert_eq!(Method::from_shorthand("route"), None);
    }
}
