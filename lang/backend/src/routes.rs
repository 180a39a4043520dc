use std::collections::HashMap;
use std::fmt;

use turbox_lang_extractor::{Method, RouteDecl};

use crate::quote::quote_str;

/// The key the runtime dispatches on, rendered as `METHOD:/path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: Method,
    pub path: String,
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.method, self.path)
    }
}

/// One registration statement of the generated program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub key: RouteKey,
    pub handler: String,
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app.routes[{}] = {}", quote_str(&self.key.to_string()), self.handler)
    }
}

/// Registrations in emission order: extraction order, then method order.
pub fn registrations(routes: &[RouteDecl<'_>]) -> Vec<Registration> {
    routes
        .iter()
        .flat_map(|route| {
            route.methods.iter().map(|method| Registration {
                key: RouteKey { method: *method, path: route.path.clone() },
                handler: route.handler_name().to_string(),
            })
        })
        .collect()
}

/// The registrations that are active once the program has started.
///
/// Registering a key twice silently replaces the handler; the key keeps the
/// position of its first registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<(RouteKey, String)>,
    index: HashMap<RouteKey, usize>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_registrations(registrations: &[Registration]) -> Self {
        let mut table = Self::new();
        for registration in registrations {
            table.register(registration.key.clone(), registration.handler.clone());
        }
        table
    }

    /// Register `handler` for `key`, returning the handler it replaces.
    pub fn register(&mut self, key: RouteKey, handler: String) -> Option<String> {
        match self.index.get(&key) {
            Some(&i) => {
                log::debug!("Route {key} re-registered, '{handler}' replaces '{}'", self.entries[i].1);
                Some(std::mem::replace(&mut self.entries[i].1, handler))
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, handler));
                None
            }
        }
    }

    pub fn get(&self, method: Method, path: &str) -> Option<&str> {
        let key = RouteKey { method, path: path.to_string() };
        self.index.get(&key).map(|&i| self.entries[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RouteKey, &str)> {
        self.entries.iter().map(|(key, handler)| (key, handler.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use turbox_lang_extractor::{Method, extract};
    use turbox_lang_parser::parse_module;

    use super::*;

    #[test]
    fn registration_statement() {
        let registration = Registration {
            key: RouteKey { method: Method::Post, path: "/items".to_string() },
            handler: "create".to_string(),
        };
        assert_eq!(registration.to_string(), r#"app.routes["POST:/items"] = create"#);
    }

    #[test]
    fn one_registration_per_method() {
        let module = parse_module("@app.route('/x', methods=['GET', 'POST'])\ndef x(r): pass\n").unwrap();
        let keys: Vec<_> =
            registrations(&extract(&module).routes).iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys, vec!["GET:/x", "POST:/x"]);
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let src = "@app.get('/x')\ndef a(r): pass\n@app.get('/y')\ndef b(r): pass\n@app.get('/x')\ndef c(r): pass\n";
        let module = parse_module(src).unwrap();
        let table = RouteTable::from_registrations(&registrations(&extract(&module).routes));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(Method::Get, "/x"), Some("c"));
        let order: Vec<_> = table.iter().map(|(key, handler)| format!("{key} {handler}")).collect();
        assert_eq!(order, vec!["GET:/x c", "GET:/y b"]);
    }
}
