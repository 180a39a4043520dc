mod grammar;
mod lexer;
mod result;

use turbox_lang_ast::{Expr, Module};

use grammar::Parser;
pub use lexer::{LexicalError, StrLit, Token};
pub use result::*;

/// Parse a complete Python source file.
pub fn parse_module(s: &str) -> Result<Module, ParseError> {
    let module = Parser::new(s)?.parse_file()?;
    log::debug!("Parsed module with {} top-level statements", module.body.len());
    Ok(module)
}

/// Parse a single (possibly tuple) expression, e.g. for tests and diagnostics.
pub fn parse_exp(s: &str) -> Result<Expr, ParseError> {
    Parser::nested(s, 0)?.parse_single_expression()
}

#[cfg(test)]
mod tests {
    use turbox_lang_ast::*;

    use super::{ParseError, parse_exp, parse_module};

    fn only_stmt(src: &str) -> Stmt {
        let mut module = parse_module(src).unwrap();
        assert_eq!(module.body.len(), 1, "{module:?}");
        module.body.remove(0)
    }

    #[test]
    fn decorated_handler() {
        let src = "@app.get(API + \"/users\")\ndef users(request: Request) -> str:\n    return \"ok\"\n";
        let Stmt::FunctionDef(def) = only_stmt(src) else { panic!("expected a function") };
        assert_eq!(def.name.id, "users");
        assert_eq!(def.decorators.len(), 1);
        assert_eq!(def.params.args.len(), 1);
        assert_eq!(def.params.args[0].annotation.as_ref().unwrap().to_string(), "Request");
        assert_eq!(def.returns.as_ref().unwrap().to_string(), "str");
        assert_eq!(def.decorators[0].expr.to_string(), "app.get(API + '/users')");
        assert!(matches!(&def.body[0], Stmt::Return(Return { value: Some(_), .. })));
    }

    #[test]
    fn async_def() {
        let Stmt::FunctionDef(def) = only_stmt("async def f():\n    await g()\n") else {
            panic!("expected a function")
        };
        assert!(def.is_async);
    }

    #[test]
    fn chained_assignment() {
        let Stmt::Assign(assign) = only_stmt("A = B = '/x'\n") else { panic!("expected assign") };
        assert_eq!(assign.targets.len(), 2);
        assert_eq!(assign.value.as_str_literal(), Some("/x"));
    }

    #[test]
    fn implicit_concatenation() {
        let expr = parse_exp("'/api' \"/v1\"").unwrap();
        assert_eq!(expr.as_str_literal(), Some("/api/v1"));
    }

    #[test]
    fn fstring_fields() {
        let Expr::FString(fstring) = parse_exp("f'{BASE}/items/{n!r:>{width}}' 'x'").unwrap() else {
            panic!("expected an f-string")
        };
        assert_eq!(fstring.parts.len(), 4);
        let FStringPart::Field(base) = &fstring.parts[0] else { panic!("expected a field") };
        assert!(base.is_plain());
        assert_eq!(base.expr.to_string(), "BASE");
        assert_eq!(fstring.parts[1], FStringPart::Literal("/items/".to_string()));
        let FStringPart::Field(n) = &fstring.parts[2] else { panic!("expected a field") };
        assert_eq!(n.conversion, Some('r'));
        assert!(n.format_spec.is_some());
        assert_eq!(fstring.parts[3], FStringPart::Literal("x".to_string()));
    }

    #[test]
    fn fstring_debug_specifier() {
        let Expr::FString(fstring) = parse_exp("f'{x=}'").unwrap() else {
            panic!("expected an f-string")
        };
        let FStringPart::Field(field) = &fstring.parts[0] else { panic!("expected a field") };
        assert!(field.debug);
        assert_eq!(field.expr.to_string(), "x");
    }

    #[test]
    fn fstring_field_spans_point_into_source() {
        let src = "x = f'/a/{name}'\n";
        let Stmt::Assign(assign) = only_stmt(src) else { panic!("expected assign") };
        let Expr::FString(fstring) = &assign.value else { panic!("expected an f-string") };
        let FStringPart::Field(field) = &fstring.parts[1] else { panic!("expected a field") };
        let span = field.expr.span();
        assert_eq!(&src[span.start().to_usize()..span.end().to_usize()], "name");
    }

    #[test]
    fn mixing_bytes_and_str_is_an_error() {
        assert!(matches!(parse_exp("b'a' 'b'"), Err(ParseError::InvalidString { .. })));
    }

    #[test]
    fn compound_statements() {
        let src = "\
import os.path as p, sys
from .models import (User as U, Item,)
try:
    x = 1
except (KeyError, ValueError) as e:
    pass
else:
    pass
finally:
    pass
for i, (a, *b) in enumerate(xs):
    continue
else:
    pass
while x := next(it): break
with open(f) as fh, lock:
    pass
class C(Base, metaclass=M):
    def m(self, /, a, *args, k=1, **kw) -> None: ...
if a: pass
elif b: pass
else: pass
";
        let module = parse_module(src).unwrap();
        assert_eq!(module.body.len(), 8);
        let Stmt::ImportFrom(import) = &module.body[1] else { panic!("expected from-import") };
        assert_eq!(import.level, 1);
        assert_eq!(import.module.as_deref(), Some("models"));
        assert_eq!(import.names.len(), 2);
        let Stmt::ClassDef(class) = &module.body[6] else { panic!("expected class") };
        let Stmt::FunctionDef(method) = &class.body[0] else { panic!("expected method") };
        assert_eq!(method.params.posonly.len(), 1);
        assert_eq!(method.params.args.len(), 1);
        assert!(method.params.vararg.is_some());
        assert_eq!(method.params.kwonly.len(), 1);
        assert!(method.params.kwarg.is_some());
        let Stmt::If(if_stmt) = &module.body[7] else { panic!("expected if") };
        assert!(matches!(&if_stmt.orelse[0], Stmt::If(_)));
    }

    #[test]
    fn expressions_roundtrip_through_display() {
        for src in [
            "[x * 2 for x in range(10) if x % 2]",
            "{k: v for (k, v) in items}",
            "a if b else c",
            "lambda x, y=1: x + y",
            "not a and b or c",
            "a < b <= c is not None",
            "x not in y",
            "f(*args, key=1, **kw)",
            "xs[1:2, ::3]",
            "-x ** 2",
            "{'a': 1, **rest}",
            "{1, 2}",
            "(1,)",
        ] {
            let expr = parse_exp(src).unwrap();
            let reparsed = parse_exp(&expr.to_string()).unwrap();
            assert_eq!(expr.to_string(), reparsed.to_string(), "{src}");
        }
    }

    #[test]
    fn syntax_errors() {
        assert!(matches!(parse_module("def f(:\n"), Err(ParseError::UnexpectedToken { .. })));
        assert!(matches!(parse_module("  x = 1\n"), Err(ParseError::UnexpectedToken { .. })));
        assert!(matches!(parse_module("f() = 1\n"), Err(ParseError::InvalidTarget { .. })));
        assert!(matches!(parse_module("x = 'abc\n"), Err(ParseError::UnterminatedString { .. })));
        assert!(matches!(parse_module("if x:\n"), Err(ParseError::UnexpectedToken { .. } | ParseError::UnexpectedEof { .. })));
    }

    #[test]
    fn lambda_parameters_with_defaults() {
        let Expr::Lambda(lambda) = parse_exp("lambda x, f=lambda: 1, *rest: f(x)").unwrap() else {
            panic!("expected a lambda")
        };
        assert_eq!(lambda.params.args.len(), 2);
        assert!(lambda.params.vararg.is_some());
        assert!(matches!(lambda.params.args[1].default, Some(Expr::Lambda(_))));
    }

    /// Deep nesting must fail cleanly, the frames needed up to the limit do not fit a test thread.
    fn on_large_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
        std::thread::Builder::new().stack_size(256 * 1024 * 1024).spawn(f).unwrap().join().unwrap()
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let src = format!("x = {}1{}\n", "(".repeat(150), ")".repeat(150));
        assert!(on_large_stack(move || parse_module(&src).is_ok()));
    }

    #[test]
    fn excessive_parentheses_are_an_error() {
        let src = format!("x = {}1{}\n", "(".repeat(100_000), ")".repeat(100_000));
        let result = on_large_stack(move || parse_module(&src));
        assert!(matches!(result, Err(ParseError::TooDeeplyNested { limit: 200, .. })), "{result:?}");
    }

    #[test]
    fn excessive_unary_operators_are_an_error() {
        let src = format!("x = {}1\nnot_ = {}y\n", "-".repeat(100_000), "not ".repeat(10));
        let result = on_large_stack(move || parse_module(&src));
        assert!(matches!(result, Err(ParseError::TooDeeplyNested { .. })), "{result:?}");
    }

    #[test]
    fn excessive_block_nesting_is_an_error() {
        let src: String = (0..300).map(|level| format!("{}if x:\n", " ".repeat(level))).collect::<String>()
            + &" ".repeat(300)
            + "pass\n";
        let result = on_large_stack(move || parse_module(&src));
        assert!(matches!(result, Err(ParseError::TooDeeplyNested { .. })), "{result:?}");
    }

    #[test]
    fn match_statement() {
        let src = "\
match command.split():
    case [\"go\", direction] if direction:
        API = '/go'
    case Point(x=0, y=py) | {\"k\": [*rest]}:
        pass
    case Color.RED:
        pass
    case _:
        def fallback(request): return 'x'
";
        let Stmt::Match(stmt) = only_stmt(src) else { panic!("expected match") };
        assert_eq!(stmt.subject.to_string(), "command.split()");
        assert_eq!(stmt.cases.len(), 4);
        let names = |case: &MatchCase| case.captures.iter().map(|c| c.id.clone()).collect::<Vec<_>>();
        assert_eq!(names(&stmt.cases[0]), vec!["direction"]);
        assert!(stmt.cases[0].guard.is_some());
        assert_eq!(names(&stmt.cases[1]), vec!["py", "rest"]);
        assert!(names(&stmt.cases[2]).is_empty());
        assert!(matches!(&stmt.cases[3].body[0], Stmt::FunctionDef(_)));
        let pattern = stmt.cases[2].pattern;
        assert_eq!(&src[pattern.start().to_usize()..pattern.end().to_usize()], "Color.RED");
    }

    #[test]
    fn match_is_a_soft_keyword() {
        let module = parse_module("match = 1\nmatch(x)\nmatch.case = 2\n").unwrap();
        assert!(module.body.iter().all(|stmt| !matches!(stmt, Stmt::Match(_))));
        assert_eq!(module.body.len(), 3);
    }

    #[test]
    fn parenthesized_with_items() {
        let Stmt::With(with) = only_stmt("with (open(a) as x, open(b) as y,):\n    pass\n") else {
            panic!("expected with")
        };
        assert_eq!(with.items.len(), 2);
        assert_eq!(with.items[1].optional_vars.as_ref().unwrap().to_string(), "y");

        let Stmt::With(with) = only_stmt("with (a, b) as pair:\n    pass\n") else { panic!("expected with") };
        assert_eq!(with.items.len(), 1);
        assert!(matches!(with.items[0].context, Expr::Tuple(_)));
    }

    #[test]
    fn crlf_line_endings() {
        let module = parse_module("x = 1\r\nif x:\r\n    y = 2\r\n").unwrap();
        assert_eq!(module.body.len(), 2);
    }
}
