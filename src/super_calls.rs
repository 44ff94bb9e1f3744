//! Super-call rewriting.
//!
//! Bodies are opaque text, so this is a purely textual pass. Four call shapes
//! are recognized and turned into an explicit superclass dispatch through the
//! runtime's `$super` helper:
//!
//! - `super()`         → `C.$super(this, "m")`
//! - `super(args)`     → `C.$super(this, "m",args)`
//! - `super.x()`       → `C.$super(this, "x")`
//! - `super.x(args)`   → `C.$super(this, "x", args)`
//!
//! where `C` is the ambient class and `m` the enclosing method (`null` for
//! constructors). A `super(` inside a string literal or comment is rewritten
//! as well; nothing here knows about the host language's lexical structure.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SUPER_CALL_RE: Regex =
        Regex::new(r"super(?:\.([\w$]+))?\((\s*\))?").unwrap();
}

/// Identifier characters of the target languages, `$` included.
fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Rewrite every super invocation in `body`.
pub fn rewrite_super_calls(body: &str, class_name: &str, method_name: Option<&str>) -> String {
    let method_literal = match method_name {
        Some(name) => format!("\"{}\"", name),
        None => "null".to_string(),
    };

    let mut out = String::with_capacity(body.len());
    let mut last = 0;

    for caps in SUPER_CALL_RE.captures_iter(body) {
        let Some(whole) = caps.get(0) else { continue };

        // `mySuperPower()` and `$super(` are not super calls.
        if body[..whole.start()]
            .chars()
            .next_back()
            .is_some_and(is_identifier_char)
        {
            continue;
        }

        let target = match caps.get(1) {
            Some(named) => format!("\"{}\"", named.as_str()),
            None => method_literal.clone(),
        };
        let replacement = if caps.get(2).is_some() {
            format!("{}.$super(this, {})", class_name, target)
        } else if caps.get(1).is_some() {
            format!("{}.$super(this, {}, ", class_name, target)
        } else {
            // Unnamed calls splice the arguments right after the comma.
            format!("{}.$super(this, {},", class_name, target)
        };

        out.push_str(&body[last..whole.start()]);
        out.push_str(&replacement);
        last = whole.end();
    }

    out.push_str(&body[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_super_call() {
        assert_eq!(
            rewrite_super_calls("    super()", "Bar", Some("foo")),
            "    Bar.$super(this, \"foo\")"
        );
    }

    #[test]
    fn test_super_call_with_arguments() {
        assert_eq!(
            rewrite_super_calls("    super(1,2)", "Bar", Some("foo")),
            "    Bar.$super(this, \"foo\",1,2)"
        );
    }

    #[test]
    fn test_named_super_calls() {
        assert_eq!(
            rewrite_super_calls("x = super.baz()", "Bar", Some("foo")),
            "x = Bar.$super(this, \"baz\")"
        );
        assert_eq!(
            rewrite_super_calls("x = super.baz(1,2)", "Bar", Some("foo")),
            "x = Bar.$super(this, \"baz\", 1,2)"
        );
    }

    #[test]
    fn test_all_four_shapes_in_one_body() {
        let body = "super()\nsuper(1,2)\nsuper.baz()\nsuper.baz(1,2)";
        let rewritten = rewrite_super_calls(body, "Bar", Some("foo"));
        let lines: Vec<&str> = rewritten.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Bar.$super(this, \"foo\")",
                "Bar.$super(this, \"foo\",1,2)",
                "Bar.$super(this, \"baz\")",
                "Bar.$super(this, \"baz\", 1,2)",
            ]
        );
    }

    #[test]
    fn test_constructor_uses_null_method() {
        assert_eq!(
            rewrite_super_calls("    super(properties)", "Point3", None),
            "    Point3.$super(this, null,properties)"
        );
        assert_eq!(
            rewrite_super_calls("    super( )", "Point3", None),
            "    Point3.$super(this, null)"
        );
    }

    #[test]
    fn test_identifier_containing_super_is_untouched() {
        let body = "    mySuperPower()\n    is_super(1)\n    $super(this)";
        assert_eq!(rewrite_super_calls(body, "Bar", Some("foo")), body);
    }

    #[test]
    fn test_rewrite_is_not_applied_twice() {
        let once = rewrite_super_calls("  super(a)", "Bar", Some("foo"));
        assert_eq!(rewrite_super_calls(&once, "Bar", Some("foo")), once);
    }
}
