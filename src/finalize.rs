//! Finalize Module for the scoop compiler
//!
//! Stitches compiled directives into the module text and applies the
//! cosmetic passes that run over the whole output.

use lazy_static::lazy_static;
use regex::Regex;

use crate::codegen::{Dialect, EmittedCode};
use crate::directive::{Directive, DirectiveKind};

lazy_static! {
    static ref DIVIDER_RE: Regex = Regex::new(r"^(\s*)(//|#)-{10,}\s*$").unwrap();
    static ref LINE_COMMENT_RE: Regex = Regex::new(r"^(\s*)//").unwrap();
}

const MEMBER_COMMENT_INDENT: &str = "    ";

/// Concatenate comments, header and body of each emitted directive, in
/// emission order. `emitted` pairs a directive index with its code.
pub fn assemble(
    directives: &[Directive],
    emitted: &[(usize, EmittedCode)],
    dialect: Dialect,
) -> String {
    let mut chunks = Vec::with_capacity(emitted.len());

    for (index, code) in emitted {
        let directive = &directives[*index];
        let comments = normalize_comments(&directive.comments, directive.kind(), dialect);

        let mut chunk = String::new();
        if !comments.is_empty() {
            chunk.push_str(&comments.join("\n"));
            chunk.push('\n');
        }
        chunk.push_str(&code.header);
        if !code.body.is_empty() {
            chunk.push('\n');
            chunk.push_str(&code.body.join("\n"));
        }
        chunks.push(chunk);
    }

    chunks.join("\n")
}

/// Class-sugar comments use `#` and member comments move into the class body.
pub fn normalize_comments(comments: &[String], kind: DirectiveKind, dialect: Dialect) -> Vec<String> {
    if dialect != Dialect::ClassSugar {
        return comments.to_vec();
    }

    comments
        .iter()
        .map(|line| {
            let line = if kind.is_member() && !line.is_empty() {
                format!("{}{}", MEMBER_COMMENT_INDENT, line)
            } else {
                line.clone()
            };
            LINE_COMMENT_RE.replace(&line, "${1}#").to_string()
        })
        .collect()
}

/// Redraw divider comments (`//------`, `#------`) to exactly `width` columns.
pub fn normalize_dividers(code: &str, width: usize) -> String {
    code.split('\n')
        .map(|line| match DIVIDER_RE.captures(line) {
            Some(caps) => {
                let indent = &caps[1];
                let marker = &caps[2];
                let used = indent.chars().count() + marker.len();
                if used >= width {
                    return line.to_string();
                }
                format!("{}{}{}", indent, marker, "-".repeat(width - used))
            }
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap a module in a CommonJS Transport/D `require.define` call.
pub fn wrap_transport_d(code: &str, module_id: &str) -> String {
    let (content, trailing) = match code.strip_suffix('\n') {
        Some(content) => (content, "\n"),
        None => (code, ""),
    };
    format!(
        "require.define({{\"{}\": function(require, exports, module) {{\n{}\n}}}});{}",
        module_id, content, trailing
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dividers_are_redrawn_to_width() {
        let code = "//------------\n    #-----------------------------------\nx = 1 // ----------";
        let out = normalize_dividers(code, 20);
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines[0], "//------------------");
        assert_eq!(lines[0].len(), 20);
        assert_eq!(lines[1], "    #---------------");
        assert_eq!(lines[1].len(), 20);
        assert_eq!(lines[2], "x = 1 // ----------");
    }

    #[test]
    fn test_short_dash_runs_are_not_dividers() {
        assert_eq!(normalize_dividers("// ---", 80), "// ---");
        assert_eq!(normalize_dividers("//-----", 80), "//-----");
    }

    #[test]
    fn test_class_sugar_member_comments() {
        let comments = vec![
            "//------".to_string(),
            "  // adds".to_string(),
            "".to_string(),
        ];
        assert_eq!(
            normalize_comments(&comments, DirectiveKind::Method, Dialect::ClassSugar),
            vec!["    #------", "      # adds", ""]
        );
        assert_eq!(
            normalize_comments(&comments, DirectiveKind::Function, Dialect::ClassSugar),
            vec!["#------", "  # adds", ""]
        );
        assert_eq!(
            normalize_comments(&comments, DirectiveKind::Method, Dialect::Prototype),
            comments
        );
    }

    #[test]
    fn test_transport_d_wrapper_keeps_final_newline() {
        assert_eq!(
            wrap_transport_d("var a = 1;\n", "lib/A"),
            "require.define({\"lib/A\": function(require, exports, module) {\nvar a = 1;\n}});\n"
        );
        assert_eq!(
            wrap_transport_d("var a = 1;", "A"),
            "require.define({\"A\": function(require, exports, module) {\nvar a = 1;\n}});"
        );
    }
}
