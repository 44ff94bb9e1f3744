//! Codegen module for the scoop compiler
//!
//! Turns one segmented directive into target code: a header line (or lines),
//! the processed body, and a kind-dependent closing suffix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::compile::CompileStats;
use crate::directive::{Directive, DirectiveKind, DirectiveNode};
use crate::error::ScoopError;
use crate::super_calls::rewrite_super_calls;
use crate::transpile::{translated_body, wrap_body, BodyTranspiler};

// ═══════════════════════════════════════════════════════════════════════════════
// DIALECTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Target syntax of the generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// CommonJS module calling into the `scooj` runtime.
    #[default]
    Prototype,
    /// CoffeeScript `class` sugar.
    ClassSugar,
}

/// How prototype output is packaged as a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleFormat {
    #[default]
    CommonJs,
    /// CommonJS Transport/D: `require.define({id: function(require, exports, module) {...}})`.
    TransportD,
}

impl Dialect {
    pub fn extension(self, format: ModuleFormat) -> &'static str {
        match (self, format) {
            (Dialect::Prototype, ModuleFormat::CommonJs) => ".js",
            (Dialect::Prototype, ModuleFormat::TransportD) => ".transportd.js",
            (Dialect::ClassSugar, _) => ".coffee",
        }
    }

    /// Bodies are JavaScript; only class-sugar output converts them.
    pub fn transpiles_bodies(self) -> bool {
        matches!(self, Dialect::ClassSugar)
    }

    /// Class-sugar output has native `super`.
    pub fn rewrites_super_calls(self) -> bool {
        matches!(self, Dialect::Prototype)
    }

    /// The runtime's `defClass` already assigns `module.exports`.
    pub fn exports_first_class(self) -> bool {
        matches!(self, Dialect::ClassSugar)
    }

    /// Standalone functions are moved after the class so that they do not
    /// end the indented class body early.
    pub fn hoists_functions(self) -> bool {
        matches!(self, Dialect::ClassSugar)
    }

    fn body_indent(self, kind: DirectiveKind) -> &'static str {
        match (self, kind) {
            (Dialect::Prototype, _) => "",
            (Dialect::ClassSugar, DirectiveKind::Function) => "  ",
            (Dialect::ClassSugar, _) => "    ",
        }
    }

    fn prefix_prelude(self, header: &str) -> String {
        match self {
            Dialect::Prototype => format!("var scooj = require('scooj'); {}", header),
            Dialect::ClassSugar => format!("scooj = require('scooj')\n{}", header),
        }
    }

    fn placeholder(self, body: &[String], indent: &str) -> Vec<String> {
        let (open, close) = match self {
            Dialect::Prototype => ("/* FIXME compile error", "*/"),
            Dialect::ClassSugar => ("### FIXME compile error", "###"),
        };
        std::iter::once(open.to_string())
            .chain(body.iter().cloned())
            .chain(std::iter::once(close.to_string()))
            .map(|line| format!("{}{}", indent, line))
            .collect()
    }
}

impl FromStr for Dialect {
    type Err = ScoopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scooj" | "prototype" | "js" => Ok(Dialect::Prototype),
            "coffee" | "class-sugar" | "cs" => Ok(Dialect::ClassSugar),
            other => Err(ScoopError::InvalidOptions(format!(
                "unknown dialect '{}' (expected 'scooj' or 'coffee')",
                other
            ))),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Prototype => write!(f, "scooj"),
            Dialect::ClassSugar => write!(f, "coffee"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EMITTED CODE
// ═══════════════════════════════════════════════════════════════════════════════

/// Closing suffix of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Footer {
    /// Appended to the last body line, or its own line for an empty body.
    Inline(&'static str),
    /// Always its own line after the body.
    Line(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedCode {
    /// May span several lines.
    pub header: String,
    /// Processed body with the footer already placed.
    pub body: Vec<String>,
    pub footer: Option<Footer>,
}

/// Per-directive inputs that depend on its position in the file.
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    pub dialect: Dialect,
    pub file_id: &'a str,
    /// First directive in emission order; carries the runtime prelude.
    pub is_first: bool,
    pub is_first_class: bool,
    pub ambient_class: Option<&'a str>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// HEADERS
// ═══════════════════════════════════════════════════════════════════════════════

fn prototype_header(node: &DirectiveNode) -> (String, Option<Footer>) {
    const CLOSE_CALL: Option<Footer> = Some(Footer::Inline("});"));

    fn params_or_empty(params: &Option<String>) -> &str {
        params.as_deref().unwrap_or("()")
    }

    match node {
        DirectiveNode::Class {
            name,
            params,
            superclass,
        } => {
            let superclass = superclass
                .as_ref()
                .map(|s| format!("{}, ", s))
                .unwrap_or_default();
            (
                format!(
                    "var {} = scooj.defClass(module, {}function {}{} {{",
                    name,
                    superclass,
                    name,
                    params_or_empty(params)
                ),
                CLOSE_CALL,
            )
        }
        DirectiveNode::Mixin { name } => (format!("scooj.useMixin(module, {});", name), None),
        DirectiveNode::StaticMethod { name, params, .. } => (
            format!(
                "scooj.defStaticMethod(function {}{} {{",
                name,
                params_or_empty(params)
            ),
            CLOSE_CALL,
        ),
        DirectiveNode::StaticGetter { name } => (
            format!("scooj.defStaticGetter(function {}() {{", name),
            CLOSE_CALL,
        ),
        DirectiveNode::StaticSetter { name, params } => (
            format!("scooj.defStaticSetter(function {}{} {{", name, params),
            CLOSE_CALL,
        ),
        DirectiveNode::Method { name, params, .. } => (
            format!("scooj.defMethod(function {}{} {{", name, params_or_empty(params)),
            CLOSE_CALL,
        ),
        DirectiveNode::Getter { name } => {
            (format!("scooj.defGetter(function {}() {{", name), CLOSE_CALL)
        }
        DirectiveNode::Setter { name, params } => (
            format!("scooj.defSetter(function {}{} {{", name, params),
            CLOSE_CALL,
        ),
        DirectiveNode::Function { name, params } => (
            format!(
                "var {} = function {}{} {{",
                name,
                name,
                params_or_empty(params)
            ),
            Some(Footer::Inline("};")),
        ),
        DirectiveNode::Static => ("// static code run on first require()".to_string(), None),
        DirectiveNode::Init => (
            "/* FIXME init: needs implementation".to_string(),
            Some(Footer::Line("*/")),
        ),
        DirectiveNode::Require { path, alias } | DirectiveNode::RequireClass { path, alias } => (
            format!("var {} = require('{}');", import_alias(path, alias), path),
            None,
        ),
    }
}

fn class_sugar_header(node: &DirectiveNode) -> (String, Option<Footer>) {
    fn spaced(params: &Option<String>) -> String {
        params
            .as_ref()
            .map(|p| format!(" {}", p))
            .unwrap_or_default()
    }

    fn arrow(bound: bool) -> &'static str {
        if bound {
            "=>"
        } else {
            "->"
        }
    }

    let header = match node {
        DirectiveNode::Class {
            name,
            params,
            superclass,
        } => {
            let extends = superclass
                .as_ref()
                .map(|s| format!(" extends {}", s))
                .unwrap_or_default();
            format!(
                "class {}{}\n\n    constructor:{} ->",
                name,
                extends,
                spaced(params)
            )
        }
        DirectiveNode::Mixin { name } => format!("scooj.useMixin(module, {})", name),
        DirectiveNode::StaticMethod {
            name,
            params,
            bound,
        } => format!("    @{}:{} {}", name, spaced(params), arrow(*bound)),
        DirectiveNode::StaticGetter { name } => format!("    @__defineGetter__ '{}', ->", name),
        DirectiveNode::StaticSetter { name, params } => {
            format!("    @__defineSetter__ '{}', {} ->", name, params)
        }
        DirectiveNode::Method {
            name,
            params,
            bound,
        } => format!("    {}:{} {}", name, spaced(params), arrow(*bound)),
        DirectiveNode::Getter { name } => format!("    @::__defineGetter__ '{}', ->", name),
        DirectiveNode::Setter { name, params } => {
            format!("    @::__defineSetter__ '{}', {} ->", name, params)
        }
        DirectiveNode::Function { name, params } => match params {
            Some(p) => format!("{} = {} ->", name, p),
            None => format!("{} = ->", name),
        },
        DirectiveNode::Static => "# static code run on first require()".to_string(),
        DirectiveNode::Init => {
            return (
                "### FIXME init: needs implementation".to_string(),
                Some(Footer::Line("###")),
            )
        }
        DirectiveNode::Require { path, alias } | DirectiveNode::RequireClass { path, alias } => {
            format!("{} = require('{}')", import_alias(path, alias), path)
        }
    };
    (header, None)
}

/// Explicit alias, or the last segment of the module path.
pub fn import_alias(path: &str, alias: &Option<String>) -> String {
    match alias {
        Some(alias) => alias.clone(),
        None => path.rsplit('/').next().unwrap_or(path).to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EMISSION
// ═══════════════════════════════════════════════════════════════════════════════

/// Compile one directive.
///
/// Super-call rewriting and optional body transpilation happen here; a failed
/// transpile is counted in `stats` and replaced by a marked placeholder.
pub fn emit(
    directive: &Directive,
    ctx: &EmitContext<'_>,
    transpiler: Option<&dyn BodyTranspiler>,
    stats: &mut CompileStats,
) -> EmittedCode {
    let kind = directive.kind();

    let (mut header, footer) = match ctx.dialect {
        Dialect::Prototype => prototype_header(&directive.node),
        Dialect::ClassSugar => class_sugar_header(&directive.node),
    };

    if ctx.is_first_class && kind == DirectiveKind::Class && ctx.dialect.exports_first_class() {
        header = format!("module.exports = {}", header);
    }
    if ctx.is_first {
        header = ctx.dialect.prefix_prelude(&header);
    }

    let mut body = directive.body.clone();

    if kind.is_super_replaceable() && ctx.dialect.rewrites_super_calls() && !body.is_empty() {
        match ctx.ambient_class {
            Some(class_name) => {
                let rewritten =
                    rewrite_super_calls(&body.join("\n"), class_name, directive.node.method_name());
                body = rewritten.split('\n').map(str::to_string).collect();
            }
            None => tracing::warn!(
                "{}:{}: {:?} outside of a class; super calls left as written",
                ctx.file_id,
                directive.line_index + 1,
                kind
            ),
        }
    }

    if let Some(transpiler) = transpiler {
        if kind.has_function_body() && ctx.dialect.transpiles_bodies() {
            body = transpile_body(directive, &body, ctx, transpiler, stats);
        }
    }

    if let Some(footer) = footer {
        place_footer(&mut body, footer);
    }

    EmittedCode {
        header,
        body,
        footer,
    }
}

fn transpile_body(
    directive: &Directive,
    body: &[String],
    ctx: &EmitContext<'_>,
    transpiler: &dyn BodyTranspiler,
    stats: &mut CompileStats,
) -> Vec<String> {
    let indent = ctx.dialect.body_indent(directive.kind());
    let params = directive.node.params();
    let wrapped = wrap_body(&body.join("\n"), params);

    match transpiler.transpile(&wrapped, params) {
        Ok(lines) => translated_body(lines, indent),
        Err(e) => {
            stats.transpile_failures += 1;
            tracing::warn!(
                "{}:{}: compile error {}: {}",
                ctx.file_id,
                directive.line_index + 1,
                stats.transpile_failures,
                e
            );
            ctx.dialect.placeholder(body, indent)
        }
    }
}

/// Attach a footer to the body: appended to its last line, or a line of its
/// own when the body is empty.
pub fn place_footer(body: &mut Vec<String>, footer: Footer) {
    match footer {
        Footer::Inline(text) => match body.last_mut() {
            Some(last) => last.push_str(text),
            None => body.push(text.to_string()),
        },
        Footer::Line(text) => body.push(text.to_string()),
    }
}
