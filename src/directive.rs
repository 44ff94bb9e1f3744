//! Directive Module for the scoop compiler
//!
//! Recognizes DSL directive lines and holds the typed directive nodes that the
//! rest of the pipeline segments, emits and assembles.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

// ═══════════════════════════════════════════════════════════════════════════════
// DIRECTIVE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Class,
    Mixin,
    StaticMethod,
    StaticGetter,
    StaticSetter,
    Method,
    Getter,
    Setter,
    Function,
    Static,
    Init,
    Require,
    RequireClass,
}

impl DirectiveKind {
    /// Members live inside the most recent class body.
    pub fn is_member(self) -> bool {
        matches!(
            self,
            DirectiveKind::StaticMethod
                | DirectiveKind::StaticGetter
                | DirectiveKind::StaticSetter
                | DirectiveKind::Method
                | DirectiveKind::Getter
                | DirectiveKind::Setter
        )
    }

    /// Kinds whose body is the body of an emitted function.
    pub fn has_function_body(self) -> bool {
        self.is_member() || matches!(self, DirectiveKind::Class | DirectiveKind::Function)
    }

    /// Kinds whose bodies get `super` calls rewritten.
    pub fn is_super_replaceable(self) -> bool {
        matches!(
            self,
            DirectiveKind::Class
                | DirectiveKind::Method
                | DirectiveKind::Getter
                | DirectiveKind::Setter
        )
    }
}

/// One recognized directive line with its captured fields.
///
/// Parameter lists keep their surrounding parentheses, e.g. `"(x, y)"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveNode {
    Class {
        name: String,
        params: Option<String>,
        superclass: Option<String>,
    },
    Mixin {
        name: String,
    },
    StaticMethod {
        name: String,
        params: Option<String>,
        bound: bool,
    },
    StaticGetter {
        name: String,
    },
    StaticSetter {
        name: String,
        params: String,
    },
    Method {
        name: String,
        params: Option<String>,
        bound: bool,
    },
    Getter {
        name: String,
    },
    Setter {
        name: String,
        params: String,
    },
    Function {
        name: String,
        params: Option<String>,
    },
    Static,
    Init,
    Require {
        path: String,
        alias: Option<String>,
    },
    RequireClass {
        path: String,
        alias: Option<String>,
    },
}

impl DirectiveNode {
    pub fn kind(&self) -> DirectiveKind {
        match self {
            DirectiveNode::Class { .. } => DirectiveKind::Class,
            DirectiveNode::Mixin { .. } => DirectiveKind::Mixin,
            DirectiveNode::StaticMethod { .. } => DirectiveKind::StaticMethod,
            DirectiveNode::StaticGetter { .. } => DirectiveKind::StaticGetter,
            DirectiveNode::StaticSetter { .. } => DirectiveKind::StaticSetter,
            DirectiveNode::Method { .. } => DirectiveKind::Method,
            DirectiveNode::Getter { .. } => DirectiveKind::Getter,
            DirectiveNode::Setter { .. } => DirectiveKind::Setter,
            DirectiveNode::Function { .. } => DirectiveKind::Function,
            DirectiveNode::Static => DirectiveKind::Static,
            DirectiveNode::Init => DirectiveKind::Init,
            DirectiveNode::Require { .. } => DirectiveKind::Require,
            DirectiveNode::RequireClass { .. } => DirectiveKind::RequireClass,
        }
    }

    /// Class name introduced by this directive, if it is a class.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            DirectiveNode::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Method context for super rewriting. Constructors have none.
    pub fn method_name(&self) -> Option<&str> {
        match self {
            DirectiveNode::StaticMethod { name, .. }
            | DirectiveNode::StaticGetter { name }
            | DirectiveNode::StaticSetter { name, .. }
            | DirectiveNode::Method { name, .. }
            | DirectiveNode::Getter { name }
            | DirectiveNode::Setter { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Parameter list handed to the body transpiler. Empty when absent.
    pub fn params(&self) -> &str {
        match self {
            DirectiveNode::Class { params, .. }
            | DirectiveNode::StaticMethod { params, .. }
            | DirectiveNode::Method { params, .. }
            | DirectiveNode::Function { params, .. } => params.as_deref().unwrap_or(""),
            DirectiveNode::StaticSetter { params, .. } | DirectiveNode::Setter { params, .. } => {
                params
            }
            _ => "",
        }
    }
}

/// A directive plus the source ranges assigned to it.
#[derive(Debug, Clone)]
pub struct Directive {
    pub node: DirectiveNode,
    pub source_line: String,
    pub line_index: usize,
    pub comments: Vec<String>,
    pub body: Vec<String>,
}

impl Directive {
    pub fn new(node: DirectiveNode, source_line: &str, line_index: usize) -> Self {
        Directive {
            node,
            source_line: source_line.to_string(),
            line_index,
            comments: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn kind(&self) -> DirectiveKind {
        self.node.kind()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PATTERN TABLE
// ═══════════════════════════════════════════════════════════════════════════════

lazy_static! {
    /// Lines starting with one of these characters at column 0 are directive
    /// candidates. Everything else is comment or body text.
    static ref CANDIDATE_RE: Regex = Regex::new(r"^[\w$._@]+").unwrap();

    /// Ordered most-specific first. The `static ...` forms must precede the
    /// bare `static` pattern and `requireClass` can never be taken for
    /// `require` because the latter needs whitespace after the keyword.
    static ref PATTERNS: Vec<(DirectiveKind, Regex)> = vec![
        (
            DirectiveKind::Class,
            Regex::new(r"^class\s+([\w$]+)\s*(\(.*\))?\s*(<\s*(\S+))?\s*$").unwrap(),
        ),
        (DirectiveKind::Mixin, Regex::new(r"^mixin\s+(\S+)\s*$").unwrap()),
        (
            DirectiveKind::StaticMethod,
            Regex::new(r"^static\s+(bind\s+)?method\s+([\w$]+)\s*(\(.*\))?\s*$").unwrap(),
        ),
        (
            DirectiveKind::StaticGetter,
            Regex::new(r"^static\s+getter\s+([\w$]+)\s*$").unwrap(),
        ),
        (
            DirectiveKind::StaticSetter,
            Regex::new(r"^static\s+setter\s+([\w$]+)\s*(\(.*\))\s*$").unwrap(),
        ),
        (
            DirectiveKind::Method,
            Regex::new(r"^(bind\s+)?method\s+([\w$]+)\s*(\(.*\))?\s*$").unwrap(),
        ),
        (DirectiveKind::Getter, Regex::new(r"^getter\s+([\w$]+)\s*$").unwrap()),
        (
            DirectiveKind::Setter,
            Regex::new(r"^setter\s+([\w$]+)\s*(\(.*\))\s*$").unwrap(),
        ),
        (
            DirectiveKind::Function,
            Regex::new(r"^function\s+([\w$]+)\s*(\(.*\))?\s*$").unwrap(),
        ),
        (DirectiveKind::Static, Regex::new(r"^static\s*$").unwrap()),
        (DirectiveKind::Init, Regex::new(r"^init\s*$").unwrap()),
        (
            DirectiveKind::Require,
            Regex::new(r"^require\s+([\w$.\-/]+)(\s+as\s+([\w$.\-]+))?\s*$").unwrap(),
        ),
        (
            DirectiveKind::RequireClass,
            Regex::new(r"^requireClass\s+([\w$.\-/]+)(\s+as\s+([\w$.\-]+))?\s*$").unwrap(),
        ),
    ];
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECOGNITION
// ═══════════════════════════════════════════════════════════════════════════════

/// Whether the line starts with an identifier-like token at column 0.
pub fn is_directive_candidate(line: &str) -> bool {
    CANDIDATE_RE.is_match(line)
}

/// Classify a line against the ordered pattern table.
///
/// Returns the first structural match. Callers decide whether a candidate
/// with no match is fatal.
pub fn recognize(line: &str) -> Option<DirectiveNode> {
    PATTERNS
        .iter()
        .find_map(|(kind, re)| re.captures(line).map(|caps| build_node(*kind, &caps)))
}

fn group(caps: &Captures, index: usize) -> Option<String> {
    caps.get(index).map(|m| m.as_str().to_string())
}

fn required(caps: &Captures, index: usize) -> String {
    group(caps, index).unwrap_or_default()
}

fn build_node(kind: DirectiveKind, caps: &Captures) -> DirectiveNode {
    match kind {
        DirectiveKind::Class => DirectiveNode::Class {
            name: required(caps, 1),
            params: group(caps, 2),
            superclass: group(caps, 4),
        },
        DirectiveKind::Mixin => DirectiveNode::Mixin {
            name: required(caps, 1),
        },
        DirectiveKind::StaticMethod => DirectiveNode::StaticMethod {
            name: required(caps, 2),
            params: group(caps, 3),
            bound: caps.get(1).is_some(),
        },
        DirectiveKind::StaticGetter => DirectiveNode::StaticGetter {
            name: required(caps, 1),
        },
        DirectiveKind::StaticSetter => DirectiveNode::StaticSetter {
            name: required(caps, 1),
            params: required(caps, 2),
        },
        DirectiveKind::Method => DirectiveNode::Method {
            name: required(caps, 2),
            params: group(caps, 3),
            bound: caps.get(1).is_some(),
        },
        DirectiveKind::Getter => DirectiveNode::Getter {
            name: required(caps, 1),
        },
        DirectiveKind::Setter => DirectiveNode::Setter {
            name: required(caps, 1),
            params: required(caps, 2),
        },
        DirectiveKind::Function => DirectiveNode::Function {
            name: required(caps, 1),
            params: group(caps, 2),
        },
        DirectiveKind::Static => DirectiveNode::Static,
        DirectiveKind::Init => DirectiveNode::Init,
        DirectiveKind::Require => DirectiveNode::Require {
            path: required(caps, 1),
            alias: group(caps, 3),
        },
        DirectiveKind::RequireClass => DirectiveNode::RequireClass {
            path: required(caps, 1),
            alias: group(caps, 3),
        },
    }
}
