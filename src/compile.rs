//! Module compiler: Scan → Segment → Compile → Assemble for one source file.

use serde::{Deserialize, Serialize};

use crate::codegen::{emit, Dialect, EmitContext, EmittedCode, ModuleFormat};
use crate::directive::{is_directive_candidate, recognize, Directive, DirectiveKind};
use crate::error::ScoopError;
use crate::finalize::{assemble, normalize_dividers, wrap_transport_d};
use crate::segment::segment;
use crate::transpile::BodyTranspiler;

pub const DEFAULT_DIVIDER_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    pub dialect: Dialect,
    pub module_format: ModuleFormat,
    /// Column width that divider comments are redrawn to.
    pub divider_width: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            dialect: Dialect::default(),
            module_format: ModuleFormat::default(),
            divider_width: DEFAULT_DIVIDER_WIDTH,
        }
    }
}

impl CompileOptions {
    pub fn validate(&self) -> Result<(), ScoopError> {
        if self.module_format == ModuleFormat::TransportD && self.dialect != Dialect::Prototype {
            return Err(ScoopError::InvalidOptions(format!(
                "Transport/D modules require the scooj dialect, not '{}'",
                self.dialect
            )));
        }
        Ok(())
    }

    /// A body transpiler converts JavaScript to class sugar and has nothing
    /// to do for prototype output.
    pub fn validate_transpiler(&self, has_transpiler: bool) -> Result<(), ScoopError> {
        if has_transpiler && !self.dialect.transpiles_bodies() {
            return Err(ScoopError::InvalidOptions(format!(
                "a body transpiler requires the coffee dialect, not '{}'",
                self.dialect
            )));
        }
        Ok(())
    }

    pub fn extension(&self) -> &'static str {
        self.dialect.extension(self.module_format)
    }
}

/// Per-file counters returned alongside the generated code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    pub directives: usize,
    pub transpile_failures: usize,
}

impl CompileStats {
    pub fn merge(&mut self, other: &CompileStats) {
        self.directives += other.directives;
        self.transpile_failures += other.transpile_failures;
    }
}

#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub code: String,
    pub stats: CompileStats,
}

/// Compile one scoop source file.
///
/// `file_id` names the file in diagnostics and doubles as the Transport/D
/// module id. Only an unknown directive (or a transpiler paired with the
/// prototype dialect) is fatal; transpile failures are counted in the
/// returned stats.
pub fn compile_module(
    source: &str,
    file_id: &str,
    options: &CompileOptions,
    transpiler: Option<&dyn BodyTranspiler>,
) -> Result<CompileOutput, ScoopError> {
    compile_named_module(source, file_id, file_id, options, transpiler)
}

/// [`compile_module`] with a module id distinct from the diagnostic file name.
pub fn compile_named_module(
    source: &str,
    file_id: &str,
    module_id: &str,
    options: &CompileOptions,
    transpiler: Option<&dyn BodyTranspiler>,
) -> Result<CompileOutput, ScoopError> {
    options.validate_transpiler(transpiler.is_some())?;

    let lines: Vec<String> = source.split('\n').map(str::to_string).collect();

    let mut directives = scan(&lines, file_id)?;
    let mut stats = CompileStats {
        directives: directives.len(),
        ..CompileStats::default()
    };

    if directives.is_empty() {
        tracing::debug!("{}: no directives found", file_id);
        return Ok(CompileOutput {
            code: source.to_string(),
            stats,
        });
    }

    segment(&lines, &mut directives);

    let order = emission_order(&directives, options.dialect);
    let emitted =
        compile_directives(&directives, &order, file_id, options, transpiler, &mut stats);

    let mut code = assemble(&directives, &emitted, options.dialect);
    code = normalize_dividers(&code, options.divider_width);
    if source.ends_with('\n') && !code.ends_with('\n') {
        code.push('\n');
    }

    if options.module_format == ModuleFormat::TransportD {
        code = wrap_transport_d(&code, module_id);
    }

    tracing::debug!(
        "{}: compiled {} directives ({} transpile failures)",
        file_id,
        stats.directives,
        stats.transpile_failures
    );

    Ok(CompileOutput { code, stats })
}

/// Recognize every directive line. Fails on the first unknown directive.
fn scan(lines: &[String], file_id: &str) -> Result<Vec<Directive>, ScoopError> {
    let mut directives = Vec::new();

    for (line_index, line) in lines.iter().enumerate() {
        if !is_directive_candidate(line) {
            continue;
        }

        let node = recognize(line).ok_or_else(|| ScoopError::UnknownDirective {
            file: file_id.to_string(),
            line_index,
            text: line.clone(),
        })?;

        if node.kind() == DirectiveKind::Static {
            tracing::info!(
                "{}:{}: the static directive is deprecated - use init instead",
                file_id,
                line_index + 1
            );
        }

        directives.push(Directive::new(node, line, line_index));
    }

    Ok(directives)
}

/// Indices of `directives` in the order they are written out.
fn emission_order(directives: &[Directive], dialect: Dialect) -> Vec<usize> {
    let indices = 0..directives.len();
    if !dialect.hoists_functions() {
        return indices.collect();
    }

    let is_function = |i: &usize| directives[*i].kind() == DirectiveKind::Function;
    let (functions, rest): (Vec<usize>, Vec<usize>) = indices.partition(is_function);
    rest.into_iter().chain(functions).collect()
}

fn compile_directives(
    directives: &[Directive],
    order: &[usize],
    file_id: &str,
    options: &CompileOptions,
    transpiler: Option<&dyn BodyTranspiler>,
    stats: &mut CompileStats,
) -> Vec<(usize, EmittedCode)> {
    // Ambient class follows source order, independent of emission order.
    let mut ambient: Vec<Option<&str>> = Vec::with_capacity(directives.len());
    let mut current: Option<&str> = None;
    for directive in directives {
        if let Some(name) = directive.node.class_name() {
            current = Some(name);
        }
        ambient.push(current);
    }

    let mut seen_class = false;
    let mut emitted = Vec::with_capacity(order.len());

    for (position, &index) in order.iter().enumerate() {
        let is_class = directives[index].kind() == DirectiveKind::Class;
        let ctx = EmitContext {
            dialect: options.dialect,
            file_id,
            is_first: position == 0,
            is_first_class: is_class && !seen_class,
            ambient_class: ambient[index],
        };
        seen_class |= is_class;

        emitted.push((index, emit(&directives[index], &ctx, transpiler, stats)));
    }

    emitted
}
