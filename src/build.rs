//! Batch driver: compiles every input file and writes the generated modules.
//!
//! Files are compiled in parallel into memory first. Results are then checked
//! in input order, so the first fatal error (in that order) aborts the batch
//! before a single output file is written.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::IncrementalCache;
use crate::compile::{compile_named_module, CompileOptions, CompileOutput, CompileStats};
use crate::discovery::{discover_inputs, SourceFile};
use crate::error::ScoopError;
use crate::transpile::{BodyTranspiler, CommandTranspiler};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Root of the generated module tree.
    pub out_dir: PathBuf,
    /// Skip outputs whose source and options are unchanged since the last run.
    pub incremental: bool,
    /// External body transpiler, e.g. `js2coffee`.
    pub transpiler_command: Option<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            out_dir: PathBuf::from("."),
            incremental: false,
            transpiler_command: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedModule {
    pub module_id: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats: CompileStats,
    /// False when an incremental build found the output already current.
    pub written: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub modules: Vec<GeneratedModule>,
    pub totals: CompileStats,
    /// Body transpile failures across all modules.
    pub compile_errors: usize,
}

/// Compile `inputs` (files or directories), using the configured transpiler
/// command if any.
pub fn build(
    inputs: &[PathBuf],
    options: &CompileOptions,
    build_options: &BuildOptions,
) -> Result<BuildReport, ScoopError> {
    let transpiler = match build_options.transpiler_command.as_deref() {
        Some(command) => Some(CommandTranspiler::from_command_line(command).ok_or_else(|| {
            ScoopError::InvalidOptions("empty transpiler command".to_string())
        })?),
        None => None,
    };

    build_with_transpiler(
        inputs,
        options,
        build_options,
        transpiler.as_ref().map(|t| t as &dyn BodyTranspiler),
    )
}

/// Like [`build`], with an explicitly supplied body transpiler.
pub fn build_with_transpiler(
    inputs: &[PathBuf],
    options: &CompileOptions,
    build_options: &BuildOptions,
    transpiler: Option<&dyn BodyTranspiler>,
) -> Result<BuildReport, ScoopError> {
    options.validate()?;
    options.validate_transpiler(transpiler.is_some())?;
    let files = discover_inputs(inputs)?;
    tracing::debug!("compiling {} files as {}", files.len(), options.dialect);

    let results: Vec<Result<(String, CompileOutput), ScoopError>> = files
        .par_iter()
        .map(|file| compile_file(file, options, transpiler))
        .collect();

    let mut compiled = Vec::with_capacity(results.len());
    for (file, result) in files.iter().zip(results) {
        let (source, output) = result?;
        compiled.push((file, source, output));
    }

    let mut cache = build_options
        .incremental
        .then(|| IncrementalCache::load(&build_options.out_dir));
    let mut report = BuildReport::default();

    for (file, source, output) in compiled {
        let output_path = file.output_path(&build_options.out_dir, options.extension());
        let hash = IncrementalCache::compute_hash(&source, options);

        let fresh = cache
            .as_ref()
            .is_some_and(|cache| cache.is_fresh(&output_path, &hash));

        if fresh {
            tracing::debug!("{} is up to date", output_path.display());
        } else {
            write_module(&output_path, &output.code)?;
            tracing::info!(
                "generated module {} in {}",
                file.module_id(),
                output_path.display()
            );
        }

        if let Some(cache) = cache.as_mut() {
            cache.record(&output_path, hash);
        }

        report.totals.merge(&output.stats);
        report.compile_errors = report.totals.transpile_failures;
        report.modules.push(GeneratedModule {
            module_id: file.module_id(),
            input: file.path.clone(),
            output: output_path,
            stats: output.stats,
            written: !fresh,
        });
    }

    if let Some(cache) = cache {
        cache
            .save()
            .map_err(|e| ScoopError::io(build_options.out_dir.clone(), e))?;
    }

    Ok(report)
}

fn compile_file(
    file: &SourceFile,
    options: &CompileOptions,
    transpiler: Option<&dyn BodyTranspiler>,
) -> Result<(String, CompileOutput), ScoopError> {
    let source = fs::read_to_string(&file.path).map_err(|e| ScoopError::io(&file.path, e))?;
    let file_id = file.path.to_string_lossy();
    let output = compile_named_module(&source, &file_id, &file.module_id(), options, transpiler)?;
    Ok((source, output))
}

fn write_module(path: &Path, code: &str) -> Result<(), ScoopError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ScoopError::io(parent, e))?;
    }
    fs::write(path, code).map_err(|e| ScoopError::io(path, e))
}
