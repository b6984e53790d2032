use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use esg_score::SchemaValidation;
use serde_json::Value;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::commands::score::load_schema;
use crate::util::read_json;

pub fn run(args: ValidateArgs) -> Result<()> {
    let schema = load_schema(args.schema_path.as_deref())?;
    let candidate: Value = read_json(&args.candidate_path)?;

    let validation = schema.validate(&candidate);
    info!(
        path = %args.candidate_path.display(),
        schema = %schema.name,
        violations = validation.violations.len(),
        "schema validation complete"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &validation)
            .context("failed to serialize validation json output")?;
        writeln!(output)?;
    } else {
        write_text_response(&mut output, &validation)?;
    }
    output.flush()?;

    if !validation.is_valid() {
        bail!(
            "{} failed schema validation against {}",
            args.candidate_path.display(),
            validation.schema
        );
    }
    Ok(())
}

fn write_text_response<W: Write>(output: &mut W, validation: &SchemaValidation) -> Result<()> {
    if validation.is_valid() {
        writeln!(output, "Schema validation passed ({})", validation.schema)?;
    } else {
        writeln!(output, "Schema validation failed: {}", validation.error_text())?;
    }
    Ok(())
}
