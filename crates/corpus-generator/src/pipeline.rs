//! Emission pipeline: writes one record per call.
//!
//! A pipeline is compiled once from a template layout. Each step writes the
//! literal before a reference, then the value its generation function
//! returns. A function that returns nothing leaves a dangling separator
//! behind, which is trimmed so the record stays well formed:
//!
//! ```text
//!   {"a":1,{{.labels}},"b":2}   labels empty  ──►  {"a":1,"b":2}
//!   {{{.labels}},"b":2}         labels empty  ──►  {"b":2}
//!   {"a":1,{{.labels}}}         labels empty  ──►  {"a":1}
//! ```

use crate::binder::{FieldBinder, GenerationFn};
use crate::error::GeneratorError;
use crate::state::GenerationState;
use crate::template::TemplateLayout;

struct Step {
    name: String,
    literal_before: Vec<u8>,
    generate: GenerationFn,
}

/// Compiled template ready for repeated emission.
pub struct EmissionPipeline {
    steps: Vec<Step>,
    trailing_literal: Vec<u8>,
}

impl EmissionPipeline {
    /// Bind every reference of the layout.
    ///
    /// Fails before any output on an unknown field or an unsatisfiable
    /// binding.
    pub fn compile(
        layout: &TemplateLayout,
        binder: &FieldBinder<'_>,
        state: &mut GenerationState,
    ) -> Result<Self, GeneratorError> {
        let mut steps = Vec::with_capacity(layout.references().len());
        for reference in layout.references() {
            let generate = binder.bind_reference(&reference.name, state)?;
            steps.push(Step {
                name: reference.name.clone(),
                literal_before: reference.literal_before.clone(),
                generate,
            });
        }

        tracing::debug!("Compiled emission pipeline with {} fields", steps.len());
        Ok(Self {
            steps,
            trailing_literal: layout.trailing_literal().to_vec(),
        })
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.name.as_str())
    }

    /// Append one record to `out` and advance to the next event.
    pub fn emit(
        &mut self,
        state: &mut GenerationState,
        out: &mut Vec<u8>,
    ) -> Result<(), GeneratorError> {
        state.begin_record();
        let floor = out.len();
        let mut after_empty = false;

        for step in self.steps.iter_mut() {
            write_literal(out, floor, &step.literal_before, after_empty);

            let value = (step.generate)(state)?;
            if value.is_empty() {
                trim_separator(out, floor);
                after_empty = true;
            } else {
                value.write_json(out)?;
                after_empty = false;
            }
        }

        write_literal(out, floor, &self.trailing_literal, after_empty);
        state.advance();
        Ok(())
    }
}

/// Write a literal. Right after an empty value at the start of a record or
/// container, its leading separator is dropped.
fn write_literal(out: &mut Vec<u8>, floor: usize, literal: &[u8], after_empty: bool) {
    if after_empty && opens_container(&out[floor..]) {
        let rest = literal.trim_ascii_start();
        let rest = rest.strip_prefix(b",").unwrap_or(rest);
        out.extend_from_slice(rest.trim_ascii_start());
    } else {
        out.extend_from_slice(literal);
    }
}

fn opens_container(record: &[u8]) -> bool {
    matches!(
        record.iter().rev().find(|b| !b.is_ascii_whitespace()),
        None | Some(b'{') | Some(b'[')
    )
}

/// Drop trailing whitespace and one `,` left before an empty value.
fn trim_separator(out: &mut Vec<u8>, floor: usize) {
    let mut end = out.len();
    while end > floor && out[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    if end > floor && out[end - 1] == b',' {
        end -= 1;
        while end > floor && out[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
    }
    out.truncate(end);
}
