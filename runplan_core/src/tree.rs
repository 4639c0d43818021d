//! Indentation-driven step tree builder.
//!
//! Tokenized lines arrive flat; a `repeat:` line owns every following line
//! indented one level deeper. The builder walks the lines with a shared
//! cursor, so nested groups never copy the remaining input.

use crate::grammar::{self, KeywordKind};
use crate::tokenizer::ParsedLine;
use crate::types::{RepeatStep, WorkoutStep};
use crate::Result;

/// Build the step forest for a list of tokenized lines, starting at indent 0
pub fn build_step_tree(lines: &[ParsedLine]) -> Result<Vec<WorkoutStep>> {
    let (steps, _) = build(lines, 0, 0)?;
    Ok(steps)
}

/// Collect the steps at `expected_indent`, starting at line `start`.
///
/// Stops at the first line indented less than `expected_indent` (left for
/// the caller) or at the end of input. Returns the steps and the index of
/// the first unconsumed line.
pub fn build(
    lines: &[ParsedLine],
    start: usize,
    expected_indent: usize,
) -> Result<(Vec<WorkoutStep>, usize)> {
    let mut steps: Vec<WorkoutStep> = Vec::new();
    let mut i = start;

    while let Some(line) = lines.get(i) {
        if line.indent_level < expected_indent {
            break;
        }

        if line.indent_level > expected_indent {
            tracing::warn!(
                "Unexpected indentation at line {}: expected {}, got {}",
                i,
                expected_indent,
                line.indent_level
            );
            i += 1;
            continue;
        }

        match grammar::lookup_keyword(&line.keyword) {
            Some(KeywordKind::Note) => {
                attach_note(&mut steps, &line.value);
                i += 1;
            }
            Some(KeywordKind::Repeat) => {
                let iterations = match line.value.trim().parse::<u32>() {
                    Ok(n) => n,
                    Err(_) => {
                        tracing::warn!("Invalid repeat count: {}", line.value);
                        i += 1;
                        continue;
                    }
                };

                let (nested, next) = build(lines, i + 1, expected_indent + 1)?;
                if nested.is_empty() {
                    tracing::debug!("Dropping repeat group with no steps at line {}", i);
                } else {
                    steps.push(RepeatStep::new(iterations, nested)?.into());
                }
                i = next;
            }
            _ => {
                if let Some(step) = grammar::parse_step(line)? {
                    steps.push(step.into());
                }
                i += 1;
            }
        }
    }

    Ok((steps, i))
}

/// Attach a note line to the most recent sibling.
///
/// Repeat groups pass the note on to their last child.
fn attach_note(steps: &mut [WorkoutStep], value: &str) {
    let note = strip_quotes(value.trim());
    if note.is_empty() {
        tracing::debug!("Skipping empty note");
        return;
    }

    match steps.last_mut() {
        Some(WorkoutStep::Executable(step)) => {
            step.append_description(note);
            tracing::debug!("Attached note to step: {}", note);
        }
        Some(WorkoutStep::Repeat(repeat)) => match repeat.steps_mut().last_mut() {
            Some(WorkoutStep::Executable(step)) => {
                step.append_description(note);
                tracing::debug!("Attached note to nested step: {}", note);
            }
            _ => tracing::debug!("Dropping note after nested repeat: {}", note),
        },
        None => tracing::warn!("Note with no preceding step: {}", value),
    }
}

/// Remove one matching pair of outer `"` or `'` quotes
fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}
