//! JSON-LD structured data.

use serde_json::Value;

use crate::error_handling::RuleError;
use crate::model::Finding;
use crate::utils::sanitize::sanitize_message;

use super::RuleContext;

pub const STRUCTURED_DATA: &str = "structured_data";

/// Evaluates each JSON-LD block on its own.
///
/// No blocks -> warn. Each block yields its own finding: valid JSON -> pass naming
/// the declared `@type`, invalid JSON -> fail naming the parse error. A malformed
/// block never hides the findings of the others.
pub fn check_json_ld(blocks: &[String]) -> Vec<Finding> {
    if blocks.is_empty() {
        return vec![Finding::warn(STRUCTURED_DATA, "No structured data (JSON-LD) found")];
    }

    blocks
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let position = index + 1;
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => {
                    let types = declared_types(&value);
                    let label = if types.is_empty() {
                        "unspecified type".to_string()
                    } else {
                        types.join(", ")
                    };
                    Finding::pass(
                        STRUCTURED_DATA,
                        format!("Valid JSON-LD block {position}: {label}"),
                    )
                    .with_list(types)
                }
                Err(err) => Finding::fail(
                    STRUCTURED_DATA,
                    format!("Invalid JSON-LD block {position}: parse error"),
                )
                .with_text(sanitize_message(&err.to_string())),
            }
        })
        .collect()
}

/// Collects `@type` values from a block, an array of blocks, or an `@graph`.
fn declared_types(value: &Value) -> Vec<String> {
    let mut types = Vec::new();
    collect_types(value, &mut types, 0);
    types
}

fn collect_types(value: &Value, out: &mut Vec<String>, depth: usize) {
    if depth > 2 {
        return;
    }
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_types(item, out, depth + 1)),
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(t)) => out.push(t.clone()),
                Some(Value::Array(ts)) => {
                    out.extend(ts.iter().filter_map(Value::as_str).map(str::to_string))
                }
                _ => {}
            }
            if let Some(graph) = map.get("@graph") {
                collect_types(graph, out, depth + 1);
            }
        }
        _ => {}
    }
}

pub(super) fn structured_data_rule(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleError> {
    Ok(check_json_ld(&ctx.document.json_ld))
}
