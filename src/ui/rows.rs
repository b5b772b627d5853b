use crate::core::ROOT_NODE_KEY;
use crate::core::model_path::ModelPath;
use crate::core::traversal::all_path_values;
use crate::core::value::{ValueKind, is_branch, to_display_string};
use crate::state::expansion::ExpansionMap;
use serde_json::Value;

/// One line of the tree as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    /// Canonical path-key; also the identifier scroll requests refer to.
    pub id: String,
    pub path: ModelPath,
    pub depth: usize,
    pub label: String,
    pub display: String,
    pub kind: ValueKind,
    pub has_children: bool,
    pub expanded: bool,
}

/// Rows whose ancestors are all expanded, in document order. The root row is
/// always present.
pub fn visible_rows(root: &Value, expansion: &ExpansionMap) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    let mut expand_stack: Vec<bool> = Vec::new();
    let mut collapsed_ancestors = 0usize;

    for pair in all_path_values(root) {
        let depth = pair.path.len();
        while expand_stack.len() > depth {
            if let Some(expanded) = expand_stack.pop()
                && !expanded
            {
                collapsed_ancestors = collapsed_ancestors.saturating_sub(1);
            }
        }

        let id = pair.path.key();
        let has_children = is_branch(pair.value);
        let expanded = has_children && expansion.is_key_expanded(&id);

        if collapsed_ancestors == 0 {
            rows.push(TreeRow {
                label: pair.path.last().unwrap_or(ROOT_NODE_KEY).to_string(),
                display: row_display(pair.value),
                kind: ValueKind::of(pair.value),
                id,
                path: pair.path,
                depth,
                has_children,
                expanded,
            });
        }

        expand_stack.push(expanded);
        if !expanded {
            collapsed_ancestors += 1;
        }
    }

    rows
}

fn row_display(value: &Value) -> String {
    match value {
        Value::Object(map) if !map.is_empty() => format!("{{{}}}", map.len()),
        Value::Array(items) if !items.is_empty() => format!("[{}]", items.len()),
        other => to_display_string(other),
    }
}
