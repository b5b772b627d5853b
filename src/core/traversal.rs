use crate::core::model_path::ModelPath;
use crate::core::value::{child_entries, is_branch};
use serde_json::Value;

/// A node path with the value found there at enumeration time.
#[derive(Debug, Clone, PartialEq)]
pub struct PathValuePair<'a> {
    pub path: ModelPath,
    pub value: &'a Value,
}

/// Every node reachable from `root`, root first, in pre-order with children
/// in entry order. Uses an explicit stack, so depth is bounded only by memory.
pub fn all_path_values(root: &Value) -> Vec<PathValuePair<'_>> {
    let mut out = Vec::new();
    let mut stack = vec![PathValuePair {
        path: ModelPath::root(),
        value: root,
    }];

    while let Some(pair) = stack.pop() {
        for (key, child) in child_entries(pair.value).into_iter().rev() {
            stack.push(PathValuePair {
                path: pair.path.child(key),
                value: child,
            });
        }
        out.push(pair);
    }

    out
}

/// Paths of every branch node, root first. This is the "expand all" set.
pub fn branch_paths(root: &Value) -> Vec<ModelPath> {
    all_path_values(root)
        .into_iter()
        .filter(|pair| is_branch(pair.value))
        .map(|pair| pair.path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enumerates_every_node_in_pre_order() {
        let root = json!({"a": {"b": 0, "c": [1, {"d": 2}]}});
        let pairs = all_path_values(&root);

        let paths: Vec<ModelPath> = pairs.iter().map(|pair| pair.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                ModelPath::root(),
                ModelPath::from(["a"]),
                ModelPath::from(["a", "b"]),
                ModelPath::from(["a", "c"]),
                ModelPath::from(["a", "c", "0"]),
                ModelPath::from(["a", "c", "1"]),
                ModelPath::from(["a", "c", "1", "d"]),
            ]
        );

        let values: Vec<&Value> = pairs.iter().map(|pair| pair.value).collect();
        assert_eq!(values[0], &root);
        assert_eq!(values[1], &json!({"b": 0, "c": [1, {"d": 2}]}));
        assert_eq!(values[2], &json!(0));
        assert_eq!(values[3], &json!([1, {"d": 2}]));
        assert_eq!(values[4], &json!(1));
        assert_eq!(values[5], &json!({"d": 2}));
        assert_eq!(values[6], &json!(2));
    }

    #[test]
    fn scalar_root_yields_single_pair() {
        let root = json!("only");
        let pairs = all_path_values(&root);
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].path.is_root());
        assert_eq!(pairs[0].value, &root);
    }

    #[test]
    fn branch_paths_skip_leaves_and_empty_containers() {
        let root = json!({"a": {"b": []}, "c": [1], "d": {}});
        assert_eq!(
            branch_paths(&root),
            vec![
                ModelPath::root(),
                ModelPath::from(["a"]),
                ModelPath::from(["c"]),
            ]
        );
    }
}
