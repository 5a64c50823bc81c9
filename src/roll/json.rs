use super::tree::*;
use crate::common::{Int, UInt};
use serde_json::{json, Value as Json};
use std::collections::BTreeMap;

/// Structural JSON view of a result tree. Purely a transform of data the
/// tree already holds; nothing is re-rolled or recomputed.
pub(crate) fn to_json(node: &ResultNode) -> Json {
    match node {
        ResultNode::Number(x) => json!({
            "token": x.token,
            "node_type": "number",
            "result": x.value,
            "children": {},
            "meta": {},
        }),
        ResultNode::Dice(x) => json!({
            "token": x.token,
            "node_type": "dice",
            "result": x.total,
            "children": {},
            "meta": {
                "rolls": x.rolls.iter().copied().collect::<Vec<_>>(),
                "kept": face_counts(&x.kept),
                "dropped": face_counts(&x.dropped),
            },
        }),
        ResultNode::BinaryOp(x) => json!({
            "token": x.token,
            "node_type": "binary_op",
            "result": x.value,
            "children": {
                "left": to_json(&x.left),
                "right": to_json(&x.right),
            },
            "meta": { "operator": x.op.to_string() },
        }),
        ResultNode::List(x) => json!({
            "token": x.token,
            "node_type": "list",
            "result": x.value,
            "children": {
                "count_expression": to_json(&x.count),
                "loop_expression": x.items.iter().map(to_json).collect::<Vec<_>>(),
            },
            "meta": {},
        }),
        ResultNode::Sequence(x) => json!({
            "token": x.token,
            "node_type": "sequence",
            "result": x.value,
            "children": {
                "sequence": x.items.iter().map(to_json).collect::<Vec<_>>(),
            },
            "meta": {},
        }),
    }
}

// JSON object keys are strings, so faces are stringified.
fn face_counts(counts: &BTreeMap<Int, UInt>) -> Json {
    Json::Object(
        counts
            .iter()
            .map(|(face, n)| (face.to_string(), Json::from(*n)))
            .collect(),
    )
}
