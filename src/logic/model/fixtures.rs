//! Small XGBoost JSON documents for tests

use serde_json::{json, Value};
use std::path::Path;

use crate::logic::features::layout::FEATURE_LAYOUT;

/// Three-node tree splitting `feature < threshold`.
///
/// Missing values go right.
pub fn stump(feature: usize, threshold: f64, gain: f64, left: f64, right: f64) -> Value {
    stump_with_default(feature, threshold, gain, left, right, false)
}

fn stump_with_default(
    feature: usize,
    threshold: f64,
    gain: f64,
    left: f64,
    right: f64,
    default_left: bool,
) -> Value {
    json!({
        "base_weights": [0.0, left, right],
        "categories": [],
        "categories_nodes": [],
        "categories_segments": [],
        "categories_sizes": [],
        "default_left": [u8::from(default_left), 0, 0],
        "id": 0,
        "left_children": [1, -1, -1],
        "loss_changes": [gain, 0.0, 0.0],
        "parents": [2147483647, 0, 0],
        "right_children": [2, -1, -1],
        "split_conditions": [threshold, left, right],
        "split_indices": [feature, 0, 0],
        "split_type": [0, 0, 0],
        "sum_hessian": [10.0, 5.0, 5.0],
        "tree_param": {
            "num_deleted": "0",
            "num_feature": "7",
            "num_nodes": "3",
            "size_leaf_vector": "1"
        }
    })
}

pub fn model_with_trees(objective: &str, base_score: &str, trees: Vec<Value>) -> Value {
    let num_trees = trees.len();
    let iteration_indptr: Vec<usize> = (0..=num_trees).collect();
    let tree_info = vec![0; num_trees];

    json!({
        "learner": {
            "attributes": {},
            "feature_names": [],
            "feature_types": [],
            "gradient_booster": {
                "model": {
                    "gbtree_model_param": {
                        "num_parallel_tree": "1",
                        "num_trees": num_trees.to_string()
                    },
                    "iteration_indptr": iteration_indptr,
                    "tree_info": tree_info,
                    "trees": trees
                },
                "name": "gbtree"
            },
            "learner_model_param": {
                "base_score": base_score,
                "boost_from_average": "1",
                "num_class": "0",
                "num_feature": "7",
                "num_target": "1"
            },
            "objective": {
                "name": objective,
                "reg_loss_param": { "scale_pos_weight": "1" }
            }
        },
        "version": [2, 0, 3]
    })
}

/// base 10; TV < 100 → +1 / +3 (gain 10); Radio < 20 → -0.5 / +0.5 (gain 4)
pub fn model_document() -> Value {
    model_with_trees(
        "reg:squarederror",
        "[1.0E1]",
        vec![
            stump(0, 100.0, 10.0, 1.0, 3.0),
            stump_with_default(1, 20.0, 4.0, -0.5, 0.5, true),
        ],
    )
}

pub fn model_json() -> String {
    model_document().to_string()
}

/// Canonical feature order as a JSON array
pub fn feature_names_json() -> String {
    serde_json::to_string(FEATURE_LAYOUT).unwrap()
}

/// Write both artifacts under `dir`
pub fn write_artifacts(dir: &Path) {
    std::fs::write(dir.join(crate::constants::MODEL_FILE_NAME), model_json()).unwrap();
    std::fs::write(dir.join(crate::constants::FEATURE_NAMES_FILE_NAME), feature_names_json()).unwrap();
}
