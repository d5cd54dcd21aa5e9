//! Tree Ensemble - XGBoost native JSON model
//!
//! Parses the document written by `Booster.save_model("*.json")` and scores
//! single rows. Only what inference and gain importance need is kept; every
//! other field in the document is ignored.
//!
//! Supported: `gbtree` and `dart` boosters, single-target objectives with an
//! identity, logistic or exponential link.

use serde::{Deserialize, Serialize};

use super::inference::InferenceError;

// ============================================================================
// ERRORS
// ============================================================================

/// Model document could not be turned into a usable booster
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelFormatError {
    #[error("invalid model JSON: {0}")]
    Json(String),

    #[error("unsupported booster (expected gbtree or dart)")]
    UnsupportedBooster,

    #[error("unsupported objective `{0}`")]
    UnsupportedObjective(String),

    #[error("multi-output models are not supported (num_class={num_class}, num_target={num_target})")]
    MultiOutput { num_class: u32, num_target: u32 },

    #[error("invalid learner parameter {name}={value:?}")]
    InvalidParam { name: &'static str, value: String },

    #[error("tree {tree} is malformed: {reason}")]
    MalformedTree { tree: usize, reason: String },
}

// ============================================================================
// DOCUMENT (serde view of the JSON file)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ModelDocument {
    learner: LearnerDoc,
    #[serde(default)]
    version: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct LearnerDoc {
    gradient_booster: GradientBoosterDoc,
    learner_model_param: LearnerModelParamDoc,
    objective: ObjectiveDoc,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name")]
enum GradientBoosterDoc {
    #[serde(rename = "gbtree")]
    GbTree { model: GbTreeModelDoc },

    #[serde(rename = "dart")]
    Dart {
        gbtree: DartInnerDoc,
        #[serde(default)]
        weight_drop: Vec<f64>,
    },

    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
struct DartInnerDoc {
    model: GbTreeModelDoc,
}

#[derive(Debug, Deserialize)]
struct GbTreeModelDoc {
    trees: Vec<TreeDoc>,
}

#[derive(Debug, Deserialize)]
struct LearnerModelParamDoc {
    base_score: String,
    #[serde(default)]
    num_class: Option<String>,
    #[serde(default)]
    num_feature: Option<String>,
    #[serde(default)]
    num_target: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectiveDoc {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TreeDoc {
    left_children: Vec<i32>,
    right_children: Vec<i32>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f64>,
    #[serde(default)]
    default_left: Vec<Flag>,
    #[serde(default)]
    loss_changes: Vec<f64>,
    /// 0 = numerical, 1 = categorical
    #[serde(default)]
    split_type: Vec<u8>,
}

/// `default_left` is 0/1 in recent releases, booleans in older ones
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(u8),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

// ============================================================================
// OBJECTIVE
// ============================================================================

/// Output transform applied to the summed margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Link {
    Identity,
    Logistic,
    Exp,
}

impl Link {
    pub fn from_objective(name: &str) -> Result<Self, ModelFormatError> {
        match name {
            "reg:squarederror" | "reg:linear" | "reg:squaredlogerror" | "reg:absoluteerror"
            | "reg:pseudohubererror" | "reg:quantileerror" => Ok(Link::Identity),
            "reg:logistic" | "binary:logistic" => Ok(Link::Logistic),
            "count:poisson" | "reg:gamma" | "reg:tweedie" => Ok(Link::Exp),
            other => Err(ModelFormatError::UnsupportedObjective(other.to_string())),
        }
    }

    /// Output space → margin space (used for base_score)
    fn to_margin(self, value: f64) -> f64 {
        match self {
            Link::Identity => value,
            Link::Logistic => -(1.0 / value - 1.0).ln(),
            Link::Exp => value.ln(),
        }
    }

    /// Margin space → output space
    fn transform(self, margin: f64) -> f64 {
        match self {
            Link::Identity => margin,
            Link::Logistic => 1.0 / (1.0 + (-margin).exp()),
            Link::Exp => margin.exp(),
        }
    }
}

// ============================================================================
// TREES
// ============================================================================

#[derive(Debug, Clone)]
struct Node {
    left: i32,
    right: i32,
    split_index: usize,
    /// Split threshold, or the leaf value when `left == -1`
    condition: f64,
    default_left: bool,
    gain: f64,
}

impl Node {
    fn is_leaf(&self) -> bool {
        self.left == -1
    }
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// `num_feature == 0` means the document did not record a width
    fn from_doc(index: usize, doc: TreeDoc, num_feature: usize) -> Result<Self, ModelFormatError> {
        let n = doc.left_children.len();
        let malformed = |reason: String| ModelFormatError::MalformedTree { tree: index, reason };

        if n == 0 {
            return Err(malformed("no nodes".to_string()));
        }
        if doc.right_children.len() != n
            || doc.split_indices.len() != n
            || doc.split_conditions.len() != n
        {
            return Err(malformed(format!(
                "array lengths differ (left={}, right={}, split_indices={}, split_conditions={})",
                n,
                doc.right_children.len(),
                doc.split_indices.len(),
                doc.split_conditions.len()
            )));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let left = doc.left_children[i];
            let right = doc.right_children[i];

            if left != -1 {
                for child in [left, right] {
                    if child <= 0 || child as usize >= n {
                        return Err(malformed(format!("node {} has child {} out of range", i, child)));
                    }
                }
            }

            let split_index = usize::try_from(doc.split_indices[i])
                .map_err(|_| malformed(format!("node {} has negative split index", i)))?;

            if left != -1 {
                if num_feature > 0 && split_index >= num_feature {
                    return Err(malformed(format!(
                        "node {} splits on column {} but the model has {} features",
                        i, split_index, num_feature
                    )));
                }
                if doc.split_type.get(i).copied().unwrap_or(0) != 0 {
                    return Err(malformed(format!("node {} is a categorical split", i)));
                }
            }

            nodes.push(Node {
                left,
                right,
                split_index,
                condition: doc.split_conditions[i],
                default_left: doc.default_left.get(i).map(|f| f.is_set()).unwrap_or(false),
                gain: doc.loss_changes.get(i).copied().unwrap_or(0.0),
            });
        }

        Ok(Self { nodes })
    }

    /// Leaf value reached by `row`.
    ///
    /// Inputs and thresholds compare as f32, the precision the trees were
    /// trained at.
    fn leaf_value(&self, index: usize, row: &[f64]) -> Result<f64, InferenceError> {
        let mut id = 0usize;

        // A valid tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..self.nodes.len() {
            let node = &self.nodes[id];
            if node.is_leaf() {
                return Ok(node.condition);
            }

            let value = *row
                .get(node.split_index)
                .ok_or_else(|| InferenceError::FeatureOutOfRange {
                    tree: index,
                    split_index: node.split_index,
                    row_len: row.len(),
                })?;

            let go_left = if value.is_nan() {
                node.default_left
            } else {
                (value as f32) < (node.condition as f32)
            };

            let next = if go_left { node.left } else { node.right };
            id = next as usize;
        }

        Err(InferenceError::TreeCycle { tree: index })
    }

    fn splits(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.is_leaf())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

// ============================================================================
// BOOSTER
// ============================================================================

/// Loaded tree ensemble
#[derive(Debug, Clone)]
pub struct Booster {
    trees: Vec<Tree>,
    tree_weights: Vec<f64>,
    base_score: f64,
    base_margin: f64,
    link: Link,
    objective: String,
    num_feature: usize,
    version: String,
}

impl Booster {
    /// Parse an XGBoost JSON model document
    pub fn from_json(json: &str) -> Result<Self, ModelFormatError> {
        let doc: ModelDocument =
            serde_json::from_str(json).map_err(|e| ModelFormatError::Json(e.to_string()))?;

        let learner = doc.learner;
        let params = learner.learner_model_param;

        let num_class = parse_count("num_class", params.num_class.as_deref(), 0)?;
        let num_target = parse_count("num_target", params.num_target.as_deref(), 1)?;
        if num_class > 1 || num_target > 1 {
            return Err(ModelFormatError::MultiOutput { num_class, num_target });
        }
        let num_feature = parse_count("num_feature", params.num_feature.as_deref(), 0)? as usize;

        let link = Link::from_objective(&learner.objective.name)?;
        let base_score = parse_base_score(&params.base_score)?;

        let (tree_docs, weights) = match learner.gradient_booster {
            GradientBoosterDoc::GbTree { model } => (model.trees, Vec::new()),
            GradientBoosterDoc::Dart { gbtree, weight_drop } => (gbtree.model.trees, weight_drop),
            GradientBoosterDoc::Unsupported => return Err(ModelFormatError::UnsupportedBooster),
        };

        let trees = tree_docs
            .into_iter()
            .enumerate()
            .map(|(i, t)| Tree::from_doc(i, t, num_feature))
            .collect::<Result<Vec<_>, _>>()?;

        let tree_weights = if weights.is_empty() {
            vec![1.0; trees.len()]
        } else if weights.len() == trees.len() {
            weights
        } else {
            return Err(ModelFormatError::InvalidParam {
                name: "weight_drop",
                value: format!("{} weights for {} trees", weights.len(), trees.len()),
            });
        };

        let version = doc
            .version
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(".");

        Ok(Self {
            trees,
            tree_weights,
            base_score,
            base_margin: link.to_margin(base_score),
            link,
            objective: learner.objective.name,
            num_feature,
            version,
        })
    }

    /// Score one row laid out in the model's column order
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, InferenceError> {
        let mut margin = self.base_margin;

        for (i, (tree, weight)) in self.trees.iter().zip(&self.tree_weights).enumerate() {
            margin += weight * tree.leaf_value(i, row)?;
        }

        Ok(self.link.transform(margin))
    }

    /// Normalized "gain" importance per column index.
    ///
    /// Average split gain per feature, scaled to sum to 1. Columns never used
    /// in a split score 0, as do splits on columns past `columns`. An
    /// ensemble without any split yields all zeros.
    pub fn gain_importance(&self, columns: usize) -> Vec<f64> {
        let mut total_gain = vec![0.0f64; columns];
        let mut split_count = vec![0u64; columns];

        for node in self.trees.iter().flat_map(|t| t.splits()) {
            if node.split_index < columns {
                total_gain[node.split_index] += node.gain;
                split_count[node.split_index] += 1;
            }
        }

        let mut scores: Vec<f64> = total_gain
            .iter()
            .zip(&split_count)
            .map(|(gain, count)| if *count > 0 { gain / *count as f64 } else { 0.0 })
            .collect();

        let sum: f64 = scores.iter().sum();
        if sum > 0.0 {
            scores.iter_mut().for_each(|s| *s /= sum);
        }

        scores
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn node_count(&self) -> usize {
        self.trees.iter().map(Tree::node_count).sum()
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn link(&self) -> Link {
        self.link
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    pub fn num_feature(&self) -> usize {
        self.num_feature
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

// ============================================================================
// PARAM PARSING
// ============================================================================

/// `base_score` is `"5E-1"` in 1.x/2.x and `"[5E-1]"` in 3.x
fn parse_base_score(raw: &str) -> Result<f64, ModelFormatError> {
    let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']');

    let mut parts = trimmed.split(',');
    let first = parts.next().unwrap_or_default().trim();
    if parts.next().is_some() {
        return Err(ModelFormatError::InvalidParam {
            name: "base_score",
            value: raw.to_string(),
        });
    }

    first.parse::<f64>().map_err(|_| ModelFormatError::InvalidParam {
        name: "base_score",
        value: raw.to_string(),
    })
}

fn parse_count(name: &'static str, raw: Option<&str>, default: u32) -> Result<u32, ModelFormatError> {
    match raw {
        None => Ok(default),
        Some(s) => s.trim().parse().map_err(|_| ModelFormatError::InvalidParam {
            name,
            value: s.to_string(),
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================
