//! Sleep quality classifiers and the JSON tree-ensemble model.

use serde::Deserialize;
use std::path::Path;

use crate::error::{ModelLoadError, PredictError};
use crate::model::FeatureVector;

/// A trained classifier mapping a feature vector to a class index.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<i64, PredictError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsemble {
    n_features: usize,
    classes: Vec<i64>,
    trees: Vec<Tree>,
}

#[derive(Debug, Clone, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

impl TreeEnsemble {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelLoadError> {
        let model: Self = serde_json::from_str(raw)?;
        model.validate()?;
        Ok(model)
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    fn validate(&self) -> Result<(), ModelLoadError> {
        if self.n_features != FeatureVector::LEN {
            return Err(ModelLoadError::invalid(format!(
                "model expects {} features, requests provide {}",
                self.n_features,
                FeatureVector::LEN
            )));
        }
        if self.classes.is_empty() {
            return Err(ModelLoadError::invalid("no classes"));
        }
        if self.trees.is_empty() {
            return Err(ModelLoadError::invalid("no trees"));
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelLoadError::invalid(format!("tree {t} has no nodes")));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= self.n_features {
                            return Err(ModelLoadError::invalid(format!(
                                "tree {t} node {i} splits on feature {feature}"
                            )));
                        }
                        if threshold.is_nan() {
                            return Err(ModelLoadError::invalid(format!(
                                "tree {t} node {i} has a NaN threshold"
                            )));
                        }
                        // Children after parents keeps every walk finite.
                        for child in [*left, *right] {
                            if child <= i || child >= tree.nodes.len() {
                                return Err(ModelLoadError::invalid(format!(
                                    "tree {t} node {i} has invalid child {child}"
                                )));
                            }
                        }
                    }
                    Node::Leaf { value } => {
                        if value.len() != self.classes.len() {
                            return Err(ModelLoadError::invalid(format!(
                                "tree {t} leaf {i} has {} weights for {} classes",
                                value.len(),
                                self.classes.len()
                            )));
                        }
                        let valid = value.iter().all(|w| w.is_finite() && *w >= 0.0);
                        if !valid || value.iter().sum::<f64>() <= 0.0 {
                            return Err(ModelLoadError::invalid(format!(
                                "tree {t} leaf {i} has invalid weights"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf<'a>(&self, tree: &'a Tree, x: &[f64]) -> &'a [f64] {
        let mut idx = 0;
        loop {
            match &tree.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if x[*feature] <= *threshold { *left } else { *right },
                Node::Leaf { value } => return value,
            }
        }
    }

    /// Mean class probabilities across all trees.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, PredictError> {
        let x = features.as_array();
        if let Some(index) = x.iter().position(|v| !v.is_finite()) {
            return Err(PredictError::NonFiniteFeature { index });
        }

        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let value = self.leaf(tree, &x);
            let total: f64 = value.iter().sum();
            for (p, w) in proba.iter_mut().zip(value) {
                *p += w / total;
            }
        }

        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        Ok(proba)
    }
}

impl Predictor for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<i64, PredictError> {
        let proba = self.predict_proba(features)?;

        let mut best = 0;
        for (k, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = k;
            }
        }
        Ok(self.classes[best])
    }
}
