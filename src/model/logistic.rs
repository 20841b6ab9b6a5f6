// Binary logistic regression over sparse TF-IDF rows.
//
// Fitted with full-batch gradient descent on the mean log-loss plus an L2
// penalty of ||w||² / (2·C·n). The intercept is not penalized. Inputs are
// L2-normalized, which bounds the loss curvature and lets a unit step size
// converge without a line search.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ModelError, SparseVector};
use crate::corpus::Label;

/// Optimizer settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticConfig {
    /// Inverse regularization strength; larger means weaker penalty
    pub c: f64,
    pub learning_rate: f64,
    pub max_iter: usize,
    /// Stop once the gradient's L2 norm drops below this
    pub tolerance: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            learning_rate: 1.0,
            max_iter: 1000,
            tolerance: 1e-4,
        }
    }
}

/// A fitted binary classifier. Class 1 is `Label::Hoax`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    intercept: f64,
    /// Iterations the optimizer ran
    iterations: usize,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    /// Fit on sparse rows with `n_features` columns.
    pub fn fit(
        rows: &[SparseVector],
        labels: &[Label],
        n_features: usize,
        config: &LogisticConfig,
    ) -> Result<Self, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if rows.len() != labels.len() {
            return Err(ModelError::LengthMismatch {
                samples: rows.len(),
                labels: labels.len(),
            });
        }
        if let Some(only) = single_class(labels) {
            return Err(ModelError::SingleClass(only));
        }

        let n = rows.len() as f64;
        let targets: Vec<f64> = labels.iter().map(|l| f64::from(l.as_u8())).collect();
        let penalty = 1.0 / (config.c * n);

        let mut weights = vec![0.0; n_features];
        let mut intercept = 0.0;
        let mut grad = vec![0.0; n_features];
        let mut iterations = 0;

        for iter in 0..config.max_iter {
            iterations = iter + 1;
            grad.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_intercept = 0.0;

            for (x, y) in rows.iter().zip(&targets) {
                let residual = sigmoid(x.dot(&weights) + intercept) - y;
                for (i, v) in x.iter() {
                    grad[i] += residual * v;
                }
                grad_intercept += residual;
            }

            let mut norm_sq = 0.0;
            for (g, w) in grad.iter_mut().zip(&weights) {
                *g = *g / n + penalty * w;
                norm_sq += *g * *g;
            }
            grad_intercept /= n;
            norm_sq += grad_intercept * grad_intercept;

            if norm_sq.sqrt() < config.tolerance {
                debug!(iterations, "Logistic regression converged");
                break;
            }

            for (w, g) in weights.iter_mut().zip(&grad) {
                *w -= config.learning_rate * g;
            }
            intercept -= config.learning_rate * grad_intercept;
        }

        info!(
            samples = rows.len(),
            features = n_features,
            iterations,
            "Fitted logistic regression"
        );

        Ok(Self {
            weights,
            intercept,
            iterations,
        })
    }

    /// Raw decision value w·x + b. Positive means hoax.
    pub fn decision(&self, x: &SparseVector) -> f64 {
        x.dot(&self.weights) + self.intercept
    }

    /// Probability of the hoax class.
    pub fn predict_proba(&self, x: &SparseVector) -> f64 {
        sigmoid(self.decision(x))
    }

    pub fn predict(&self, x: &SparseVector) -> Label {
        if self.decision(x) > 0.0 {
            Label::Hoax
        } else {
            Label::Valid
        }
    }

    /// Per-feature weights. Positive weights push toward hoax.
    pub fn coefficients(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

fn single_class(labels: &[Label]) -> Option<Label> {
    let first = *labels.first()?;
    labels.iter().all(|l| *l == first).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TfIdfVectorizer;

    fn toy() -> (TfIdfVectorizer, Vec<SparseVector>, Vec<Label>) {
        let texts = [
            "vaksin chip rahasia sebar",
            "chip rahasia bahaya sebar",
            "rahasia vaksin bahaya",
            "menteri resmi umum jadwal",
            "resmi umum data jadwal",
            "menteri data resmi",
        ];
        let labels = vec![
            Label::Hoax,
            Label::Hoax,
            Label::Hoax,
            Label::Valid,
            Label::Valid,
            Label::Valid,
        ];
        let v = TfIdfVectorizer::fit(&texts).unwrap();
        let rows = v.transform_batch(&texts);
        (v, rows, labels)
    }

    #[test]
    fn separates_toy_classes() {
        let (v, rows, labels) = toy();
        let model =
            LogisticRegression::fit(&rows, &labels, v.vocabulary_size(), &LogisticConfig::default())
                .unwrap();

        for (x, y) in rows.iter().zip(&labels) {
            assert_eq!(model.predict(x), *y);
        }
        let hoaxy = model.coefficients()[v.index_of("rahasia").unwrap()];
        let valid = model.coefficients()[v.index_of("resmi").unwrap()];
        assert!(hoaxy > 0.0);
        assert!(valid < 0.0);
    }

    #[test]
    fn probability_matches_decision_sign() {
        let (v, rows, labels) = toy();
        let model =
            LogisticRegression::fit(&rows, &labels, v.vocabulary_size(), &LogisticConfig::default())
                .unwrap();
        for x in &rows {
            let p = model.predict_proba(x);
            assert!((0.0..=1.0).contains(&p));
            assert_eq!(p > 0.5, model.decision(x) > 0.0);
        }
    }

    #[test]
    fn rejects_single_class() {
        let (v, rows, _) = toy();
        let labels = vec![Label::Valid; rows.len()];
        assert_eq!(
            LogisticRegression::fit(&rows, &labels, v.vocabulary_size(), &LogisticConfig::default()),
            Err(ModelError::SingleClass(Label::Valid))
        );
    }

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }
}
