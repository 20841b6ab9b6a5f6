// Held-out metrics from a confusion matrix. Hoax is the positive class.

use serde::Serialize;

use crate::corpus::Label;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Valid articles flagged as hoax, over all valid articles
    pub fpr: f64,
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_count: usize,
}

impl ValidationMetrics {
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_count
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den > 0 {
        num as f64 / den as f64
    } else {
        0.0
    }
}

/// Compute metrics from predicted and true labels of equal length.
/// Extra entries in the longer slice are ignored.
pub fn compute_validation_metrics(predictions: &[Label], labels: &[Label]) -> ValidationMetrics {
    let (mut tp, mut fp, mut tn, mut fn_count) = (0, 0, 0, 0);

    for (pred, label) in predictions.iter().zip(labels) {
        match (pred, label) {
            (Label::Hoax, Label::Hoax) => tp += 1,
            (Label::Hoax, Label::Valid) => fp += 1,
            (Label::Valid, Label::Valid) => tn += 1,
            (Label::Valid, Label::Hoax) => fn_count += 1,
        }
    }

    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_count);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    ValidationMetrics {
        accuracy: ratio(tp + tn, tp + fp + tn + fn_count),
        precision,
        recall,
        f1,
        fpr: ratio(fp, fp + tn),
        tp,
        fp,
        tn,
        fn_count,
    }
}

/// Element-wise mean of several metric sets; counts are summed.
pub fn mean_metrics(folds: &[ValidationMetrics]) -> ValidationMetrics {
    if folds.is_empty() {
        return ValidationMetrics::default();
    }
    let n = folds.len() as f64;
    let mean = |f: fn(&ValidationMetrics) -> f64| folds.iter().map(f).sum::<f64>() / n;

    ValidationMetrics {
        accuracy: mean(|m| m.accuracy),
        precision: mean(|m| m.precision),
        recall: mean(|m| m.recall),
        f1: mean(|m| m.f1),
        fpr: mean(|m| m.fpr),
        tp: folds.iter().map(|m| m.tp).sum(),
        fp: folds.iter().map(|m| m.fp).sum(),
        tn: folds.iter().map(|m| m.tn).sum(),
        fn_count: folds.iter().map(|m| m.fn_count).sum(),
    }
}

impl std::fmt::Display for ValidationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "acc={:.4} prec={:.4} rec={:.4} f1={:.4} fpr={:.4} (tp={} fp={} tn={} fn={})",
            self.accuracy,
            self.precision,
            self.recall,
            self.f1,
            self.fpr,
            self.tp,
            self.fp,
            self.tn,
            self.fn_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Label::{Hoax as H, Valid as V};

    #[test]
    fn perfect_predictions() {
        let m = compute_validation_metrics(&[V, V, H, H], &[V, V, H, H]);
        assert!((m.accuracy - 1.0).abs() < 1e-9);
        assert!((m.f1 - 1.0).abs() < 1e-9);
        assert!(m.fpr.abs() < 1e-9);
    }

    #[test]
    fn mixed_confusion_counts() {
        // 3 TP, 1 FP, 2 TN, 1 FN
        let preds = [H, H, H, H, V, V, V];
        let labels = [H, H, H, V, V, V, H];
        let m = compute_validation_metrics(&preds, &labels);
        assert_eq!((m.tp, m.fp, m.tn, m.fn_count), (3, 1, 2, 1));
        assert!((m.accuracy - 5.0 / 7.0).abs() < 1e-9);
        assert!((m.precision - 0.75).abs() < 1e-9);
        assert!((m.fpr - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_is_all_zero() {
        let m = compute_validation_metrics(&[], &[]);
        assert_eq!(m, ValidationMetrics::default());
        assert_eq!(mean_metrics(&[]), ValidationMetrics::default());
    }

    #[test]
    fn mean_averages_rates_and_sums_counts() {
        let a = compute_validation_metrics(&[H, V], &[H, V]);
        let b = compute_validation_metrics(&[H, H], &[H, V]);
        let m = mean_metrics(&[a, b]);
        assert!((m.accuracy - 0.75).abs() < 1e-9);
        assert_eq!(m.tp, 2);
        assert_eq!(m.fp, 1);
    }
}
