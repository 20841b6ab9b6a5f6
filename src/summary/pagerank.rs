// PageRank over a small dense weighted graph.
//
// Sentence graphs for one article have tens of nodes, so a dense adjacency
// matrix is simpler than a CSR layout and just as fast.

/// Power-iteration settings.
#[derive(Debug, Clone)]
pub struct PageRank {
    pub damping: f64,
    pub max_iterations: usize,
    /// Stop when the L1 change between iterations drops to this
    pub threshold: f64,
}

impl Default for PageRank {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            threshold: 1e-6,
        }
    }
}

impl PageRank {
    /// Scores for a symmetric weight matrix given as rows. Scores sum to 1.
    ///
    /// Nodes with no outgoing weight spread their mass evenly over all nodes.
    pub fn run(&self, weights: &[Vec<f64>]) -> Vec<f64> {
        let n = weights.len();
        if n == 0 {
            return Vec::new();
        }

        let totals: Vec<f64> = weights.iter().map(|row| row.iter().sum()).collect();
        let teleport = (1.0 - self.damping) / n as f64;

        let mut scores = vec![1.0 / n as f64; n];
        let mut next = vec![0.0; n];
        let mut delta = f64::MAX;
        let mut iterations = 0;

        while iterations < self.max_iterations && delta > self.threshold {
            iterations += 1;

            let dangling: f64 = scores
                .iter()
                .zip(&totals)
                .filter(|(_, t)| **t <= 0.0)
                .map(|(s, _)| s)
                .sum();
            next.fill(teleport + self.damping * dangling / n as f64);

            for (node, row) in weights.iter().enumerate() {
                if totals[node] <= 0.0 {
                    continue;
                }
                let share = self.damping * scores[node] / totals[node];
                for (neighbor, w) in row.iter().enumerate() {
                    next[neighbor] += share * w;
                }
            }

            delta = scores.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
            std::mem::swap(&mut scores, &mut next);
        }

        let sum: f64 = scores.iter().sum();
        if sum > 0.0 {
            scores.iter_mut().for_each(|s| *s /= sum);
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_scores_highest() {
        // 0 is connected to 1 and 2, which are not connected to each other.
        let w = vec![
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
        ];
        let scores = PageRank::default().run(&w);
        assert!((scores.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(scores[0] > scores[1]);
        assert!((scores[1] - scores[2]).abs() < 1e-9);
    }

    #[test]
    fn edgeless_graph_is_uniform() {
        let w = vec![vec![0.0; 4]; 4];
        let scores = PageRank::default().run(&w);
        for s in scores {
            assert!((s - 0.25).abs() < 1e-9);
        }
    }
}
