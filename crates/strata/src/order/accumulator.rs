/// Binary indexed tree over layer positions, counting edge endpoints.
///
/// Positions are 0-based on the outside and stored 1-based inside.
#[derive(Debug, Clone)]
pub struct AccumulatorTree {
    tree: Vec<usize>,
}

impl AccumulatorTree {
    pub fn new(size: usize) -> Self {
        Self {
            tree: vec![0; size + 1],
        }
    }

    pub fn size(&self) -> usize {
        self.tree.len() - 1
    }

    pub fn add_edge(&mut self, pos: usize) {
        let mut i = pos + 1;
        while i < self.tree.len() {
            self.tree[i] += 1;
            i += i & i.wrapping_neg();
        }
    }

    pub fn subtract_edge(&mut self, pos: usize) {
        let mut i = pos + 1;
        while i < self.tree.len() {
            self.tree[i] -= 1;
            i += i & i.wrapping_neg();
        }
    }

    /// Number of endpoints at positions `pos..=last`.
    pub fn count_edges(&self, pos: usize, last: usize) -> usize {
        if pos > last || pos >= self.size() {
            return 0;
        }
        let last = last.min(self.size() - 1);
        self.prefix(last + 1) - self.prefix(pos)
    }

    /// Sum over the first `n` positions.
    fn prefix(&self, n: usize) -> usize {
        let mut i = n;
        let mut sum = 0;
        while i > 0 {
            sum += self.tree[i];
            i -= i & i.wrapping_neg();
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_ranges() {
        let mut t = AccumulatorTree::new(6);
        for p in [0, 2, 2, 5] {
            t.add_edge(p);
        }
        assert_eq!(t.count_edges(0, 5), 4);
        assert_eq!(t.count_edges(1, 4), 2);
        assert_eq!(t.count_edges(3, 5), 1);
        assert_eq!(t.count_edges(4, 3), 0);
        t.subtract_edge(2);
        assert_eq!(t.count_edges(2, 2), 1);
    }
}
