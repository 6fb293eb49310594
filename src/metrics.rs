//! Partition comparison.
//!
//! Cluster labels are arbitrary names: two training runs that group records
//! identically may still number the groups differently, so runs are
//! compared by grouping, not by label value.
//!
//! ```rust
//! use hearth::metrics::same_partition;
//!
//! let first = [0, 0, 1, 1, 2];
//! let second = [2, 2, 0, 0, 1];
//! assert!(same_partition(&first, &second));
//! ```

use std::collections::HashMap;

/// Whether two labelings group items identically, up to renaming labels.
pub fn same_partition(a: &[usize], b: &[usize]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut forward: HashMap<usize, usize> = HashMap::new();
    let mut backward: HashMap<usize, usize> = HashMap::new();
    a.iter().zip(b).all(|(&x, &y)| {
        *forward.entry(x).or_insert(y) == y && *backward.entry(y).or_insert(x) == x
    })
}
