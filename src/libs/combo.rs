/// Lazy cartesian product of a list of slices.
///
/// Yields one `Vec` per combination, holding one element of every slice in
/// slice order. The last slice varies fastest. If there are no slices, or any
/// slice is empty, nothing is yielded.
///
/// ```
/// use scafalign::libs::combo::CartesianProduct;
/// let a = [1, 2];
/// let b = [10, 20, 30];
/// let all: Vec<Vec<&i32>> = CartesianProduct::new(vec![&a[..], &b[..]]).collect();
/// assert_eq!(all.len(), 6);
/// assert_eq!(all[0], vec![&1, &10]);
/// assert_eq!(all[1], vec![&1, &20]);
/// assert_eq!(all[5], vec![&2, &30]);
/// ```
pub struct CartesianProduct<'a, T> {
    lists: Vec<&'a [T]>,
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'a, T> CartesianProduct<'a, T> {
    pub fn new(lists: Vec<&'a [T]>) -> Self {
        let exhausted = lists.is_empty() || lists.iter().any(|l| l.is_empty());
        Self {
            indices: vec![0; lists.len()],
            lists,
            exhausted,
        }
    }

    /// Number of combinations in the full product, saturating at `usize::MAX`.
    pub fn total(&self) -> usize {
        if self.lists.is_empty() {
            return 0;
        }
        self.lists
            .iter()
            .try_fold(1usize, |acc, l| acc.checked_mul(l.len()))
            .unwrap_or(usize::MAX)
    }
}

impl<'a, T> Iterator for CartesianProduct<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let item = self
            .indices
            .iter()
            .zip(&self.lists)
            .map(|(&i, list)| &list[i])
            .collect();

        // odometer step
        let mut pos = self.lists.len();
        loop {
            if pos == 0 {
                self.exhausted = true;
                break;
            }
            pos -= 1;
            self.indices[pos] += 1;
            if self.indices[pos] < self.lists[pos].len() {
                break;
            }
            self.indices[pos] = 0;
        }

        Some(item)
    }
}
