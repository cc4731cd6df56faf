use std::collections::HashMap;
use std::hash::Hash;

/// Ranks every candidate in one pass over the sorted scores.
///
/// Higher scores rank first. Equal scores share a rank, and each rank is
/// one more than the number of candidates with a strictly higher score,
/// so `[30, 30, 25, 10]` ranks as `[1, 1, 3, 4]`.
pub fn dense_ranks<K, S>(candidates: impl IntoIterator<Item = (K, S)>) -> HashMap<K, u32>
where
    K: Eq + Hash,
    S: Ord + Copy,
{
    let mut sorted: Vec<(K, S)> = candidates.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    let mut ranks = HashMap::with_capacity(sorted.len());
    let mut rank = 0;
    let mut last_score = None;
    for (position, (key, score)) in sorted.into_iter().enumerate() {
        if last_score != Some(score) {
            rank = position as u32 + 1;
            last_score = Some(score);
        }
        ranks.insert(key, rank);
    }
    ranks
}

/// Sum of the `top_n` highest scores, or of all scores when `top_n` is
/// unset or not smaller than the number of scores.
pub fn top_n_sum(scores: &[i64], top_n: Option<u32>) -> i64 {
    match top_n {
        Some(n) if (n as usize) < scores.len() => {
            let mut sorted = scores.to_vec();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            sorted.iter().take(n as usize).sum()
        }
        _ => scores.iter().sum(),
    }
}

/// Ranks for one kind of candidate at one edition.
///
/// `official` is only populated when the edition tells official and
/// unofficial countries apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rankings<K: Eq + Hash> {
    pub all: HashMap<K, u32>,
    pub official: HashMap<K, u32>,
}

impl<K: Eq + Hash> Rankings<K> {
    pub fn rank(&self, key: &K) -> Option<u32> {
        self.all.get(key).copied()
    }

    pub fn rank_official(&self, key: &K) -> Option<u32> {
        self.official.get(key).copied()
    }
}

impl<K: Eq + Hash> Default for Rankings<K> {
    fn default() -> Self {
        Self {
            all: HashMap::new(),
            official: HashMap::new(),
        }
    }
}
