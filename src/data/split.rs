/// Default share of rows that go to the training split.
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

/// Positional split: the first `floor(ratio * n)` rows are train, the rest
/// test.  No resampling; shuffle beforehand for a random partition.
/// `ratio` is clamped to `[0, 1]`.
pub fn split_at_ratio<T: Clone>(rows: &[T], ratio: f64) -> (Vec<T>, Vec<T>) {
    let ratio = ratio.clamp(0.0, 1.0);
    let cut = ((ratio * rows.len() as f64).floor() as usize).min(rows.len());
    let (train, test) = rows.split_at(cut);
    (train.to_vec(), test.to_vec())
}
