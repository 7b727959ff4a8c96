use rand::Rng;

/// Uniform in-place Fisher–Yates shuffle.
///
/// Walks from the last index down to 1, swapping each element with a
/// uniformly chosen element at or before its position.
pub fn shuffle_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
