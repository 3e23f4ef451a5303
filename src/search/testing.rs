//! Helpers shared by the search tests.

/// Calls `visit` with every permutation of `items[k..]`, `items[..k]` fixed.
pub(super) fn permute(items: &mut [usize], k: usize, visit: &mut impl FnMut(&[usize])) {
    if k == items.len() {
        visit(items);
        return;
    }
    for i in k..items.len() {
        items.swap(k, i);
        permute(items, k + 1, visit);
        items.swap(k, i);
    }
}
