//! Order array helpers. Insertion is splice-style: the element at `index`
//! and everything after it shift right.

/// Remove the element at `from` and reinsert it at `to`.
///
/// Out-of-range indices leave the order unchanged.
pub fn array_move<T>(mut items: Vec<T>, from: usize, to: usize) -> Vec<T> {
    if from >= items.len() || to >= items.len() || from == to {
        return items;
    }
    let item = items.remove(from);
    items.insert(to, item);
    items
}

/// Insert `item` at `index`, clamped to the end
pub fn insert_at<T>(mut items: Vec<T>, index: usize, item: T) -> Vec<T> {
    let index = index.min(items.len());
    items.insert(index, item);
    items
}

pub fn without<T, U>(items: &[T], id: &U) -> Vec<T>
where
    T: Clone + PartialEq<U>,
    U: ?Sized,
{
    items.iter().filter(|item| *item != id).cloned().collect()
}
