use std::collections::HashMap;
use std::hash::Hash;

/// Sort index stamped on items missing from an order list.
pub const UNORDERED_SORT_INDEX: i64 = 999;

/// Sort `items` by their position in `order`.
///
/// Items whose key is absent from `order` keep their relative order and
/// follow every ordered item. Keys in `order` with no matching item are
/// ignored.
pub fn sort_by_order<T, K, F>(items: &mut [T], order: &[K], key: F)
where
    K: Eq + Hash + Copy,
    F: Fn(&T) -> K,
{
    let positions = positions(order);
    items.sort_by_key(|item| positions.get(&key(item)).copied().unwrap_or(usize::MAX));
}

/// Position of `id` in `order`, or the sentinel when absent.
pub fn sort_index_for<K: Eq>(order: &[K], id: &K) -> i64 {
    order
        .iter()
        .position(|candidate| candidate == id)
        .and_then(|pos| i64::try_from(pos).ok())
        .unwrap_or(UNORDERED_SORT_INDEX)
}

/// 1-based position of `id` in the column order, or the sentinel when absent.
///
/// Column sort indexes count from 1 on every path; the early/late info-field
/// split in [`crate::format::is_early_info_field`] relies on it.
pub fn column_sort_index_for<K: Eq>(order: &[K], id: &K) -> i64 {
    match sort_index_for(order, id) {
        UNORDERED_SORT_INDEX => UNORDERED_SORT_INDEX,
        index => index + 1,
    }
}

fn positions<K: Eq + Hash + Copy>(order: &[K]) -> HashMap<K, usize> {
    let mut map = HashMap::with_capacity(order.len());
    for (pos, id) in order.iter().enumerate() {
        // first occurrence wins
        map.entry(*id).or_insert(pos);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_items_follow_in_original_order() {
        let mut items = vec![1, 2, 3, 4, 5];
        sort_by_order(&mut items, &[4, 99, 2], |item| *item);
        assert_eq!(items, vec![4, 2, 1, 3, 5]);
    }

    #[test]
    fn sort_index_uses_sentinel() {
        assert_eq!(sort_index_for(&[7, 8], &8), 1);
        assert_eq!(sort_index_for(&[7, 8], &9), UNORDERED_SORT_INDEX);
    }

    #[test]
    fn column_sort_index_counts_from_one() {
        assert_eq!(column_sort_index_for(&[7, 8], &7), 1);
        assert_eq!(column_sort_index_for(&[7, 8], &9), UNORDERED_SORT_INDEX);
    }
}
