//! Specialized collection types

pub use indexmap::IndexSet;
pub use slotmap::{new_key_type, SlotMap};

/// Insertion-ordered set
///
/// Iteration follows first-insertion order and re-inserting an existing
/// value keeps the original position.
pub type OrderedSet<T> = IndexSet<T>;

/// Extend `target` with `items`, keeping the first occurrence of each value
///
/// Returns how many values were actually added.
pub fn extend_keep_first<T, I>(target: &mut OrderedSet<T>, items: I) -> usize
where
    T: std::hash::Hash + Eq,
    I: IntoIterator<Item = T>,
{
    let before = target.len();
    for item in items {
        target.insert(item);
    }
    target.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_keep_first_preserves_order() {
        let mut set: OrderedSet<&str> = OrderedSet::new();
        set.insert("b");
        set.insert("a");

        let added = extend_keep_first(&mut set, ["c", "a", "b", "d"]);

        assert_eq!(added, 2);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec!["b", "a", "c", "d"]);
    }
}
