//! Small shared routines used across the analysis passes.

use itertools::{EitherOrBoth, Itertools};

use crate::model::Element;

/// Element-wise addition of two vectors of possibly different lengths: the
/// shorter one is added into a prefix of the longer, whose tail is kept
/// as-is.
pub fn add_vectors(first: &[u32], second: &[u32]) -> Vec<u32> {
    first
        .iter()
        .zip_longest(second.iter())
        .map(|pair| match pair {
            EitherOrBoth::Both(a, b) => a + b,
            EitherOrBoth::Left(v) | EitherOrBoth::Right(v) => *v,
        })
        .collect()
}

/// Positions of every occurrence of `needle` in `values`, in ascending order.
pub fn find_positions<T: PartialEq>(values: &[T], needle: &T) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter_map(|(position, value)| (value == needle).then_some(position))
        .collect()
}

/// Sorts elements by their reading order.
///
/// An element without an order of its own inherits the smallest order among
/// its characters; elements with no order at all sort last, keeping their
/// relative positions.
pub fn sort_elements_by_order(elements: &mut [Element]) {
    elements.sort_by_key(element_order);
}

fn element_order(element: &Element) -> usize {
    if let Some(order) = element.properties().order {
        return order;
    }
    if let Element::Word(word) = element {
        return word
            .content
            .iter()
            .filter_map(|c| c.properties.order)
            .min()
            .unwrap_or(usize::MAX);
    }
    usize::MAX
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::BoundingBox;
    use crate::model::{Font, Word};

    #[test]
    fn add_vectors_keeps_the_longer_tail() {
        assert_eq!(add_vectors(&[1, 2], &[10, 10, 10, 10]), vec![11, 12, 10, 10]);
        assert_eq!(add_vectors(&[10, 10, 10, 10], &[1, 2]), vec![11, 12, 10, 10]);
        assert_eq!(add_vectors(&[1, 2, 3], &[4, 5, 6]), vec![5, 7, 9]);
        assert_eq!(add_vectors(&[], &[7]), vec![7]);
    }

    #[test]
    fn find_positions_returns_every_match() {
        assert_eq!(find_positions(&[0, 3, 0, 0, 1], &0), vec![0, 2, 3]);
        assert_eq!(find_positions::<u32>(&[], &0), Vec::<usize>::new());
    }

    #[test]
    fn sorting_honors_order_and_is_stable_without_one() {
        let word = |order: Option<usize>| {
            let mut w = Word::new(BoundingBox::default(), Vec::new(), Font::undefined());
            w.properties.order = order;
            Element::Word(w)
        };
        let mut elements = vec![word(Some(2)), word(None), word(Some(0))];
        sort_elements_by_order(&mut elements);
        let orders: Vec<Option<usize>> = elements
            .iter()
            .map(|e| e.properties().order)
            .collect();
        assert_eq!(orders, vec![Some(0), Some(2), None]);
    }
}
