use serde::{Deserialize, Serialize};

/// One page of a derived list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// Slices `items` into zero-based page `page`. A zero page size returns
/// everything as a single page.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let total = items.len();
    if page_size == 0 {
        return Page {
            items: items.to_vec(),
            total,
            page: 0,
            page_size: total,
            total_pages: 1,
        };
    }

    let total_pages = total.div_ceil(page_size);
    let start = page.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);

    Page {
        items: items[start..end].to_vec(),
        total,
        page,
        page_size,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=7).collect();
        let page = paginate(&items, 1, 3);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 3);

        let last = paginate(&items, 2, 3);
        assert_eq!(last.items, vec![7]);

        let beyond = paginate(&items, 9, 3);
        assert!(beyond.items.is_empty());
    }

    #[test]
    fn test_zero_page_size_returns_everything() {
        let items = vec!["a", "b"];
        let page = paginate(&items, 4, 0);
        assert_eq!(page.items, items);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_huge_page_size() {
        let items: Vec<u32> = (1..=7).collect();
        let page = paginate(&items, 0, usize::MAX);
        assert_eq!(page.items, items);
        assert_eq!(page.total_pages, 1);

        let second = paginate(&items, 1, usize::MAX);
        assert!(second.items.is_empty());
    }

    #[test]
    fn test_empty() {
        let items: Vec<u8> = Vec::new();
        let page = paginate(&items, 0, 25);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }
}
