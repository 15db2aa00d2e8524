use super::field::ListRecord;
use super::filter::FilterSpec;
use super::sort::{sort_records, SortSpec};

/// Filters, then sorts, a borrowed view of `items`. The input is never
/// mutated and an empty collection yields an empty view.
pub fn filter_and_sort<'a, R: ListRecord>(
    items: &'a [R],
    filter: &FilterSpec,
    sort: Option<&SortSpec>,
) -> Vec<&'a R> {
    let mut view: Vec<&R> = items.iter().filter(|r| filter.matches(*r)).collect();
    if let Some(spec) = sort {
        sort_records(&mut view, spec);
    }
    view
}

#[derive(Debug, Clone)]
struct CachedView {
    generation: u64,
    len: usize,
    filter: FilterSpec,
    sort: Option<SortSpec>,
    indices: Vec<usize>,
}

/// Memoized list derivation keyed by (collection generation, filter, sort).
///
/// The caller bumps `generation` whenever the collection is replaced; a stale
/// or missing cache entry only costs a recomputation.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    cache: Option<CachedView>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn derive<'a, R: ListRecord>(
        &mut self,
        items: &'a [R],
        generation: u64,
        filter: &FilterSpec,
        sort: Option<&SortSpec>,
    ) -> Vec<&'a R> {
        let hit = self.cache.as_ref().is_some_and(|c| {
            c.generation == generation
                && c.len == items.len()
                && &c.filter == filter
                && c.sort.as_ref() == sort
        });

        if !hit {
            let mut indexed: Vec<(usize, &R)> = items
                .iter()
                .enumerate()
                .filter(|(_, r)| filter.matches(*r))
                .collect();
            if let Some(spec) = sort {
                indexed.sort_by(|(_, a), (_, b)| spec.compare(*a, *b));
            }
            self.cache = Some(CachedView {
                generation,
                len: items.len(),
                filter: filter.clone(),
                sort: sort.cloned(),
                indices: indexed.into_iter().map(|(i, _)| i).collect(),
            });
        }

        match &self.cache {
            Some(cached) => cached.indices.iter().filter_map(|&i| items.get(i)).collect(),
            None => Vec::new(),
        }
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }
}
