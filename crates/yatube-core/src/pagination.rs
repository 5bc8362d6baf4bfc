//! Fixed-size pagination shared by every post listing.

use serde::{Deserialize, Serialize};

/// Posts per page on the index, group and profile feeds.
pub const PAGE_SIZE: u64 = 10;

/// A requested 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    number: u64,
}

impl PageRequest {
    pub fn first() -> Self {
        Self { number: 1 }
    }

    /// Page `number`; zero is treated as the first page.
    pub fn new(number: u64) -> Self {
        Self {
            number: number.max(1),
        }
    }

    /// Parse the raw `page` query value.
    ///
    /// Absent, non-numeric, zero, negative and overflowing values all
    /// resolve to the first page.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<u64>().ok())
            .map(Self::new)
            .unwrap_or_else(Self::first)
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    /// Zero-based page index.
    pub fn index(&self) -> u64 {
        self.number - 1
    }

    pub fn offset(&self) -> u64 {
        self.index().saturating_mul(PAGE_SIZE)
    }

    pub fn limit(&self) -> u64 {
        PAGE_SIZE
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of an ordered listing plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    items: Vec<T>,
    number: u64,
    total_count: u64,
}

impl<T> Page<T> {
    /// Wrap an already fetched slice of a listing holding `total_count` items.
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        Self {
            items,
            number: request.number(),
            total_count,
        }
    }

    /// Cut the requested page out of a fully materialized, ordered listing.
    pub fn from_ordered(all: Vec<T>, request: PageRequest) -> Self {
        let total_count = all.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(offset).take(PAGE_SIZE as usize).collect();
        Self::new(items, request, total_count)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of pages; an empty listing still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        self.total_count.div_ceil(PAGE_SIZE).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    /// Transform the items while keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            total_count: self.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_number() {
        assert_eq!(PageRequest::parse(None).number(), 1);
        assert_eq!(PageRequest::parse(Some("2")).number(), 2);
        assert_eq!(PageRequest::parse(Some(" 3 ")).number(), 3);
        assert_eq!(PageRequest::parse(Some("0")).number(), 1);
        assert_eq!(PageRequest::parse(Some("-4")).number(), 1);
        assert_eq!(PageRequest::parse(Some("last")).number(), 1);
        assert_eq!(PageRequest::parse(Some("99999999999999999999999")).number(), 1);
    }

    #[test]
    fn test_offsets() {
        assert_eq!(PageRequest::first().offset(), 0);
        assert_eq!(PageRequest::new(3).offset(), 20);
        assert_eq!(PageRequest::new(u64::MAX).offset(), u64::MAX);
    }

    #[test]
    fn test_sixteen_items_split_ten_and_six() {
        let items: Vec<u32> = (0..16).collect();

        let first = Page::from_ordered(items.clone(), PageRequest::first());
        assert_eq!(first.len(), 10);
        assert_eq!(first.num_pages(), 2);
        assert!(first.has_next());
        assert!(!first.has_previous());
        assert_eq!(first.next_page_number(), Some(2));

        let second = Page::from_ordered(items, PageRequest::new(2));
        assert_eq!(second.len(), 6);
        assert_eq!(second.items(), &[10, 11, 12, 13, 14, 15]);
        assert!(!second.has_next());
        assert_eq!(second.previous_page_number(), Some(1));
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let page = Page::from_ordered((0..5).collect::<Vec<u32>>(), PageRequest::new(7));
        assert!(page.is_empty());
        assert_eq!(page.number(), 7);
        assert_eq!(page.total_count(), 5);
        assert!(!page.has_next());

        let far = Page::from_ordered((0..5).collect::<Vec<u32>>(), PageRequest::new(u64::MAX));
        assert!(far.is_empty());
    }

    #[test]
    fn test_empty_listing_has_one_empty_page() {
        let page = Page::from_ordered(Vec::<u32>::new(), PageRequest::first());
        assert!(page.is_empty());
        assert_eq!(page.total_count(), 0);
        assert_eq!(page.num_pages(), 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_pages_concatenate_to_full_listing() {
        for n in [1u64, 9, 10, 11, 20, 37] {
            let all: Vec<u64> = (0..n).collect();
            let pages = Page::from_ordered(all.clone(), PageRequest::first()).num_pages();
            assert_eq!(pages, n.div_ceil(PAGE_SIZE));

            let joined: Vec<u64> = (1..=pages)
                .flat_map(|p| Page::from_ordered(all.clone(), PageRequest::new(p)).into_items())
                .collect();
            assert_eq!(joined, all);
        }
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], PageRequest::new(2), 12).map(|n| n * 10);
        assert_eq!(page.items(), &[10, 20]);
        assert_eq!(page.number(), 2);
        assert_eq!(page.total_count(), 12);
    }
}
