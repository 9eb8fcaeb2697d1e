//! Abstractions for offset-based pagination.

/// Pagination arguments: a 1-indexed page of `per_page` items.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Arguments {
    /// Requested page number, starting from `1`.
    page: usize,

    /// Number of items on a single page.
    per_page: usize,
}

impl Arguments {
    /// Creates new [`Arguments`].
    ///
    /// [`None`] is returned if either `page` or `per_page` is zero.
    #[must_use]
    pub fn new(page: usize, per_page: usize) -> Option<Self> {
        (page > 0 && per_page > 0).then_some(Self { page, per_page })
    }

    /// Returns the requested page number.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the number of items on a single page.
    #[must_use]
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Returns index of the first item on the requested page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Returns maximum number of items on the requested page.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.per_page
    }

    /// Returns number of pages required to hold `count` items.
    #[must_use]
    pub fn total_pages(&self, count: usize) -> usize {
        total_pages(count, self.per_page)
    }

    /// Checks whether the requested page exists among `total_pages`.
    ///
    /// An empty collection still has its first (empty) page.
    #[must_use]
    pub fn is_within(&self, total_pages: usize) -> bool {
        self.page <= total_pages.max(1)
    }
}

/// Returns number of pages of `per_page` items required to hold `count`
/// items.
///
/// # Panics
///
/// If `per_page` is zero.
#[must_use]
pub fn total_pages(count: usize, per_page: usize) -> usize {
    let mut pages = count / per_page;
    if count % per_page != 0 {
        // Non-full last page.
        pages += 1;
    }
    pages
}

/// A page of items.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<I> {
    /// Items on this [`Page`].
    pub items: Vec<I>,

    /// Total number of pages.
    pub total_pages: usize,

    /// Number of this [`Page`].
    pub current_page: usize,

    /// Indicator whether there are pages after this one.
    pub more_pages: bool,
}

impl<I> Page<I> {
    /// Creates a new [`Page`] out of the provided `items`.
    #[must_use]
    pub fn new(
        args: &Arguments,
        items: impl IntoIterator<Item = impl Into<I>>,
        total_pages: usize,
    ) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            total_pages,
            current_page: args.page,
            more_pages: args.page < total_pages,
        }
    }
}

/// Pagination selector.
#[derive(Clone, Debug)]
pub struct Selector<F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Additional filter being applied to the result.
    pub filter: F,
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty) => {
        #[doc = "A [`Page`] of nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter>;
    };
}

#[cfg(test)]
mod spec {
    use super::{total_pages, Arguments, Page};

    #[test]
    fn rejects_zero_arguments() {
        assert!(Arguments::new(0, 2).is_none());
        assert!(Arguments::new(1, 0).is_none());
        assert!(Arguments::new(1, 1).is_some());
    }

    #[test]
    fn counts_pages() {
        assert_eq!(total_pages(0, 2), 0);
        assert_eq!(total_pages(1, 2), 1);
        assert_eq!(total_pages(4, 2), 2);
        assert_eq!(total_pages(5, 2), 3);
        assert_eq!(total_pages(5, 5), 1);

        for per_page in 1..=7 {
            for count in 0..=50 {
                assert_eq!(
                    total_pages(count, per_page),
                    count.div_ceil(per_page),
                    "count: {count}, per_page: {per_page}",
                );
            }
        }
    }

    #[test]
    fn computes_offset() {
        for per_page in 1..=5 {
            for page in 1..=10 {
                let args = Arguments::new(page, per_page).unwrap();
                assert_eq!(args.offset(), (page - 1) * per_page);
                assert_eq!(args.limit(), per_page);
            }
        }
    }

    #[test]
    fn checks_page_bounds() {
        let first = Arguments::new(1, 2).unwrap();
        let third = Arguments::new(3, 2).unwrap();

        assert!(first.is_within(0));
        assert!(!third.is_within(0));
        assert!(third.is_within(3));
        assert!(!third.is_within(2));
    }

    #[test]
    fn indicates_more_pages() {
        let total = total_pages(5, 2);
        for page in 1..=total {
            let args = Arguments::new(page, 2).unwrap();
            let p = Page::<u8>::new(&args, Vec::<u8>::new(), total);
            assert_eq!(p.more_pages, page != total);
            assert_eq!(p.current_page, page);
        }

        let args = Arguments::new(1, 2).unwrap();
        let empty = Page::<u8>::new(&args, Vec::<u8>::new(), 0);
        assert!(!empty.more_pages);
        assert_eq!(empty.total_pages, 0);
    }
}
