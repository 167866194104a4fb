//! Abstractions for offset pagination.

/// Generic page of items.
#[derive(Clone, Debug)]
pub struct Page<I> {
    /// Items on this [`Page`].
    pub items: Vec<I>,
}

impl<I> Page<I> {
    /// Creates a new [`Page`] of the provided `items`.
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = impl Into<I>>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Pagination arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments {
    /// 1-based page number.
    page: u32,

    /// Maximum number of items on a page.
    limit: u32,
}

impl Arguments {
    /// Default page number.
    pub const DEFAULT_PAGE: u32 = 1;

    /// Default number of items on a page.
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Maximum allowed number of items on a page.
    pub const MAX_LIMIT: u32 = 100;

    /// Creates new [`Arguments`], falling back to defaults for the absent
    /// values and clamping the present ones into their allowed ranges.
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(Self::DEFAULT_PAGE).max(1),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Returns the 1-based page number requested by these [`Arguments`].
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns limit requested by these [`Arguments`].
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns number of items to skip before the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination selector.
#[derive(Clone, Copy, Debug)]
pub struct Selector<S, F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Sorting of the selected items.
    pub sort: S,

    /// [`Order`] the items are sorted in.
    pub order: Order,

    /// Additional filter being applied to the result.
    pub filter: F,
}

/// Order of pagination.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    Ascending,

    /// Descending order.
    #[default]
    Descending,
}

impl Order {
    /// Parses an [`Order`] leniently: `asc` in any case means
    /// [`Order::Ascending`], anything else means [`Order::Descending`].
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    /// Returns SQL keyword representing this [`Order`].
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($sort:ty, $node:ty, $filter:ty) => {
        #[doc = "A [`Page`] of [`$node`]s."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$sort, $filter>;
    };
}
