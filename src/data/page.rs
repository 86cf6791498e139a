//! Pagination for listing students.
//!
//! Paging is non-strict: asking for a page past the end yields an empty page
//! instead of an error.

pub const DEFAULT_PER_PAGE: u32 = 10;

/// Raw `?page=&per_page=` query, kept as strings so junk input falls back to defaults.
#[derive(Debug, Default)]
pub struct PageQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl PageQuery {
    /// The first occurrence of a repeated key wins, anything unknown is ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "per_page" => &mut query.per_page,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    pub fn from_query(query: &PageQuery) -> Self {
        let parse = |raw: Option<&String>| raw.and_then(|raw| raw.trim().parse::<i64>().ok());

        let page = parse(query.page.as_ref())
            .filter(|page| *page >= 1)
            .map_or(1, |page| u32::try_from(page).unwrap_or(u32::MAX));
        let per_page = parse(query.per_page.as_ref())
            .filter(|per_page| *per_page >= 1)
            .map_or(DEFAULT_PER_PAGE, |per_page| {
                u32::try_from(per_page).unwrap_or(u32::MAX)
            });

        Self { page, per_page }
    }

    pub fn limit(self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.per_page.max(1)))
    }
}
