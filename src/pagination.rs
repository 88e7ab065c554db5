//! Page/size query handling shared by every list endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::Record;
use crate::store::{EntityStore, StoreResult};

/// Raw `?page=&size=` query parameters. Page defaults to 1, size to the
/// configured default (5) when unspecified.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageQuery {
    pub fn resolve(&self, default_size: i64) -> (i64, i64) {
        (self.page.unwrap_or(1), self.size.unwrap_or(default_size))
    }
}

/// One page of results plus the metadata clients need to walk the whole
/// collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    /// Unfiltered size of the full collection, not just this page.
    pub total_count: i64,
    pub total_pages: i64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, page: i64, page_size: i64, total_count: i64) -> Self {
        Self {
            items,
            page,
            page_size,
            total_count,
            total_pages: total_pages(total_count, page_size),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

/// `ceil(total_count / page_size)`; zero when the size is degenerate.
fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 0;
    }
    (total_count + page_size - 1) / page_size
}

/// Offset of the first item on `page`. Pages at or below zero clamp to the
/// start of the collection.
fn offset(page: i64, page_size: i64) -> i64 {
    (page - 1).saturating_mul(page_size).max(0)
}

/// Slice one page out of a collection, in store-default order.
pub async fn paginate<T: Record>(
    store: &dyn EntityStore<T>,
    page: i64,
    page_size: i64,
) -> StoreResult<PagedResult<T>> {
    let total_count = store.count().await?;
    let items = if page_size <= 0 {
        Vec::new()
    } else {
        store.list(offset(page, page_size), page_size).await?
    };
    Ok(PagedResult::new(items, page, page_size, total_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::store::memory::Table;
    use crate::store::EntityStore;
    use rust_decimal::Decimal;

    #[test]
    fn test_total_pages_uses_true_ceiling() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(3, 10), 1);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
    }

    #[test]
    fn test_total_pages_degenerate_size_is_zero() {
        assert_eq!(total_pages(10, 0), 0);
        assert_eq!(total_pages(10, -3), 0);
    }

    #[test]
    fn test_offset_clamps_nonpositive_pages() {
        assert_eq!(offset(1, 5), 0);
        assert_eq!(offset(3, 5), 10);
        assert_eq!(offset(0, 5), 0);
        assert_eq!(offset(-2, 5), 0);
    }

    #[test]
    fn test_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.resolve(5), (1, 5));

        let query = PageQuery {
            page: Some(4),
            size: Some(20),
        };
        assert_eq!(query.resolve(5), (4, 20));
    }

    async fn seeded(n: i64) -> Table<User> {
        let table = Table::default();
        for i in 0..n {
            table
                .add(User {
                    id: 0,
                    name: format!("u{i}"),
                    hour_rate: Decimal::from(25),
                })
                .await
                .unwrap();
        }
        table
    }

    #[tokio::test]
    async fn test_pages_cover_collection_without_gaps_or_duplicates() {
        let table = seeded(13).await;
        let mut seen = Vec::new();
        for page in 1..=3 {
            let result = paginate(&table, page, 5).await.unwrap();
            assert_eq!(result.total_count, 13);
            assert_eq!(result.total_pages, 3);
            assert!(result.items.len() <= 5);
            seen.extend(result.items.into_iter().map(|u| u.id));
        }
        let expected: Vec<i64> = (1..=13).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty_with_full_metadata() {
        let table = seeded(3).await;
        let result = paginate(&table, 2, 10).await.unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.page, 2);
        assert_eq!(result.page_size, 10);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.total_pages, 1);
    }

    #[tokio::test]
    async fn test_degenerate_size_yields_empty_page() {
        let table = seeded(3).await;
        let result = paginate(&table, 1, 0).await.unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.total_count, 3);
        assert_eq!(result.total_pages, 0);
    }
}
