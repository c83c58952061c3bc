use std::collections::HashMap;
use std::num::IntErrorKind;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// Pagination is extracted from the query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination { page: 1 }
    }
}

impl Pagination {
    /// Slice of `items` belonging to this page. Pages past the end, and pages
    /// below 1, are empty rather than an error.
    pub fn paginate<T: Clone>(&self, items: &[T]) -> Vec<T> {
        if self.page < 1 {
            return Vec::new();
        }
        let start = usize::try_from(self.page - 1)
            .ok()
            .and_then(|page| page.checked_mul(QUESTIONS_PER_PAGE))
            .unwrap_or(usize::MAX);
        items
            .iter()
            .skip(start)
            .take(QUESTIONS_PER_PAGE)
            .cloned()
            .collect()
    }
}

/// Extract the `page` parameter of a listing route.
/// # Example query
/// `/api/questions?page=2`
/// # Example usage
/// ```rust
/// # use std::collections::HashMap;
/// # use trivia_api::types::pagination::extract_pagination;
/// let mut query = HashMap::new();
/// query.insert("page".to_string(), "3".to_string());
/// assert_eq!(extract_pagination(&query).page, 3);
/// ```
///
/// A missing or non-numeric value falls back to the first page. Numbers
/// beyond `i64` saturate, so they still land past the last page.
pub fn extract_pagination(params: &HashMap<String, String>) -> Pagination {
    let Some(raw) = params.get("page") else {
        return Pagination::default();
    };
    match raw.trim().parse::<i64>() {
        Ok(page) => Pagination { page },
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Pagination { page: i64::MAX },
            IntErrorKind::NegOverflow => Pagination { page: i64::MIN },
            _ => Pagination::default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: i64) -> Pagination {
        Pagination { page }
    }

    #[test]
    fn slices_ten_per_page() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(page(1).paginate(&items), (0..10).collect::<Vec<_>>());
        assert_eq!(page(2).paginate(&items), (10..20).collect::<Vec<_>>());
        assert_eq!(page(3).paginate(&items), vec![20, 21, 22, 23, 24]);
        assert!(page(4).paginate(&items).is_empty());
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items: Vec<u32> = (0..25).collect();
        assert!(page(0).paginate(&items).is_empty());
        assert!(page(-3).paginate(&items).is_empty());
        assert!(page(1000).paginate(&items).is_empty());
        assert!(page(i64::MAX).paginate(&items).is_empty());
        assert!(page(1).paginate::<u32>(&[]).is_empty());
    }

    #[test]
    fn page_parameter_defaults_to_one() {
        let mut params = HashMap::new();
        assert_eq!(extract_pagination(&params), page(1));

        params.insert("page".to_string(), "abc".to_string());
        assert_eq!(extract_pagination(&params), page(1));

        params.insert("page".to_string(), "1000".to_string());
        assert_eq!(extract_pagination(&params), page(1000));

        params.insert("page".to_string(), "99999999999999999999".to_string());
        assert_eq!(extract_pagination(&params), page(i64::MAX));
        assert!(extract_pagination(&params).paginate(&[1, 2, 3]).is_empty());

        params.insert("page".to_string(), "-99999999999999999999".to_string());
        assert_eq!(extract_pagination(&params), page(i64::MIN));
    }
}
