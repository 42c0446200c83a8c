//! Limit/offset query parameters for list endpoints

use serde::Deserialize;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// Query string pagination, e.g. `?limit=20&offset=40`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    /// Clamp to sane bounds before handing to the store
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, MAX_LIMIT),
            offset: self.offset.max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(page.limit, 20);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_explicit_values() {
        let page: Pagination = serde_json::from_str(r#"{"limit": 5, "offset": 10}"#).unwrap();
        assert_eq!(page.limit, 5);
        assert_eq!(page.offset, 10);
    }

    #[test]
    fn test_clamped() {
        let page = Pagination {
            limit: 1000,
            offset: -5,
        }
        .clamped();

        assert_eq!(page.limit, 100);
        assert_eq!(page.offset, 0);

        let page = Pagination {
            limit: 0,
            offset: 3,
        }
        .clamped();

        assert_eq!(page.limit, 1);
        assert_eq!(page.offset, 3);
    }
}
