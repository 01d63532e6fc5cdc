use genproto::api::PaginationMeta as PaginationMetaProto;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PaginationMeta {
    pub total: i64,
    pub current_page: i32,
    pub last_page: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, current_page: i32, limit: i32) -> Self {
        Self {
            total,
            current_page,
            last_page: last_page(total, limit),
        }
    }
}

/// `ceil(total / limit)`; zero when there is nothing to page through.
pub fn last_page(total: i64, limit: i32) -> i64 {
    let limit = i64::from(limit);
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

impl From<PaginationMeta> for PaginationMetaProto {
    fn from(value: PaginationMeta) -> Self {
        Self {
            total: value.total,
            current_page: value.current_page,
            last_page: value.last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_rounds_up() {
        assert_eq!(last_page(25, 10), 3);
        assert_eq!(last_page(30, 10), 3);
        assert_eq!(last_page(31, 10), 4);
        assert_eq!(last_page(1, 10), 1);
        assert_eq!(last_page(7, 1), 7);
    }

    #[test]
    fn empty_catalog_has_no_pages() {
        assert_eq!(last_page(0, 10), 0);
        assert_eq!(PaginationMeta::new(0, 1, 10).last_page, 0);
    }

    #[test]
    fn last_page_matches_ceiling_for_small_inputs() {
        for total in 0..60_i64 {
            for limit in 1..12_i32 {
                let expected = (total as f64 / f64::from(limit)).ceil() as i64;
                assert_eq!(last_page(total, limit), expected, "total={total} limit={limit}");
            }
        }
    }

    #[test]
    fn meta_keeps_requested_page() {
        let meta = PaginationMeta::new(25, 9, 10);
        assert_eq!(
            meta,
            PaginationMeta {
                total: 25,
                current_page: 9,
                last_page: 3,
            }
        );

        let proto = PaginationMetaProto::from(meta);
        assert_eq!(proto.current_page, 9);
        assert_eq!(proto.last_page, 3);
    }
}
