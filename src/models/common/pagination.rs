use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// 规范化后的分页参数（页码从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1) as u64,
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE) as u64,
        }
    }

    /// SeaORM 分页器使用从 0 开始的页码
    pub fn page_index(&self) -> u64 {
        self.page - 1
    }

    pub fn info(&self, total: u64, total_pages: u64) -> PaginationInfo {
        PaginationInfo {
            page: self.page as i64,
            page_size: self.size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::new(None, None);
        assert_eq!(req.page, 1);
        assert_eq!(req.size, DEFAULT_PAGE_SIZE as u64);
        assert_eq!(req.page_index(), 0);
    }

    #[test]
    fn test_clamping() {
        let req = PageRequest::new(Some(-3), Some(10_000));
        assert_eq!(req.page, 1);
        assert_eq!(req.size, MAX_PAGE_SIZE as u64);

        let req = PageRequest::new(Some(4), Some(0));
        assert_eq!(req.page, 4);
        assert_eq!(req.size, 1);
    }
}
