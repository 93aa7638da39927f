//! 表示件数の管理（「もっと見る」）

/// 1回の「もっと見る」で増える件数（初期表示件数も同じ）
pub const PAGE_SIZE: usize = 20;

/// 先頭から displayed_count 件（リストが短ければ全件）
pub fn visible_slice<T>(items: &[T], displayed_count: usize) -> &[T] {
    &items[..displayed_count.min(items.len())]
}

/// まだ表示していない件があるか
pub fn has_more<T>(items: &[T], displayed_count: usize) -> bool {
    items.len() > displayed_count
}

/// 次の表示件数
pub fn advance(displayed_count: usize) -> usize {
    displayed_count.saturating_add(PAGE_SIZE)
}

/// 表示ウィンドウ
///
/// displayed_count はリセット時以外は減らない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    displayed_count: usize,
}

impl Default for PaginationWindow {
    fn default() -> Self {
        Self { displayed_count: PAGE_SIZE }
    }
}

impl PaginationWindow {
    /// 先頭から pages ページ分を表示（0は1ページ扱い）
    pub fn with_pages(pages: usize) -> Self {
        Self {
            displayed_count: PAGE_SIZE.saturating_mul(pages.max(1)),
        }
    }

    pub fn displayed_count(&self) -> usize {
        self.displayed_count
    }

    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        visible_slice(items, self.displayed_count)
    }

    pub fn has_more<T>(&self, items: &[T]) -> bool {
        has_more(items, self.displayed_count)
    }

    /// 「もっと見る」
    pub fn advance(&mut self) {
        self.displayed_count = advance(self.displayed_count);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
