/// Shorten `s` to at most `max` characters, ending in "…" when cut.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let kept: String = s.chars().take(max - 1).collect();
    format!("{kept}…")
}

/// Move a list cursor down one row, scrolling so it stays within `page` rows.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 >= len {
        return;
    }
    *index += 1;
    let page = page.max(1);
    if *index >= *scroll + page {
        *scroll = *index + 1 - page;
    }
}

pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    *scroll = (*scroll).min(*index);
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len == 0 {
        return;
    }
    *index = len - 1;
    *scroll = len.saturating_sub(page.max(1));
}
