//! Filtering and pagination of the fetched catalog.
//!
//! Pure functions: the view stores only the search term and page index and
//! derives the visible page on demand.

use super::models::Book;

pub const PAGE_SIZE: usize = 5;

/// The visible slice of the filtered catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewWindow<'a> {
    pub items: Vec<&'a Book>,
    /// Page actually shown, after out-of-range indices were reset.
    pub page: usize,
    pub total_pages: usize,
    /// Number of books matching the search term across all pages.
    pub matched: usize,
}

/// Case-insensitive prefix match on the title.
pub fn title_matches(title: &str, term: &str) -> bool {
    title.to_lowercase().starts_with(&term.to_lowercase())
}

pub fn filter<'a>(books: &'a [Book], term: &str) -> Vec<&'a Book> {
    books
        .iter()
        .filter(|book| title_matches(&book.title, term))
        .collect()
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// An index past the last page falls back to the first page.
pub fn reset_if_out_of_range(page: usize, total_pages: usize) -> usize {
    if page >= total_pages {
        0
    } else {
        page
    }
}

/// Clamp a requested page into `[0, total_pages - 1]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.min(total_pages.saturating_sub(1))
}

pub fn window<'a>(books: &'a [Book], term: &str, page: usize, page_size: usize) -> ViewWindow<'a> {
    let matched = filter(books, term);
    let total_pages = total_pages(matched.len(), page_size);
    let page = reset_if_out_of_range(page, total_pages);
    let items = matched
        .iter()
        .skip(page * page_size)
        .take(page_size)
        .copied()
        .collect();

    ViewWindow {
        items,
        page,
        total_pages,
        matched: matched.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: u64, title: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: String::new(),
            category: String::new(),
            publisher: String::new(),
        }
    }

    fn shelf(titles: &[&str]) -> Vec<Book> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| book(i as u64 + 1, title))
            .collect()
    }

    fn titles<'a>(window: &ViewWindow<'a>) -> Vec<&'a str> {
        window.items.iter().map(|&b| b.title.as_str()).collect()
    }

    #[test]
    fn search_is_case_insensitive_prefix() {
        let books = shelf(&["Alpha", "Beta", "Ant"]);
        let view = window(&books, "a", 0, PAGE_SIZE);
        assert_eq!(titles(&view), vec!["Alpha", "Ant"]);
        assert_eq!(view.total_pages, 1);

        let view = window(&books, "AN", 0, PAGE_SIZE);
        assert_eq!(titles(&view), vec!["Ant"]);
    }

    #[test]
    fn search_does_not_match_inside_titles() {
        let books = shelf(&["The Hobbit", "Hobbit Tales"]);
        assert_eq!(filter(&books, "hob").len(), 1);
    }

    #[test]
    fn empty_term_matches_everything() {
        let books = shelf(&["x", "y", "z"]);
        assert_eq!(filter(&books, "").len(), 3);
    }

    #[test]
    fn filter_matches_exact_subset() {
        let books = shelf(&["Rust", "rusty", "Trust", "RUST in Action", "", "R"]);
        for term in ["", "r", "Ru", "rust", "RUSTY", "t", "zzz"] {
            let expected: Vec<&Book> = books
                .iter()
                .filter(|b| b.title.to_lowercase().starts_with(&term.to_lowercase()))
                .collect();
            assert_eq!(filter(&books, term), expected, "term {term:?}");
        }
    }

    #[test]
    fn total_pages_is_ceiling() {
        for n in 0..23 {
            assert_eq!(total_pages(n, 5), (n + 4) / 5, "n = {n}");
        }
        assert_eq!(total_pages(3, 0), 0);
    }

    #[test]
    fn page_never_exceeds_last() {
        let titles: Vec<String> = (0..12).map(|i| format!("Book {i}")).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let books = shelf(&refs);

        for requested in 0..6 {
            let view = window(&books, "", requested, PAGE_SIZE);
            assert_eq!(view.total_pages, 3);
            assert!(view.page < view.total_pages);
        }

        let last = window(&books, "", 2, PAGE_SIZE);
        assert_eq!(last.items.len(), 2);
        assert_eq!(last.items[0].title, "Book 10");
    }

    #[test]
    fn narrowing_search_resets_page() {
        let mut names: Vec<String> = (0..10).map(|i| format!("Archive {i}")).collect();
        names.push("Zebra".to_string());
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let books = shelf(&refs);

        let wide = window(&books, "", 2, PAGE_SIZE);
        assert_eq!(wide.page, 2);

        let narrow = window(&books, "z", 2, PAGE_SIZE);
        assert_eq!(narrow.page, 0);
        assert_eq!(narrow.total_pages, 1);
        assert_eq!(titles(&narrow), vec!["Zebra"]);
    }

    #[test]
    fn empty_catalog_has_no_pages() {
        let view = window(&[], "", 3, PAGE_SIZE);
        assert_eq!(view.page, 0);
        assert_eq!(view.total_pages, 0);
        assert!(view.items.is_empty());
    }

    #[test]
    fn clamp_keeps_index_in_range() {
        assert_eq!(clamp_page(7, 3), 2);
        assert_eq!(clamp_page(1, 3), 1);
        assert_eq!(clamp_page(4, 0), 0);
    }

    #[test]
    fn largest_index_falls_back_to_first_page() {
        assert_eq!(reset_if_out_of_range(usize::MAX, 3), 0);
        assert_eq!(reset_if_out_of_range(usize::MAX, usize::MAX), 0);
        assert_eq!(reset_if_out_of_range(2, 3), 2);

        let books = shelf(&["A", "B", "C", "D", "E", "F"]);
        let view = window(&books, "", usize::MAX, PAGE_SIZE);
        assert_eq!(view.page, 0);
        assert_eq!(titles(&view), vec!["A", "B", "C", "D", "E"]);
    }
}
