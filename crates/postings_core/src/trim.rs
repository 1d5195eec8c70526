/// Drops the first and last entry of a page.
///
/// Pages with one entry contribute nothing, as do empty pages. Only sources
/// whose listings repeat across adjacent page edges opt into this.
pub fn trim_page_boundaries<T>(mut page: Vec<T>) -> Vec<T> {
    if page.len() <= 1 {
        return Vec::new();
    }
    page.pop();
    page.remove(0);
    page
}

#[cfg(test)]
mod tests {
    use super::trim_page_boundaries;

    #[test]
    fn five_entries_keep_the_middle_three() {
        assert_eq!(trim_page_boundaries(vec![1, 2, 3, 4, 5]), vec![2, 3, 4]);
    }

    #[test]
    fn two_entries_keep_nothing() {
        assert!(trim_page_boundaries(vec![1, 2]).is_empty());
    }

    #[test]
    fn single_and_empty_pages_keep_nothing() {
        assert!(trim_page_boundaries(vec![1]).is_empty());
        assert!(trim_page_boundaries(Vec::<u8>::new()).is_empty());
    }
}
