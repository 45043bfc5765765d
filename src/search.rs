use crate::{models::SearchCriteria, tmdb::{MovieListResponse, MovieSummary}};

/// Collects catalog pages for one set of search criteria. Pages arrive in
/// request order and append to the set; a page fetched for different
/// criteria clears everything and restarts from that response.
#[derive(Debug, Default)]
pub struct ResultAccumulator {
    criteria: Option<SearchCriteria>,
    items: Vec<MovieSummary>,
    current_page: u32,
    total_pages: u32,
    total_results: u32,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, criteria: &SearchCriteria, response: MovieListResponse) {
        if self.criteria.as_ref() != Some(criteria) {
            self.items.clear();
            self.criteria = Some(criteria.clone());
        }
        self.current_page = response.page;
        self.total_pages = response.total_pages;
        self.total_results = response.total_results;
        self.items.extend(response.results);
    }

    pub fn items(&self) -> &[MovieSummary] {
        &self.items
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_results(&self) -> u32 {
        self.total_results
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SearchType, SortOrder};

    fn criteria(query: &str) -> SearchCriteria {
        SearchCriteria {
            query: query.to_string(),
            search_type: SearchType::Movie,
            genres: Vec::new(),
            sort: SortOrder::Popularity,
        }
    }

    fn movie(id: i32, title: &str) -> MovieSummary {
        MovieSummary { id, title: title.to_string(), poster_path: None }
    }

    fn response(page: u32, total_pages: u32, results: Vec<MovieSummary>) -> MovieListResponse {
        let total_results = total_pages * results.len().max(1) as u32;
        MovieListResponse { page, total_pages, total_results, results }
    }

    #[test]
    fn later_pages_append_in_request_order() {
        let c = criteria("the");
        let mut acc = ResultAccumulator::new();

        acc.absorb(&c, response(1, 2, vec![movie(603, "The Matrix"), movie(278, "The Shawshank Redemption")]));
        acc.absorb(&c, response(2, 2, vec![movie(238, "The Godfather")]));

        let ids: Vec<i32> = acc.items().iter().map(|m| m.id).collect();
        assert_eq!(ids, [603, 278, 238]);
        assert_eq!(acc.current_page(), 2);
        assert!(!acc.has_more());
    }

    #[test]
    fn changed_criteria_reset_the_set() {
        let first = criteria("the");
        let second = criteria("star");
        let mut acc = ResultAccumulator::new();

        acc.absorb(&first, response(1, 2, vec![movie(603, "The Matrix")]));
        acc.absorb(&first, response(2, 2, vec![movie(238, "The Godfather")]));
        acc.absorb(&second, response(1, 1, vec![movie(11, "Star Wars")]));

        let ids: Vec<i32> = acc.items().iter().map(|m| m.id).collect();
        assert_eq!(ids, [11]);
        assert_eq!(acc.current_page(), 1);
    }

    #[test]
    fn sort_change_alone_counts_as_new_criteria() {
        let mut with_sort = criteria("");
        with_sort.genres = vec![878];
        let mut acc = ResultAccumulator::new();
        acc.absorb(&with_sort, response(1, 1, vec![movie(603, "The Matrix")]));

        let mut resorted = with_sort.clone();
        resorted.sort = SortOrder::ReleaseDate;
        acc.absorb(&resorted, response(1, 1, vec![movie(157336, "Interstellar")]));

        let ids: Vec<i32> = acc.items().iter().map(|m| m.id).collect();
        assert_eq!(ids, [157336]);
    }

    #[test]
    fn duplicates_across_pages_are_kept_as_served() {
        let c = criteria("the");
        let mut acc = ResultAccumulator::new();
        acc.absorb(&c, response(1, 2, vec![movie(603, "The Matrix")]));
        acc.absorb(&c, response(2, 2, vec![movie(603, "The Matrix")]));
        assert_eq!(acc.items().len(), 2);
    }
}
