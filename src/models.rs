use std::collections::HashMap;

use serde::Deserialize;

/// Personal log status for a catalog title.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WatchStatus {
    WantToWatch,
    Watched,
}

impl WatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WatchStatus::WantToWatch => "want_to_watch",
            WatchStatus::Watched => "watched",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "want_to_watch" => Some(WatchStatus::WantToWatch),
            "watched" => Some(WatchStatus::Watched),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WatchStatus::WantToWatch => "Want to watch",
            WatchStatus::Watched => "Watched",
        }
    }
}

/// Sort orders accepted by the catalog's discover endpoint.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortOrder {
    #[default]
    Popularity,
    VoteAverage,
    ReleaseDate,
    Revenue,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Popularity,
        SortOrder::VoteAverage,
        SortOrder::ReleaseDate,
        SortOrder::Revenue,
    ];

    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::Popularity => "popularity.desc",
            SortOrder::VoteAverage => "vote_average.desc",
            SortOrder::ReleaseDate => "release_date.desc",
            SortOrder::Revenue => "revenue.desc",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "popularity.desc" => Some(SortOrder::Popularity),
            "vote_average.desc" => Some(SortOrder::VoteAverage),
            "release_date.desc" => Some(SortOrder::ReleaseDate),
            "revenue.desc" => Some(SortOrder::Revenue),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Popularity => "Most popular",
            SortOrder::VoteAverage => "Highest rated",
            SortOrder::ReleaseDate => "Newest release",
            SortOrder::Revenue => "Highest revenue",
        }
    }
}

/// How the keyword box is interpreted: a title search or a person search
/// (the person's film credits are listed).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SearchType {
    #[default]
    Movie,
    Person,
}

impl SearchType {
    pub fn as_param(self) -> &'static str {
        match self {
            SearchType::Movie => "movie",
            SearchType::Person => "person",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(SearchType::Movie),
            "person" => Some(SearchType::Person),
            _ => None,
        }
    }
}

/// Raw search parameters as they arrive on the URL. Everything is optional
/// and lenient; unknown values fall back to defaults rather than erroring.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: Option<String>,
    pub search_type: Option<String>,
    pub genres: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
}

/// Normalized search criteria. The URL query string is the single source of
/// truth for these, so a search is shareable and survives a reload.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SearchCriteria {
    pub query: String,
    pub search_type: SearchType,
    pub genres: Vec<i32>,
    pub sort: SortOrder,
}

impl SearchCriteria {
    pub fn from_params(params: &SearchParams) -> Self {
        let query = params.query.as_deref().unwrap_or("").trim().to_string();
        let search_type = params
            .search_type
            .as_deref()
            .and_then(SearchType::from_param)
            .unwrap_or_default();
        let genres = params
            .genres
            .as_deref()
            .map(|s| s.split(',').filter_map(|g| g.trim().parse().ok()).collect())
            .unwrap_or_default();
        let sort = params.sort.as_deref().and_then(SortOrder::from_param).unwrap_or_default();

        Self { query, search_type, genres, sort }
    }

    /// No keyword and no genres selected: nothing to search for yet.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.genres.is_empty()
    }

    /// The comma-joined form the URL and the catalog's discover endpoint use.
    pub fn genres_csv(&self) -> String {
        self.genres.iter().map(|g| g.to_string()).collect::<Vec<_>>().join(",")
    }

    /// Copy with `id` added to or removed from the genre set. The genre
    /// chips link to the URL this produces.
    pub fn with_genre_toggled(&self, id: i32) -> Self {
        let mut next = self.clone();
        match next.genres.iter().position(|g| *g == id) {
            Some(pos) => {
                next.genres.remove(pos);
            },
            None => next.genres.push(id),
        }
        next
    }

    /// Serializes the criteria back into a URL query string, optionally with
    /// an explicit page. Omitting the page is how a criteria change resets
    /// pagination.
    pub fn to_query_string(&self, page: Option<u32>) -> String {
        let mut parts = Vec::new();
        if !self.query.is_empty() {
            parts.push(format!("query={}", urlencoding::encode(&self.query)));
            parts.push(format!("searchType={}", self.search_type.as_param()));
        }
        if !self.genres.is_empty() {
            parts.push(format!("genres={}", self.genres_csv()));
        }
        parts.push(format!("sort={}", self.sort.as_param()));
        if let Some(page) = page {
            parts.push(format!("page={page}"));
        }
        parts.join("&")
    }
}

/// Lookup from catalog identifier to personal status, built once per render
/// and consulted while tagging tiles. Latest entry for an identifier wins.
#[derive(Debug, Default)]
pub struct StatusIndex {
    map: HashMap<i32, WatchStatus>,
}

impl StatusIndex {
    pub fn from_entries(entries: impl IntoIterator<Item = (i32, WatchStatus)>) -> Self {
        Self { map: entries.into_iter().collect() }
    }

    pub fn get(&self, tmdb_id: i32) -> Option<WatchStatus> {
        self.map.get(&tmdb_id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_status_round_trips() {
        for status in [WatchStatus::WantToWatch, WatchStatus::Watched] {
            assert_eq!(WatchStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(WatchStatus::parse("dropped"), None);
    }

    #[test]
    fn sort_order_defaults_to_popularity() {
        let criteria = SearchCriteria::from_params(&SearchParams {
            sort: Some("by_vibes".to_string()),
            ..Default::default()
        });
        assert_eq!(criteria.sort, SortOrder::Popularity);
    }

    #[test]
    fn criteria_parses_genre_list() {
        let criteria = SearchCriteria::from_params(&SearchParams {
            genres: Some("28, 12,xx,878".to_string()),
            ..Default::default()
        });
        assert_eq!(criteria.genres, vec![28, 12, 878]);
    }

    #[test]
    fn criteria_query_string_round_trips() {
        let criteria = SearchCriteria {
            query: "blade runner".to_string(),
            search_type: SearchType::Movie,
            genres: vec![878],
            sort: SortOrder::ReleaseDate,
        };
        let qs = criteria.to_query_string(Some(2));
        assert_eq!(qs, "query=blade%20runner&searchType=movie&genres=878&sort=release_date.desc&page=2");

        // Feeding the string back through the param path recovers the criteria.
        let params = SearchParams {
            query: Some("blade runner".to_string()),
            search_type: Some("movie".to_string()),
            genres: Some("878".to_string()),
            sort: Some("release_date.desc".to_string()),
            page: Some(2),
        };
        assert_eq!(SearchCriteria::from_params(&params), criteria);
    }

    #[test]
    fn genre_toggle_adds_and_removes() {
        let criteria = SearchCriteria { genres: vec![28, 878], ..Default::default() };
        assert_eq!(criteria.with_genre_toggled(12).genres, vec![28, 878, 12]);
        assert_eq!(criteria.with_genre_toggled(28).genres, vec![878]);
    }

    #[test]
    fn status_index_tags_known_ids_only() {
        let index = StatusIndex::from_entries([
            (550, WatchStatus::Watched),
            (603, WatchStatus::WantToWatch),
        ]);
        assert_eq!(index.get(550), Some(WatchStatus::Watched));
        assert_eq!(index.get(603), Some(WatchStatus::WantToWatch));
        assert_eq!(index.get(11), None);
    }
}
