use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;

use crate::{error::AppResult, models::SortOrder};

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    language: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        language: String,
        rps: u32,
    ) -> Self {
        // Warn once on app load if serving sample data
        if api_key.trim().is_empty() {
            tracing::warn!("no TMDB_API_KEY configured, serving sample catalog data");
        }

        let limiter =
            Arc::new(RateLimiter::direct(Quota::per_second(NonZeroU32::new(rps.max(1)).unwrap())));
        Self { client, api_key, base_url, language, limiter }
    }

    fn sample_mode(&self) -> bool {
        self.api_key.trim().is_empty()
    }

    fn common_params(&self) -> [(&'static str, &str); 2] {
        [("api_key", self.api_key.as_str()), ("language", self.language.as_str())]
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub async fn movie_details(&self, id: i32) -> AppResult<Option<MovieDetails>> {
        if self.sample_mode() {
            return Ok(SAMPLE_LIBRARY.iter().find(|f| f.id == id).map(SampleFilm::details));
        }

        self.limiter.until_ready().await;

        let resp = self
            .client
            .get(self.url(&format!("/movie/{id}")))
            .query(&self.common_params())
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(resp.error_for_status()?.json().await?))
    }

    pub async fn popular(&self) -> AppResult<MovieListResponse> {
        if self.sample_mode() {
            return Ok(sample_page(SAMPLE_LIBRARY.iter().map(SampleFilm::summary).collect(), 1));
        }

        self.limiter.until_ready().await;

        let resp = self
            .client
            .get(self.url("/movie/popular"))
            .query(&self.common_params())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp)
    }

    pub async fn search_movies(&self, query: &str, page: u32) -> AppResult<MovieListResponse> {
        if self.sample_mode() {
            let needle = query.to_lowercase();
            let matches = SAMPLE_LIBRARY
                .iter()
                .filter(|f| f.title.to_lowercase().contains(&needle))
                .map(SampleFilm::summary)
                .collect();
            return Ok(sample_page(matches, page));
        }

        self.limiter.until_ready().await;

        let resp = self
            .client
            .get(self.url("/search/movie"))
            .query(&self.common_params())
            .query(&[("query", query)])
            .query(&[("page", page)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp)
    }

    /// First matching person for the query, if any.
    pub async fn search_person(&self, query: &str) -> AppResult<Option<Person>> {
        if self.sample_mode() {
            if query.trim().is_empty() {
                return Ok(None);
            }
            return Ok(Some(Person { id: SAMPLE_PERSON.0, name: SAMPLE_PERSON.1.to_string() }));
        }

        self.limiter.until_ready().await;

        let resp: PersonSearchResponse = self
            .client
            .get(self.url("/search/person"))
            .query(&self.common_params())
            .query(&[("query", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp.results.into_iter().next())
    }

    pub async fn person_movie_credits(&self, person_id: i32) -> AppResult<Vec<MovieSummary>> {
        if self.sample_mode() {
            let credits = SAMPLE_PERSON_CREDITS
                .iter()
                .filter_map(|id| SAMPLE_LIBRARY.iter().find(|f| f.id == *id))
                .map(SampleFilm::summary)
                .collect();
            return Ok(credits);
        }

        self.limiter.until_ready().await;

        let resp: CreditsResponse = self
            .client
            .get(self.url(&format!("/person/{person_id}/movie_credits")))
            .query(&self.common_params())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp.cast)
    }

    pub async fn genres(&self) -> AppResult<Vec<Genre>> {
        if self.sample_mode() {
            return Ok(SAMPLE_GENRES
                .iter()
                .map(|(id, name)| Genre { id: *id, name: name.to_string() })
                .collect());
        }

        self.limiter.until_ready().await;

        let resp: GenreListResponse = self
            .client
            .get(self.url("/genre/movie/list"))
            .query(&self.common_params())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp.genres)
    }

    /// Genre-based discovery. Titles must carry every requested genre, the
    /// way the catalog treats a comma-joined `with_genres` value.
    pub async fn discover(
        &self,
        genre_ids: &[i32],
        sort: SortOrder,
        page: u32,
    ) -> AppResult<MovieListResponse> {
        if self.sample_mode() {
            // Sample data stays in popularity order regardless of sort.
            let matches = SAMPLE_LIBRARY
                .iter()
                .filter(|f| genre_ids.iter().all(|g| f.genre_ids.contains(g)))
                .map(SampleFilm::summary)
                .collect();
            return Ok(sample_page(matches, page));
        }

        self.limiter.until_ready().await;

        let with_genres =
            genre_ids.iter().map(|g| g.to_string()).collect::<Vec<_>>().join(",");

        let resp = self
            .client
            .get(self.url("/discover/movie"))
            .query(&self.common_params())
            .query(&[("with_genres", with_genres.as_str()), ("sort_by", sort.as_param())])
            .query(&[("page", page)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: i32,
    pub title: String,
    pub poster_path: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MovieListResponse {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<MovieSummary>,
}

impl MovieListResponse {
    pub fn empty() -> Self {
        Self { page: 1, total_pages: 1, total_results: 0, results: Vec::new() }
    }

    pub fn single_page(results: Vec<MovieSummary>) -> Self {
        let total_results = results.len() as u32;
        Self { page: 1, total_pages: 1, total_results, results }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MovieDetails {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Person {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct PersonSearchResponse {
    results: Vec<Person>,
}

#[derive(Debug, Deserialize)]
struct CreditsResponse {
    #[serde(default)]
    cast: Vec<MovieSummary>,
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    genres: Vec<Genre>,
}

const SAMPLE_PAGE_SIZE: u32 = 4;

fn sample_page(all: Vec<MovieSummary>, page: u32) -> MovieListResponse {
    let total_results = all.len() as u32;
    let total_pages = total_results.div_ceil(SAMPLE_PAGE_SIZE).max(1);
    let start = (page.saturating_sub(1) * SAMPLE_PAGE_SIZE) as usize;
    let results =
        all.into_iter().skip(start).take(SAMPLE_PAGE_SIZE as usize).collect::<Vec<_>>();
    MovieListResponse { page, total_pages, total_results, results }
}

struct SampleFilm {
    id: i32,
    title: &'static str,
    release_date: &'static str,
    genre_ids: &'static [i32],
    overview: &'static str,
}

impl SampleFilm {
    fn summary(&self) -> MovieSummary {
        MovieSummary { id: self.id, title: self.title.to_string(), poster_path: None }
    }

    fn details(&self) -> MovieDetails {
        let genres = self
            .genre_ids
            .iter()
            .map(|id| Genre { id: *id, name: sample_genre_name(*id).to_string() })
            .collect();
        MovieDetails {
            id: self.id,
            title: self.title.to_string(),
            overview: self.overview.to_string(),
            poster_path: None,
            release_date: self.release_date.to_string(),
            genres,
        }
    }
}

fn sample_genre_name(id: i32) -> &'static str {
    SAMPLE_GENRES.iter().find(|(gid, _)| *gid == id).map(|(_, name)| *name).unwrap_or("Unknown")
}

const SAMPLE_GENRES: &[(i32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (35, "Comedy"),
    (80, "Crime"),
    (18, "Drama"),
    (14, "Fantasy"),
    (878, "Science Fiction"),
    (53, "Thriller"),
];

const SAMPLE_PERSON: (i32, &str) = (525, "Christopher Nolan");
const SAMPLE_PERSON_CREDITS: &[i32] = &[155, 27205, 157336];

// Popularity order; the sample endpoints slice this list into pages.
const SAMPLE_LIBRARY: &[SampleFilm] = &[
    SampleFilm {
        id: 603,
        title: "The Matrix",
        release_date: "1999-03-30",
        genre_ids: &[28, 878],
        overview: "A hacker learns the world he knows is a simulation and joins the fight against its machine rulers.",
    },
    SampleFilm {
        id: 550,
        title: "Fight Club",
        release_date: "1999-10-15",
        genre_ids: &[18, 53],
        overview: "An insomniac office worker and a soap maker start an underground club with strict rules.",
    },
    SampleFilm {
        id: 680,
        title: "Pulp Fiction",
        release_date: "1994-09-10",
        genre_ids: &[80, 53],
        overview: "The lives of two hitmen, a boxer, and a pair of diner bandits intertwine in Los Angeles.",
    },
    SampleFilm {
        id: 278,
        title: "The Shawshank Redemption",
        release_date: "1994-09-23",
        genre_ids: &[18, 80],
        overview: "A banker sentenced to life in Shawshank prison never gives up on hope.",
    },
    SampleFilm {
        id: 155,
        title: "The Dark Knight",
        release_date: "2008-07-16",
        genre_ids: &[28, 80, 18],
        overview: "Batman faces a criminal mastermind known as the Joker, who plunges Gotham into anarchy.",
    },
    SampleFilm {
        id: 27205,
        title: "Inception",
        release_date: "2010-07-15",
        genre_ids: &[28, 878, 12],
        overview: "A thief who steals secrets from dreams is offered a chance to have his past crimes forgiven.",
    },
    SampleFilm {
        id: 157336,
        title: "Interstellar",
        release_date: "2014-11-05",
        genre_ids: &[12, 18, 878],
        overview: "Explorers travel through a wormhole in search of a new home for humanity.",
    },
    SampleFilm {
        id: 122,
        title: "The Lord of the Rings: The Return of the King",
        release_date: "2003-12-01",
        genre_ids: &[12, 14, 28],
        overview: "Aragorn leads the final stand against Sauron while Frodo approaches Mount Doom.",
    },
    SampleFilm {
        id: 120,
        title: "The Lord of the Rings: The Fellowship of the Ring",
        release_date: "2001-12-18",
        genre_ids: &[12, 14, 28],
        overview: "A young hobbit sets out from the Shire to destroy a ring of terrible power.",
    },
    SampleFilm {
        id: 238,
        title: "The Godfather",
        release_date: "1972-03-14",
        genre_ids: &[18, 80],
        overview: "The aging patriarch of a crime dynasty transfers control to his reluctant son.",
    },
    SampleFilm {
        id: 13,
        title: "Forrest Gump",
        release_date: "1994-06-23",
        genre_ids: &[35, 18],
        overview: "A slow-witted but kind man witnesses and shapes several defining moments of the 20th century.",
    },
    SampleFilm {
        id: 11,
        title: "Star Wars",
        release_date: "1977-05-25",
        genre_ids: &[12, 28, 878],
        overview: "A farm boy joins a rebellion to rescue a princess and destroy a planet-killing battle station.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_client() -> TmdbClient {
        TmdbClient::new(
            reqwest::Client::new(),
            String::new(),
            "https://api.themoviedb.org/3".to_string(),
            "en-US".to_string(),
            4,
        )
    }

    #[tokio::test]
    async fn sample_search_splits_into_pages() {
        let tmdb = sample_client();

        let first = tmdb.search_movies("the", 1).await.unwrap();
        let second = tmdb.search_movies("the", 2).await.unwrap();

        assert_eq!(first.total_results, 6);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.results.len(), 4);
        assert_eq!(second.results.len(), 2);

        let first_ids: Vec<i32> = first.results.iter().map(|m| m.id).collect();
        let second_ids: Vec<i32> = second.results.iter().map(|m| m.id).collect();
        assert!(first_ids.iter().all(|id| !second_ids.contains(id)));
    }

    #[tokio::test]
    async fn sample_discover_requires_every_genre() {
        let tmdb = sample_client();

        let scifi = tmdb.discover(&[878], SortOrder::Popularity, 1).await.unwrap();
        assert_eq!(scifi.total_results, 4);

        let action_scifi = tmdb.discover(&[28, 878], SortOrder::Popularity, 1).await.unwrap();
        let titles: Vec<&str> =
            action_scifi.results.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["The Matrix", "Inception", "Star Wars"]);
    }

    #[tokio::test]
    async fn sample_details_unknown_id_is_none() {
        let tmdb = sample_client();
        assert!(tmdb.movie_details(999_999).await.unwrap().is_none());
        assert!(tmdb.movie_details(603).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn sample_person_search_lists_credits() {
        let tmdb = sample_client();
        let person = tmdb.search_person("nolan").await.unwrap().unwrap();
        let credits = tmdb.person_movie_credits(person.id).await.unwrap();
        let titles: Vec<&str> = credits.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["The Dark Knight", "Inception", "Interstellar"]);
    }

    #[test]
    fn list_response_matches_wire_format() {
        let payload = r#"{
            "page": 1,
            "total_pages": 3,
            "total_results": 42,
            "results": [
                {"id": 603, "title": "The Matrix", "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg"},
                {"id": 550, "title": "Fight Club", "poster_path": null}
            ]
        }"#;
        let resp: MovieListResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(resp.total_results, 42);
        assert_eq!(resp.results[0].id, 603);
        assert!(resp.results[1].poster_path.is_none());
    }
}
