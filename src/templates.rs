use maud::{DOCTYPE, Markup, html};

use crate::{
    entities::log_entry,
    log_store::LogTile,
    models::{SearchCriteria, SearchType, SortOrder, StatusIndex, WatchStatus},
    search::ResultAccumulator,
    tmdb::{Genre, MovieDetails, MovieSummary},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const GRID: &str = "grid grid-cols-2 sm:grid-cols-3 md:grid-cols-4 lg:grid-cols-5 gap-4";

pub fn home_page(
    genres: &[Genre],
    tiles: &[LogTile],
    index: &StatusIndex,
    popular: Option<&[MovieSummary]>,
    image_base: &str,
) -> String {
    page(
        "cinelog",
        html! {
            main class="container mx-auto px-4 py-8" {
                section class="mb-12" {
                    h1 class="text-2xl font-bold mb-4 border-l-4 border-green-500 pl-3" { "Find movies" }
                    (search_form(&SearchCriteria::default(), genres))
                }

                section class="mb-12" {
                    h1 class="text-2xl font-bold mb-4 border-l-4 border-blue-500 pl-3" { "My list" }
                    @if tiles.is_empty() {
                        p class="text-gray-400" { "Nothing here yet. Add movies from the catalog below." }
                    } @else {
                        div class=(GRID) {
                            @for tile in tiles {
                                (movie_tile(tile.tmdb_id, &tile.title, tile.poster_path.as_deref(), WatchStatus::parse(&tile.status), image_base))
                            }
                        }
                        p class="mt-4" {
                            a class="text-sm text-blue-400 hover:text-blue-300" href="/mylist" { "See the full list" }
                        }
                    }
                }

                section {
                    h1 class="text-2xl font-bold mb-4 border-l-4 border-yellow-500 pl-3" { "Popular now" }
                    @if let Some(movies) = popular {
                        div class=(GRID) {
                            @for movie in movies {
                                (movie_tile(movie.id, &movie.title, movie.poster_path.as_deref(), index.get(movie.id), image_base))
                            }
                        }
                    } @else {
                        p class="text-gray-400" { "Could not load popular titles from the catalog." }
                    }
                }
            }
        },
    )
}

pub fn search_page(
    criteria: &SearchCriteria,
    genres: &[Genre],
    results: Option<&ResultAccumulator>,
    index: &StatusIndex,
    image_base: &str,
    catalog_failed: bool,
) -> String {
    page(
        "Search — cinelog",
        html! {
            main class="container mx-auto px-4 py-8" {
                h1 class="text-2xl font-bold mb-4 border-l-4 border-green-500 pl-3" { "Find movies" }
                (search_form(criteria, genres))

                @if catalog_failed {
                    p class="mt-8 text-gray-400" { "The movie catalog is unavailable right now. Try again later." }
                }

                @if let Some(results) = results {
                    @if results.total_results() > 0 {
                        h3 class="mt-8 mb-4 text-lg" { "About " (results.total_results()) " results" }
                    }
                    @if results.items().is_empty() {
                        @if !catalog_failed {
                            p class="mt-8 text-gray-400" { "Nothing matched. Try different criteria." }
                        }
                    } @else {
                        div class=(GRID) {
                            @for movie in results.items() {
                                (movie_tile(movie.id, &movie.title, movie.poster_path.as_deref(), index.get(movie.id), image_base))
                            }
                        }
                        @if results.has_more() {
                            div class="text-center mt-8" {
                                a class="inline-block bg-gray-700 hover:bg-gray-600 text-white font-bold py-2 px-6 rounded-lg"
                                    href=(format!("/search?{}", criteria.to_query_string(Some(results.current_page() + 1)))) {
                                    "Load more"
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn detail_page(
    movie: &MovieDetails,
    log: Option<&log_entry::Model>,
    image_base: &str,
) -> String {
    page(
        &format!("{} — cinelog", movie.title),
        html! {
            main class="container mx-auto px-4 py-8" {
                div class="flex flex-col md:flex-row gap-8" {
                    div class="w-full md:w-1/3" {
                        (poster(&movie.title, movie.poster_path.as_deref(), image_base))
                    }
                    div class="w-full md:w-2/3" {
                        h1 class="text-3xl font-bold mb-2" { (movie.title) }
                        @if !movie.release_date.is_empty() {
                            p class="text-sm text-gray-400 mb-2" { "Released " (movie.release_date) }
                        }
                        @if !movie.genres.is_empty() {
                            div class="flex flex-wrap gap-2 mb-4" {
                                @for genre in &movie.genres {
                                    span class="text-xs bg-gray-800 border border-gray-700 rounded-full px-3 py-1" { (genre.name) }
                                }
                            }
                        }

                        div class="mt-6 space-y-4" {
                            (log_actions(movie, log))
                        }

                        @if !movie.overview.is_empty() {
                            h2 class="text-xl font-semibold mb-2 mt-8" { "Overview" }
                            p class="leading-relaxed text-gray-200" { (movie.overview) }
                        }
                    }
                }
            }
        },
    )
}

pub fn my_list_page(want: &[LogTile], watched: &[LogTile], image_base: &str) -> String {
    page(
        "My list — cinelog",
        html! {
            main class="container mx-auto px-4 py-8" {
                h1 class="text-2xl font-bold mb-8 border-l-4 border-blue-500 pl-3" { "My list" }

                @if want.is_empty() && watched.is_empty() {
                    div class="text-center py-16" {
                        p class="text-xl text-gray-400 mb-8" { "No movies logged yet" }
                        a class="inline-block px-6 py-3 bg-blue-600 hover:bg-blue-700 rounded-lg font-semibold" href="/search" {
                            "Find something to watch"
                        }
                    }
                } @else {
                    @if !want.is_empty() {
                        (list_section("Want to watch", want, WatchStatus::WantToWatch, image_base))
                    }
                    @if !watched.is_empty() {
                        (list_section("Watched", watched, WatchStatus::Watched, image_base))
                    }
                }
            }
        },
    )
}

pub fn not_found_page() -> String {
    page(
        "Not found — cinelog",
        html! {
            main class="container mx-auto px-4 py-16 text-center" {
                h1 class="text-2xl font-bold mb-2" { "We could not find that movie" }
                p class="text-gray-400 mb-8" { "It may never have existed, or it left the catalog." }
                a class="text-blue-400 hover:text-blue-300" href="/" { "Back to home" }
            }
        },
    )
}

pub fn error_page(message: String) -> String {
    page(
        "Error — cinelog",
        html! {
            main class="container mx-auto px-4 py-16" {
                div class="max-w-xl mx-auto bg-gray-800 rounded-lg p-8" {
                    h1 class="text-2xl font-bold mb-4" { "Something went wrong" }
                    p class="text-gray-300" { (message) }
                    a class="mt-6 inline-block text-blue-400 hover:text-blue-300" href="/" { "Back" }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body class="min-h-screen bg-gray-900 text-gray-100" {
                nav class="border-b border-gray-800" {
                    div class="container mx-auto flex items-center gap-6 px-4 py-3" {
                        a class="text-lg font-bold text-white" href="/" { "cinelog" }
                        a class="text-sm text-gray-300 hover:text-white" href="/search" { "Search" }
                        a class="text-sm text-gray-300 hover:text-white" href="/mylist" { "My list" }
                    }
                }
                (body)
            }
        }
    }
    .into_string()
}

/// The criteria form. Keyword, search type, and sort submit as a GET to
/// `/search`; the genre chips are plain links that toggle one genre while
/// preserving the rest of the criteria. The form never carries a page
/// parameter, so editing criteria always restarts at page one.
fn search_form(criteria: &SearchCriteria, genres: &[Genre]) -> Markup {
    html! {
        form class="space-y-4" method="get" action="/search" {
            input type="hidden" name="genres" value=(criteria.genres_csv());

            div class="flex flex-col gap-2 sm:flex-row" {
                input class="flex-1 rounded-lg border border-gray-700 bg-gray-800 px-3 py-2 focus:border-blue-500 focus:outline-none"
                    type="search" name="query" value=(criteria.query) placeholder="Search by title or person";
                select class="rounded-lg border border-gray-700 bg-gray-800 px-3 py-2" name="searchType" {
                    option value="movie" selected[criteria.search_type == SearchType::Movie] { "Titles" }
                    option value="person" selected[criteria.search_type == SearchType::Person] { "People" }
                }
            }

            @if !genres.is_empty() {
                div {
                    h3 class="text-sm font-semibold text-gray-300 mb-2" { "Genres" }
                    div class="flex flex-wrap gap-2" {
                        @for genre in genres {
                            (genre_chip(criteria, genre))
                        }
                    }
                }
            }

            div {
                h3 class="text-sm font-semibold text-gray-300 mb-2" { "Sort by" }
                div class="flex flex-wrap gap-x-4 gap-y-2" {
                    @for sort in SortOrder::ALL {
                        label class="flex items-center gap-2 cursor-pointer text-sm" {
                            input type="radio" name="sort" value=(sort.as_param()) checked[criteria.sort == sort];
                            (sort.label())
                        }
                    }
                }
            }

            button class="w-full sm:w-auto rounded-lg bg-blue-600 hover:bg-blue-700 text-white font-bold py-2 px-6" type="submit" {
                "Search"
            }
        }
    }
}

fn genre_chip(criteria: &SearchCriteria, genre: &Genre) -> Markup {
    let selected = criteria.genres.contains(&genre.id);
    let class = if selected {
        "text-sm rounded-full px-3 py-1 bg-blue-600 text-white"
    } else {
        "text-sm rounded-full px-3 py-1 bg-gray-700 hover:bg-gray-600 text-white"
    };
    let href =
        format!("/search?{}", criteria.with_genre_toggled(genre.id).to_query_string(None));
    html! { a class=(class) href=(href) { (genre.name) } }
}

fn movie_tile(
    id: i32,
    title: &str,
    poster_path: Option<&str>,
    badge: Option<WatchStatus>,
    image_base: &str,
) -> Markup {
    html! {
        div class="relative" {
            a class="block hover:scale-105 transition-transform" href=(format!("/movies/{id}")) {
                (poster(title, poster_path, image_base))
                h2 class="text-sm mt-2 truncate" { (title) }
            }
            @if let Some(status) = badge {
                (status_badge(status))
            }
        }
    }
}

fn poster(title: &str, poster_path: Option<&str>, image_base: &str) -> Markup {
    html! {
        @if let Some(path) = poster_path {
            img class="w-full aspect-[2/3] object-cover rounded-lg shadow-md" src=(format!("{image_base}{path}")) alt=(title);
        } @else {
            div class="bg-gray-700 aspect-[2/3] w-full rounded-lg flex items-center justify-center" {
                p class="text-xs text-gray-400" { "No poster" }
            }
        }
    }
}

fn status_badge(status: WatchStatus) -> Markup {
    let color = match status {
        WatchStatus::WantToWatch => "bg-blue-600",
        WatchStatus::Watched => "bg-purple-600",
    };
    html! {
        div class=(format!("absolute top-2 left-2 text-xs text-white font-bold py-1 px-2 rounded {color}")) {
            (status.label())
        }
    }
}

fn list_section(
    title: &str,
    tiles: &[LogTile],
    status: WatchStatus,
    image_base: &str,
) -> Markup {
    html! {
        section class="mb-12" {
            div class="flex items-center gap-3 mb-6" {
                h2 class="text-2xl font-bold" { (title) }
                span class="text-sm text-gray-400 bg-gray-800 px-3 py-1 rounded-full" { (tiles.len()) }
            }
            div class=(GRID) {
                @for tile in tiles {
                    div class="relative" {
                        (movie_tile(tile.tmdb_id, &tile.title, tile.poster_path.as_deref(), Some(status), image_base))
                        @if status == WatchStatus::WantToWatch {
                            (want_tile_actions(tile.tmdb_id))
                        }
                    }
                }
            }
        }
    }
}

fn want_tile_actions(id: i32) -> Markup {
    html! {
        div class="absolute top-2 right-2 flex flex-col gap-1" {
            form method="post" action=(format!("/movies/{id}/watched")) {
                input type="hidden" name="back" value="/mylist";
                button class="bg-black bg-opacity-70 text-white text-xs rounded-full px-2 py-1" type="submit" { "Watched" }
            }
            form method="post" action=(format!("/movies/{id}/delete")) {
                input type="hidden" name="back" value="/mylist";
                button class="bg-red-700 bg-opacity-80 text-white text-xs rounded-full px-2 py-1" type="submit" { "Remove" }
            }
        }
    }
}

fn log_actions(movie: &MovieDetails, log: Option<&log_entry::Model>) -> Markup {
    match log.and_then(|l| WatchStatus::parse(&l.status)) {
        Some(WatchStatus::WantToWatch) => html! {
            div class="rounded-lg bg-blue-600 text-white text-center py-2 px-4" { "On your want-to-watch list" }
            div class="flex gap-2" {
                form class="flex-1" method="post" action=(format!("/movies/{}/watched", movie.id)) {
                    button class="w-full rounded-lg bg-purple-600 hover:bg-purple-700 text-white font-bold py-2 px-4" type="submit" {
                        "Mark watched"
                    }
                }
                (remove_form(movie.id))
            }
        },
        Some(WatchStatus::Watched) => html! {
            (log_editor(movie, log))
            (remove_form(movie.id))
        },
        None => html! {
            (want_button(movie))
            (log_editor(movie, log))
        },
    }
}

fn want_button(movie: &MovieDetails) -> Markup {
    html! {
        form method="post" action=(format!("/movies/{}/want", movie.id)) {
            (hidden_movie_fields(movie))
            button class="w-full rounded-lg bg-blue-600 hover:bg-blue-700 text-white font-bold py-2 px-4" type="submit" {
                "Add to want-to-watch"
            }
        }
    }
}

fn remove_form(id: i32) -> Markup {
    html! {
        form method="post" action=(format!("/movies/{id}/delete")) {
            button class="rounded-lg bg-red-700 hover:bg-red-600 text-white text-sm font-bold py-2 px-4" type="submit" {
                "Remove from list"
            }
        }
    }
}

fn log_editor(movie: &MovieDetails, log: Option<&log_entry::Model>) -> Markup {
    let rating = log.and_then(|l| l.rating).unwrap_or(0);
    let comment = log.and_then(|l| l.comment.as_deref()).unwrap_or("");
    let date = log.and_then(|l| l.watched_date.as_deref()).unwrap_or("");

    html! {
        form class="bg-gray-800 p-4 rounded-lg space-y-4" method="post" action=(format!("/movies/{}/log", movie.id)) {
            h3 class="text-lg font-bold" { "Log this movie" }
            (hidden_movie_fields(movie))

            div {
                label class="block text-sm font-medium text-gray-300 mb-1" for="watched-date" { "Watched on" }
                input class="w-full rounded-lg bg-gray-700 px-3 py-2 border border-gray-600"
                    id="watched-date" type="date" name="watchedDate" value=(date);
            }

            div {
                span class="block text-sm font-medium text-gray-300 mb-1" { "Rating" }
                div class="flex gap-2" {
                    @for star in 1..=5 {
                        label class="cursor-pointer text-2xl" {
                            input class="hidden" type="radio" name="rating" value=(star) checked[rating == star];
                            span class=(if star <= rating { "text-yellow-400" } else { "text-gray-500" }) { "★" }
                        }
                    }
                }
            }

            div {
                label class="block text-sm font-medium text-gray-300 mb-1" for="comment" { "Notes" }
                textarea class="w-full h-24 rounded-lg bg-gray-700 p-2 border border-gray-600"
                    id="comment" name="comment" placeholder="What did you think?" { (comment) }
            }

            button class="w-full rounded-lg bg-purple-600 hover:bg-purple-700 text-white font-bold py-2 px-4" type="submit" {
                "Save log"
            }
        }
    }
}

fn hidden_movie_fields(movie: &MovieDetails) -> Markup {
    html! {
        input type="hidden" name="title" value=(movie.title);
        @if let Some(path) = &movie.poster_path {
            input type="hidden" name="posterPath" value=(path);
        }
    }
}
