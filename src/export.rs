use std::fs::File;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::gender::Gender;
use crate::parser::movie::Movie;
use crate::parser::person::Person;
use crate::store::ProfileStore;

/// Which list of a movie a person came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Director,
    Star,
}

/// One flattened (movie, role, person) record.
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub movie: String,
    pub role: Role,
    pub name: String,
    pub gender: Gender,
    pub id: String,
}

/// Flatten one movie: stars first, then directors, each in list order.
///
/// Classification runs here, which may fetch and cache profile pages as a
/// side effect of building rows.
pub fn flatten_movie(movie: &Movie, store: &ProfileStore) -> Vec<Row> {
    let row = |person: &Person, role: Role| Row {
        movie: movie.title.clone(),
        role,
        name: person.name.clone(),
        gender: person.gender(store),
        id: person.identity.clone(),
    };
    movie
        .stars
        .iter()
        .map(|p| row(p, Role::Star))
        .chain(movie.directors.iter().map(|p| row(p, Role::Director)))
        .collect()
}

/// Flatten a collection, movies in document order.
pub fn flatten_collection(movies: &[Movie], store: &ProfileStore) -> Vec<Row> {
    movies
        .iter()
        .flat_map(|movie| flatten_movie(movie, store))
        .collect()
}

pub fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Nested structured export, one object per movie with its people inlined.
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionExport {
    pub movies: Vec<MovieExport>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MovieExport {
    pub title: String,
    pub url: String,
    pub genre: String,
    pub rating: Option<f64>,
    pub directors: Vec<PersonExport>,
    pub stars: Vec<PersonExport>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PersonExport {
    pub name: String,
    pub url: String,
}

impl From<&Movie> for MovieExport {
    fn from(movie: &Movie) -> Self {
        let person = |p: &Person| PersonExport {
            name: p.name.clone(),
            url: p.url.clone(),
        };
        Self {
            title: movie.title.clone(),
            url: movie.url.clone(),
            genre: movie.genre.clone(),
            rating: movie.rating,
            directors: movie.directors.iter().map(person).collect(),
            stars: movie.stars.iter().map(person).collect(),
        }
    }
}

pub fn to_export(movies: &[Movie]) -> CollectionExport {
    CollectionExport {
        movies: movies.iter().map(MovieExport::from).collect(),
    }
}

pub fn write_json(movies: &[Movie], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &to_export(movies))?;
    Ok(())
}

// ── Tests ──
