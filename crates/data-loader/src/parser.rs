//! Parsers for the two artifact files.
//!
//! - movies.dat: movieId::title (one movie per line, line order = row index)
//! - similarity.dat: one matrix row per line, values separated by
//!   whitespace and/or commas

use crate::error::{DataLoadError, Result};
use crate::types::*;
use rayon::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a file as ISO-8859-1 (Latin-1).
///
/// Titles in the exported catalog are not guaranteed to be UTF-8, and
/// Latin-1 maps every byte to a code point, so this never fails on content.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = File::open(path).map_err(|_| DataLoadError::FileNotFound {
        path: path.display().to_string(),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content: String = bytes.iter().map(|&b| b as char).collect();

    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the movies.dat file into a catalog.
///
/// Format: movieId::title
///
/// Only the first `::` separates the fields, so titles may contain it.
pub fn parse_movies(path: &Path) -> Result<Catalog> {
    let lines = read_lines_latin1(path)?;
    let movies = parse_movie_lines(&file_label(path), &lines)?;
    Catalog::new(movies)
}

fn parse_movie_lines(file: &str, lines: &[String]) -> Result<Vec<Movie>> {
    let mut movies = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let mut parts = line_trimmed.splitn(2, "::");

        let movie_id = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: "Missing movieId".to_string(),
        })?;

        let title = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: "Missing title".to_string(),
        })?;

        let title = title.trim();
        if title.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Empty title".to_string(),
            });
        }

        movies.push(Movie {
            id: movie_id.trim().parse().map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Invalid movieId: {}", e),
            })?,
            title: title.to_string(),
        });
    }

    Ok(movies)
}

/// Parse the similarity.dat file into a square matrix.
///
/// Rows are parsed in parallel with rayon. Bytes outside ASCII can't be
/// part of a number, so they surface as a parse error on their line.
pub fn parse_similarity(path: &Path) -> Result<SimilarityMatrix> {
    let lines = read_lines_latin1(path)?;
    let rows = parse_similarity_lines(&file_label(path), &lines)?;
    SimilarityMatrix::from_rows(rows)
}

fn parse_similarity_lines(file: &str, lines: &[String]) -> Result<Vec<Vec<f32>>> {
    let lines: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    lines
        .par_iter()
        .map(|&(line_no, line)| parse_similarity_row(file, line_no, line))
        .collect()
}

fn parse_similarity_row(file: &str, line_no: usize, line: &str) -> Result<Vec<f32>> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .map(|field| {
            field.parse::<f32>().map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Invalid similarity value '{}': {}", field, e),
            })
        })
        .collect()
}
