//! Parser for MovieLens 100K data files.
//!
//! - u.user: userId|age|gender|occupation|zipcode
//! - u.item: movieId|title|release date|video release date|IMDb URL|genre flags...
//! - u.data: userId\tmovieId\tscore\ttimestamp
//!
//! Each file is parsed line by line; empty lines are skipped and every
//! error carries the file name and 1-based line number.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use chrono::NaiveDate;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

const USERS_FILE: &str = "u.user";
const MOVIES_FILE: &str = "u.item";
const RATINGS_FILE: &str = "u.data";

/// Release dates in u.item look like "01-Jan-1995"
const RELEASE_DATE_FORMAT: &str = "%d-%b-%Y";

/// Helper function to read a file with ISO-8859-1 encoding (Latin-1)
///
/// u.item contains Latin-1 titles, so the bytes are mapped straight to
/// code points instead of being decoded as UTF-8.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content: String = bytes.iter().map(|&b| b as char).collect();

    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn parse_error(file: &str, line: usize, reason: impl Into<String>) -> DataLoadError {
    DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: reason.into(),
    }
}

/// Pull the next field or fail with "Missing {name}"
fn next_field<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    file: &str,
    line: usize,
    name: &str,
) -> Result<&'a str> {
    parts
        .next()
        .ok_or_else(|| parse_error(file, line, format!("Missing {}", name)))
}

/// Parse a numeric field, reporting the offending text on failure
fn parse_field<T: std::str::FromStr>(value: &str, field: &str) -> Result<T> {
    value.trim().parse().map_err(|_| DataLoadError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_lines<T>(
    lines: &[String],
    parse_line: impl Fn(&str, usize) -> Result<T>,
) -> Result<Vec<T>> {
    let mut items = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        items.push(parse_line(line_trimmed, idx + 1)?);
    }
    Ok(items)
}

/// Parse the u.user file
pub fn parse_users(path: &Path) -> Result<Vec<User>> {
    let lines = read_lines_latin1(path)?;
    parse_lines(&lines, parse_user_line)
}

/// Parse the u.item file
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let lines = read_lines_latin1(path)?;
    parse_lines(&lines, parse_movie_line)
}

/// Parse the u.data file
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let lines = read_lines_latin1(path)?;
    parse_lines(&lines, parse_rating_line)
}

/// Parse one u.user line: `1|24|M|technician|85711`
///
/// Gender and occupation are read past but not kept.
pub fn parse_user_line(line: &str, line_no: usize) -> Result<User> {
    let mut parts = line.split('|');

    let user_id = next_field(&mut parts, USERS_FILE, line_no, "userId")?;
    let age = next_field(&mut parts, USERS_FILE, line_no, "age")?;
    let _gender = next_field(&mut parts, USERS_FILE, line_no, "gender")?;
    let _occupation = next_field(&mut parts, USERS_FILE, line_no, "occupation")?;
    let zipcode = next_field(&mut parts, USERS_FILE, line_no, "zipcode")?;

    let age = match non_empty(age) {
        Some(age) => Some(parse_field(&age, "age")?),
        None => None,
    };

    Ok(User {
        id: parse_field(user_id, "userId")?,
        age,
        zipcode: non_empty(zipcode),
    })
}

/// Parse one u.item line.
///
/// The year suffix is split off the title: "Toy Story (1995)" becomes
/// title "Toy Story" with year 1995. Genre flags are ignored.
pub fn parse_movie_line(line: &str, line_no: usize) -> Result<Movie> {
    let mut parts = line.split('|');

    let movie_id = next_field(&mut parts, MOVIES_FILE, line_no, "movieId")?;
    let raw_title = next_field(&mut parts, MOVIES_FILE, line_no, "title")?;
    let release_date = next_field(&mut parts, MOVIES_FILE, line_no, "release date")?;
    let _video_release = next_field(&mut parts, MOVIES_FILE, line_no, "video release date")?;
    let imdb_url = next_field(&mut parts, MOVIES_FILE, line_no, "IMDb URL")?;

    let released_at = match non_empty(release_date) {
        Some(date) => Some(
            NaiveDate::parse_from_str(&date, RELEASE_DATE_FORMAT).map_err(|e| {
                parse_error(
                    MOVIES_FILE,
                    line_no,
                    format!("Invalid release date '{}': {}", date, e),
                )
            })?,
        ),
        None => None,
    };

    let (title, year) = split_title_year(raw_title.trim());

    Ok(Movie {
        id: parse_field(movie_id, "movieId")?,
        title: title.to_string(),
        year,
        released_at,
        imdb_url: non_empty(imdb_url),
    })
}

/// Parse one u.data line: `196\t242\t3\t881250949`
pub fn parse_rating_line(line: &str, line_no: usize) -> Result<Rating> {
    let mut parts = line.split_whitespace();

    let user_id = next_field(&mut parts, RATINGS_FILE, line_no, "userId")?;
    let movie_id = next_field(&mut parts, RATINGS_FILE, line_no, "movieId")?;
    let score = next_field(&mut parts, RATINGS_FILE, line_no, "score")?;
    let timestamp = next_field(&mut parts, RATINGS_FILE, line_no, "timestamp")?;

    Ok(Rating {
        user_id: parse_field(user_id, "userId")?,
        movie_id: parse_field(movie_id, "movieId")?,
        score: parse_field(score, "score")?,
        timestamp: parse_field(timestamp, "timestamp")?,
    })
}

/// Extract year from movie title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
fn extract_year_from_title(title: &str) -> Option<u16> {
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end {
        let year_str = &title[start + 1..end];
        if let Ok(year) = year_str.parse::<u16>() {
            return Some(year);
        }
    }
    None
}

/// Split a trailing "(YYYY)" off a title.
///
/// Titles without a year suffix are returned unchanged.
fn split_title_year(title: &str) -> (&str, Option<u16>) {
    if !title.ends_with(')') {
        return (title, None);
    }
    match (extract_year_from_title(title), title.rfind('(')) {
        (Some(year), Some(start)) => (title[..start].trim_end(), Some(year)),
        _ => (title, None),
    }
}
