//! Loader of the MovieLens-100k tables.
//!
//! The three files have no header row and are latin-1 encoded:
//!
//! * `u.data`: tab-separated ratings, see [`DATA_HEADER`],
//! * `u.item`: pipe-separated movies, five metadata columns followed by 19 binary
//!   genre columns, see [`ITEM_HEADER`],
//! * `u.user`: pipe-separated users, see [`USER_HEADER`].
use crate::{RecoError, N_GENRES};
use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Read, path::Path};

/// Columns of `u.data`.
pub const DATA_HEADER: &str = "user id | item id | rating | timestamp";

/// Columns of `u.item`.
pub const ITEM_HEADER: &str = "movie id | movie title | release date | video release date | \
    IMDb URL | unknown | Action | Adventure | Animation | Children's | Comedy | Crime | \
    Documentary | Drama | Fantasy | Film-Noir | Horror | Musical | Mystery | Romance | \
    Sci-Fi | Thriller | War | Western";

/// Columns of `u.user`.
pub const USER_HEADER: &str = "user id | age | gender | occupation | zip code";

const DATA_FILE: &str = "u.data";
const ITEM_FILE: &str = "u.item";
const USER_FILE: &str = "u.user";

// Columns of `u.item` preceding the genre indicators.
const ITEM_META_COLUMNS: usize = 5;

/// Converts a header of the MovieLens documentation into column names.
///
/// `"user id | item id"` becomes `["user_id", "item_id"]`.
pub fn column_names(header: &str) -> Vec<String> {
    header
        .split('|')
        .map(|c| c.trim().replace(' ', "_"))
        .collect()
}

/// A row of `u.data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub user_id: u32,
    pub item_id: u32,
    /// Star rating in `1..=5`.
    pub rating: u8,
    /// Unix seconds.
    pub timestamp: i64,
}

/// A row of `u.item`.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub movie_id: u32,
    pub title: String,
    pub release_date: String,
    pub video_release_date: String,
    pub imdb_url: String,
    /// Genre indicators, `1.0` if the movie belongs to the genre.
    pub genres: [f32; N_GENRES],
}

/// A row of `u.user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: u32,
    pub age: u32,
    pub gender: String,
    pub occupation: String,
    pub zip_code: String,
}

/// The three tables of the dataset.
#[derive(Debug, Clone, Default)]
pub struct MovieLens {
    pub ratings: Vec<RatingRecord>,
    pub items: Vec<ItemRecord>,
    pub users: Vec<UserRecord>,
}

fn latin1(field: &[u8]) -> String {
    field.iter().map(|&b| b as char).collect()
}

/// Reads all rows of a headerless file, checking the number of columns of every row.
fn read_rows(rdr: impl Read, delimiter: u8, file: &str, header: &str) -> Result<Vec<ByteRecord>> {
    let expected = column_names(header).len();
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .quoting(false)
        .flexible(true)
        .from_reader(rdr);

    let mut rows = vec![];
    for (row, record) in rdr.byte_records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {} of {}", row, file))?;
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        if record.len() != expected {
            return Err(RecoError::ColumnCount {
                file: file.to_string(),
                row,
                found: record.len(),
                expected,
            }
            .into());
        }
        rows.push(record);
    }
    Ok(rows)
}

fn parse<T: std::str::FromStr>(
    record: &ByteRecord,
    ix: usize,
    file: &str,
    row: usize,
    header: &str,
) -> Result<T, RecoError> {
    let value = latin1(&record[ix]);
    value.trim().parse().map_err(|_| RecoError::Parse {
        file: file.to_string(),
        row,
        column: column_names(header)[ix].clone(),
        value,
    })
}

impl MovieLens {
    /// Loads `u.data`, `u.item` and `u.user` from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let open = |name: &str| {
            let path = dir.join(name);
            File::open(&path).with_context(|| format!("Failed to open {:?}", path))
        };
        info!("Load MovieLens tables from {:?}", dir);
        Self::from_readers(open(DATA_FILE)?, open(ITEM_FILE)?, open(USER_FILE)?)
    }

    /// Parses the tables from readers with the content of `u.data`, `u.item` and `u.user`.
    pub fn from_readers(ratings: impl Read, items: impl Read, users: impl Read) -> Result<Self> {
        let ratings = Self::parse_ratings(ratings)?;
        let items = Self::parse_items(items)?;
        let users = Self::parse_users(users)?;
        debug!(
            "Parsed {} ratings, {} items, {} users",
            ratings.len(),
            items.len(),
            users.len()
        );
        Ok(Self {
            ratings,
            items,
            users,
        })
    }

    fn parse_ratings(rdr: impl Read) -> Result<Vec<RatingRecord>> {
        read_rows(rdr, b'\t', DATA_FILE, DATA_HEADER)?
            .iter()
            .enumerate()
            .map(|(row, record)| -> Result<RatingRecord> {
                let rating: RatingRecord = record
                    .deserialize(None)
                    .with_context(|| format!("Failed to parse row {} of {}", row, DATA_FILE))?;
                if !(1..=5).contains(&rating.rating) {
                    return Err(RecoError::InvalidRating {
                        row,
                        rating: rating.rating,
                    }
                    .into());
                }
                Ok(rating)
            })
            .collect()
    }

    fn parse_items(rdr: impl Read) -> Result<Vec<ItemRecord>> {
        read_rows(rdr, b'|', ITEM_FILE, ITEM_HEADER)?
            .iter()
            .enumerate()
            .map(|(row, record)| -> Result<ItemRecord> {
                let mut genres = [0f32; N_GENRES];
                for (i, genre) in genres.iter_mut().enumerate() {
                    *genre = parse(record, ITEM_META_COLUMNS + i, ITEM_FILE, row, ITEM_HEADER)?;
                }
                Ok(ItemRecord {
                    movie_id: parse(record, 0, ITEM_FILE, row, ITEM_HEADER)?,
                    title: latin1(&record[1]),
                    release_date: latin1(&record[2]),
                    video_release_date: latin1(&record[3]),
                    imdb_url: latin1(&record[4]),
                    genres,
                })
            })
            .collect()
    }

    fn parse_users(rdr: impl Read) -> Result<Vec<UserRecord>> {
        read_rows(rdr, b'|', USER_FILE, USER_HEADER)?
            .iter()
            .enumerate()
            .map(|(row, record)| -> Result<UserRecord> {
                Ok(UserRecord {
                    user_id: parse(record, 0, USER_FILE, row, USER_HEADER)?,
                    age: parse(record, 1, USER_FILE, row, USER_HEADER)?,
                    gender: latin1(&record[2]),
                    occupation: latin1(&record[3]),
                    zip_code: latin1(&record[4]),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test::{U_DATA, U_ITEM, U_USER};

    #[test]
    fn test_column_names() {
        assert_eq!(
            column_names(DATA_HEADER),
            vec!["user_id", "item_id", "rating", "timestamp"]
        );
        let items = column_names(ITEM_HEADER);
        assert_eq!(items.len(), ITEM_META_COLUMNS + N_GENRES);
        assert_eq!(items[4], "IMDb_URL");
        assert_eq!(items[23], "Western");
    }

    #[test]
    fn test_from_readers() -> Result<()> {
        let data = MovieLens::from_readers(U_DATA.as_bytes(), U_ITEM, U_USER.as_bytes())?;
        assert_eq!(data.ratings.len(), 8);
        assert_eq!(
            data.ratings[0],
            RatingRecord {
                user_id: 1,
                item_id: 1,
                rating: 5,
                timestamp: 874965758
            }
        );

        assert_eq!(data.items.len(), 4);
        // latin-1 byte 0xE9
        assert_eq!(data.items[2].title, "Les Misérables (1995)");
        assert_eq!(data.items[0].genres.iter().sum::<f32>(), 3.0);
        assert_eq!(data.items[0].genres[3], 1.0);
        assert!(data.items[1].video_release_date.is_empty());

        assert_eq!(data.users.len(), 5);
        assert_eq!(data.users[2].gender, "m");
        assert_eq!(data.users[0].zip_code, "85711");
        Ok(())
    }

    #[test]
    fn test_invalid_rating() {
        let ratings = "1\t1\t5\t0\n1\t2\t6\t0\n";
        let err = MovieLens::from_readers(ratings.as_bytes(), U_ITEM, U_USER.as_bytes())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<RecoError>(),
            Some(&RecoError::InvalidRating { row: 1, rating: 6 })
        );
    }

    #[test]
    fn test_column_count() {
        let users = "1|24|M|technician\n";
        let err = MovieLens::from_readers(U_DATA.as_bytes(), U_ITEM, users.as_bytes())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<RecoError>(),
            Some(&RecoError::ColumnCount {
                file: "u.user".to_string(),
                row: 0,
                found: 4,
                expected: 5,
            })
        );
    }

    #[test]
    fn test_unparsable_age() {
        let users = "1|old|M|technician|85711\n";
        let err = MovieLens::from_readers(U_DATA.as_bytes(), U_ITEM, users.as_bytes())
            .unwrap_err();
        match err.downcast_ref::<RecoError>() {
            Some(RecoError::Parse { column, value, .. }) => {
                assert_eq!(column, "age");
                assert_eq!(value, "old");
            }
            _ => panic!("unexpected error: {}", err),
        }
    }
}
