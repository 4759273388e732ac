//! Lookup tables and bucketing of features.
use crate::{ItemRecord, RatingRecord, RecoError, RecoObs, UserRecord};
use ndarray::Array1;
use std::collections::{BTreeSet, HashMap};

/// The number of genre indicators of a movie.
pub const N_GENRES: usize = 19;

/// The number of age buckets.
pub const N_AGE_BUCKETS: usize = 7;

/// The number of gender buckets.
pub const N_GENDERS: usize = 2;

/// Mean rating of a user or a movie without any rating.
pub const DEFAULT_MEAN_RATING: f32 = 3.0;

const MAX_RATING: f32 = 5.0;

/// Returns a vector of length `num` with `1.0` at `selection` and `0.0` elsewhere.
pub fn one_hot(num: usize, selection: usize) -> Array1<f32> {
    debug_assert!(selection < num);
    let mut v = Array1::zeros(num);
    v[selection] = 1.0;
    v
}

/// Bucket of an age: `<10`, `10-19`, ..., `50-59`, `>=60` map to `0..=6`.
pub fn age_bucket(age: u32) -> usize {
    match age {
        0..=9 => 0,
        10..=19 => 1,
        20..=29 => 2,
        30..=39 => 3,
        40..=49 => 4,
        50..=59 => 5,
        _ => 6,
    }
}

/// Bucket of a gender: `"M"` in any case maps to `0`, anything else to `1`.
pub fn gender_bucket(gender: &str) -> usize {
    if gender.eq_ignore_ascii_case("m") {
        0
    } else {
        1
    }
}

/// Sorted set of the occupations of the user table.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupationVocab(Vec<String>);

impl OccupationVocab {
    pub fn new<'a>(occupations: impl IntoIterator<Item = &'a str>) -> Self {
        let set: BTreeSet<&str> = occupations.into_iter().collect();
        Self(set.into_iter().map(String::from).collect())
    }

    /// Index of `job` in the vocabulary.
    pub fn index(&self, job: &str) -> Result<usize, RecoError> {
        self.0
            .binary_search_by(|o| o.as_str().cmp(job))
            .map_err(|_| RecoError::UnknownOccupation(job.to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Genre indicators keyed by movie id.
///
/// A movie missing from the item table has no genre, i.e., an all-zero vector.
#[derive(Debug, Clone, Default)]
pub struct GenreTable(HashMap<u32, [f32; N_GENRES]>);

impl GenreTable {
    pub fn new(items: &[ItemRecord]) -> Self {
        Self(items.iter().map(|i| (i.movie_id, i.genres)).collect())
    }

    pub fn get(&self, movie_id: u32) -> [f32; N_GENRES] {
        self.0.get(&movie_id).copied().unwrap_or([0.0; N_GENRES])
    }
}

/// Attributes of a user used for features. The zip code is not used.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub age: u32,
    pub gender: String,
    pub occupation: String,
}

/// User profiles keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct UserTable(HashMap<u32, UserProfile>);

impl UserTable {
    pub fn new(users: &[UserRecord]) -> Self {
        Self(
            users
                .iter()
                .map(|u| {
                    let profile = UserProfile {
                        age: u.age,
                        gender: u.gender.clone(),
                        occupation: u.occupation.clone(),
                    };
                    (u.user_id, profile)
                })
                .collect(),
        )
    }

    pub fn get(&self, user_id: u32) -> Result<&UserProfile, RecoError> {
        self.0.get(&user_id).ok_or(RecoError::UnknownUser(user_id))
    }
}

/// Mean rating keyed by user id or movie id.
///
/// Keys without any rating fall back to [`DEFAULT_MEAN_RATING`].
#[derive(Debug, Clone, Default)]
pub struct MeanRatings(HashMap<u32, f32>);

impl MeanRatings {
    /// Computes the mean rating per key from `(key, rating)` pairs.
    pub fn new(pairs: impl IntoIterator<Item = (u32, u8)>) -> Self {
        let mut sums: HashMap<u32, (f64, usize)> = HashMap::new();
        for (key, rating) in pairs {
            let e = sums.entry(key).or_insert((0.0, 0));
            e.0 += rating as f64;
            e.1 += 1;
        }
        Self(
            sums.into_iter()
                .map(|(k, (sum, n))| (k, (sum / n as f64) as f32))
                .collect(),
        )
    }

    pub fn get(&self, key: u32) -> f32 {
        self.0.get(&key).copied().unwrap_or(DEFAULT_MEAN_RATING)
    }
}

/// Immutable tables an environment derives its observations and rewards from.
///
/// Building the tables is the expensive part of constructing an environment. They can be
/// shared by several environments through an [`Arc`](std::sync::Arc).
#[derive(Debug, Clone)]
pub struct FeatureTables {
    ratings: Vec<RatingRecord>,
    genres: GenreTable,
    users: UserTable,
    occupations: OccupationVocab,
    user_means: MeanRatings,
    movie_means: MeanRatings,
}

impl FeatureTables {
    pub fn new(ratings: Vec<RatingRecord>, items: &[ItemRecord], users: &[UserRecord]) -> Self {
        let user_means = MeanRatings::new(ratings.iter().map(|r| (r.user_id, r.rating)));
        let movie_means = MeanRatings::new(ratings.iter().map(|r| (r.item_id, r.rating)));
        Self {
            genres: GenreTable::new(items),
            users: UserTable::new(users),
            occupations: OccupationVocab::new(users.iter().map(|u| u.occupation.as_str())),
            user_means,
            movie_means,
            ratings,
        }
    }

    /// The number of rows of the rating table.
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn occupations(&self) -> &OccupationVocab {
        &self.occupations
    }

    pub fn user_means(&self) -> &MeanRatings {
        &self.user_means
    }

    pub fn movie_means(&self) -> &MeanRatings {
        &self.movie_means
    }

    /// Length of the observation vector.
    pub fn obs_dim(&self) -> usize {
        2 + N_GENRES + N_AGE_BUCKETS + self.occupations.len() + N_GENDERS
    }

    fn row(&self, cursor: usize) -> Result<&RatingRecord, RecoError> {
        self.ratings
            .get(cursor)
            .ok_or(RecoError::CursorOutOfRange(cursor))
    }

    /// The rating given in row `cursor`.
    pub fn rating(&self, cursor: usize) -> Result<u8, RecoError> {
        Ok(self.row(cursor)?.rating)
    }

    /// Builds the observation of row `cursor`.
    pub fn observation(&self, cursor: usize) -> Result<RecoObs, RecoError> {
        let row = self.row(cursor)?;
        let user = self.users.get(row.user_id)?;
        let occupation = self.occupations.index(&user.occupation)?;

        let mut obs = Vec::with_capacity(self.obs_dim());
        obs.push(self.user_means.get(row.user_id) / MAX_RATING);
        obs.push(self.movie_means.get(row.item_id) / MAX_RATING);
        obs.extend_from_slice(&self.genres.get(row.item_id));
        obs.extend(one_hot(N_AGE_BUCKETS, age_bucket(user.age)).iter());
        obs.extend(one_hot(self.occupations.len(), occupation).iter());
        obs.extend(one_hot(N_GENDERS, gender_bucket(&user.gender)).iter());
        debug_assert_eq!(obs.len(), self.obs_dim());

        Ok(obs.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test::dataset;

    #[test]
    fn test_age_bucket() {
        assert_eq!(age_bucket(0), 0);
        assert_eq!(age_bucket(9), 0);
        assert_eq!(age_bucket(10), 1);
        assert_eq!(age_bucket(19), 1);
        assert_eq!(age_bucket(20), 2);
        assert_eq!(age_bucket(45), 4);
        assert_eq!(age_bucket(59), 5);
        assert_eq!(age_bucket(60), 6);
        assert_eq!(age_bucket(99), 6);
    }

    #[test]
    fn test_gender_bucket() {
        assert_eq!(gender_bucket("M"), 0);
        assert_eq!(gender_bucket("m"), 0);
        assert_eq!(gender_bucket("F"), 1);
        assert_eq!(gender_bucket("f"), 1);
        assert_eq!(gender_bucket(""), 1);
        assert_eq!(gender_bucket("male"), 1);
    }

    #[test]
    fn test_one_hot() {
        assert_eq!(one_hot(3, 1).to_vec(), vec![0f32, 1.0, 0.0]);
        assert_eq!(one_hot(1, 0).to_vec(), vec![1f32]);
    }

    #[test]
    fn test_occupation_vocab() {
        let vocab = OccupationVocab::new(vec!["writer", "artist", "writer", "doctor"]);
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["artist", "doctor", "writer"]);
        assert_eq!(vocab.index("doctor"), Ok(1));
        assert_eq!(
            vocab.index("astronaut"),
            Err(RecoError::UnknownOccupation("astronaut".to_string()))
        );
    }

    #[test]
    fn test_mean_ratings() {
        let means = MeanRatings::new(vec![(1, 5), (1, 2), (2, 4)]);
        assert_eq!(means.get(1), 3.5);
        assert_eq!(means.get(2), 4.0);
        assert_eq!(means.get(42), DEFAULT_MEAN_RATING);
    }

    #[test]
    fn test_genre_table_default() {
        let data = dataset().unwrap();
        let genres = GenreTable::new(&data.items);
        assert_eq!(genres.get(2)[1], 1.0);
        assert_eq!(genres.get(1000), [0.0; N_GENRES]);
    }

    #[test]
    fn test_observation_layout() {
        let data = dataset().unwrap();
        let tables = FeatureTables::new(data.ratings.clone(), &data.items, &data.users);
        assert_eq!(tables.occupations().len(), 5);
        assert_eq!(tables.obs_dim(), 35);

        // Row 0: user 1 (24, M, technician) rates movie 1
        let obs = tables.observation(0).unwrap();
        let obs = obs.as_slice();
        assert_eq!(obs.len(), 35);
        assert!((obs[0] - 4.0 / 5.0).abs() < 1e-6);
        assert!((obs[1] - 13.0 / 15.0).abs() < 1e-6);
        assert_eq!(&obs[2..21], &data.items[0].genres[..]);
        // age 24 -> bucket 2
        assert_eq!(&obs[21..28], &[0f32, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        // occupations: other, retired, student, technician, writer
        assert_eq!(&obs[28..33], &[0f32, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(&obs[33..35], &[1f32, 0.0]);
    }

    #[test]
    fn test_observation_lookup_failures() {
        let data = dataset().unwrap();
        let mut ratings = data.ratings.clone();
        ratings.push(RatingRecord {
            user_id: 99,
            item_id: 1,
            rating: 3,
            timestamp: 0,
        });
        let tables = FeatureTables::new(ratings, &data.items, &data.users);
        assert_eq!(tables.observation(8), Err(RecoError::UnknownUser(99)));
        assert_eq!(tables.observation(9), Err(RecoError::CursorOutOfRange(9)));
    }
}
