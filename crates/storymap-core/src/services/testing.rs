//! In-memory test doubles for the service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{GeoPoint, Post, User};
use crate::error::RepoError;
use crate::ports::{
    BaseRepository, CountryCount, CountryInfo, Geocoder, PostRepository, UserRepository,
};

/// HashMap-backed post repository.
#[derive(Default)]
pub struct MemoryPosts {
    inner: Mutex<HashMap<Uuid, Post>>,
}

impl MemoryPosts {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for MemoryPosts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.inner.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        self.inner.lock().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        inner.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.inner.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for MemoryPosts {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self.inner.lock().unwrap().values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_approved(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|p| !p.is_pending)
            .collect())
    }

    async fn find_near(&self, lat: f64, lng: f64, radius_m: f64) -> Result<Vec<Post>, RepoError> {
        let center = GeoPoint { lng, lat };
        let mut hits: Vec<(f64, Post)> = self
            .inner
            .lock()
            .unwrap()
            .values()
            .map(|p| (p.location.haversine_distance_m(&center), p.clone()))
            .filter(|(d, _)| *d <= radius_m)
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(hits.into_iter().map(|(_, p)| p).collect())
    }

    async fn count_by_country(&self, limit: u64) -> Result<Vec<CountryCount>, RepoError> {
        let mut counts: HashMap<(String, String), i64> = HashMap::new();
        for post in self.inner.lock().unwrap().values() {
            if let (Some(country), Some(code)) = (&post.country, &post.country_code) {
                *counts.entry((country.clone(), code.clone())).or_insert(0) += 1;
            }
        }
        let mut rows: Vec<CountryCount> = counts
            .into_iter()
            .map(|((country, country_code), count)| CountryCount {
                country,
                country_code,
                count,
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.country.cmp(&b.country)));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn find_missing_country(&self, batch: u64) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|p| p.country.is_none())
            .take(batch as usize)
            .collect())
    }

    async fn count_all(&self) -> Result<i64, RepoError> {
        Ok(self.inner.lock().unwrap().len() as i64)
    }

    async fn count_pending(&self) -> Result<i64, RepoError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.is_pending)
            .count() as i64)
    }
}

/// HashMap-backed user repository.
#[derive(Default)]
pub struct MemoryUsers {
    inner: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.inner.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        self.inner.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        inner.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.inner.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let mut users: Vec<User> = self.inner.lock().unwrap().values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn count_all(&self) -> Result<i64, RepoError> {
        Ok(self.inner.lock().unwrap().len() as i64)
    }
}

/// Geocoder double returning a fixed answer.
///
/// `FixedGeocoder::unavailable()` stands in for a timed-out or down
/// remote service, which the real client reports as `None`.
pub struct FixedGeocoder {
    result: Option<CountryInfo>,
}

impl FixedGeocoder {
    pub fn returning(country: &str, code: &str) -> Self {
        Self {
            result: Some(CountryInfo {
                country: country.to_string(),
                country_code: Some(code.to_string()),
            }),
        }
    }

    /// A provider answer carrying the country name but no ISO code.
    pub fn country_only(country: &str) -> Self {
        Self {
            result: Some(CountryInfo {
                country: country.to_string(),
                country_code: None,
            }),
        }
    }

    pub fn unavailable() -> Self {
        Self { result: None }
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn reverse_geocode(&self, _lat: f64, _lng: f64) -> Option<CountryInfo> {
        self.result.clone()
    }
}
