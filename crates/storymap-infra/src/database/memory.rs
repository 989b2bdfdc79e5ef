//! In-memory repositories.
//!
//! Back the server when `DATABASE_URL` is not configured and serve as
//! the storage for handler-level tests. Single-process only.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use storymap_core::domain::{GeoPoint, Post, User};
use storymap_core::error::RepoError;
use storymap_core::ports::{BaseRepository, CountryCount, PostRepository, UserRepository};

/// HashMap-backed user repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().unwrap();
        let clash = users
            .values()
            .any(|u| u.username == user.username && u.id != user.id);
        if clash {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().unwrap();
        if !users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        let clash = users
            .values()
            .any(|u| u.username == user.username && u.id != user.id);
        if clash {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.users.write().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let mut users: Vec<User> = self.users.read().unwrap().values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn count_all(&self) -> Result<i64, RepoError> {
        Ok(self.users.read().unwrap().len() as i64)
    }
}

/// HashMap-backed post repository.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().unwrap().get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        self.posts.write().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().unwrap();
        if !posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.posts.write().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self.posts.read().unwrap().values().cloned().collect();
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
            .posts
            .read()
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
        for post in self.posts.read().unwrap().values() {
            if let Some(country) = &post.country {
                let code = post.country_code.clone().unwrap_or_default();
                *counts.entry((country.clone(), code)).or_insert(0) += 1;
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
        let mut missing: Vec<Post> = self
            .posts
            .read()
            .unwrap()
            .values()
            .filter(|p| p.country.is_none())
            .cloned()
            .collect();
        missing.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        missing.truncate(batch as usize);
        Ok(missing)
    }

    async fn count_all(&self) -> Result<i64, RepoError> {
        Ok(self.posts.read().unwrap().len() as i64)
    }

    async fn count_pending(&self) -> Result<i64, RepoError> {
        Ok(self
            .posts
            .read()
            .unwrap()
            .values()
            .filter(|p| p.is_pending)
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_at(lat: f64, lng: f64, country: Option<(&str, &str)>) -> Post {
        let mut post = Post::new(
            Uuid::new_v4(),
            "title".to_string(),
            "content".to_string(),
            GeoPoint::new(lat, lng).unwrap(),
            None,
        );
        if let Some((name, code)) = country {
            post.country = Some(name.to_string());
            post.country_code = Some(code.to_string());
        }
        post
    }

    #[tokio::test]
    async fn duplicate_username_is_a_constraint_violation() {
        let repo = InMemoryUserRepository::new();
        repo.save(User::new("linh".to_string(), "hash".to_string()))
            .await
            .unwrap();

        let err = repo
            .save(User::new("linh".to_string(), "hash2".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn update_never_resurrects_a_deleted_post() {
        let repo = InMemoryPostRepository::new();
        let post = repo.save(post_at(21.0278, 105.8342, None)).await.unwrap();
        repo.delete(post.id).await.unwrap();

        let err = repo.update(post.clone()).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
        assert!(repo.find_by_id(post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_near_orders_nearest_first() {
        let repo = InMemoryPostRepository::new();
        let near = repo.save(post_at(21.0279, 105.8342, None)).await.unwrap();
        let far = repo.save(post_at(21.0400, 105.8342, None)).await.unwrap();
        repo.save(post_at(10.8231, 106.6297, None)).await.unwrap();

        let hits = repo.find_near(21.0278, 105.8342, 5_000.0).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, near.id);
        assert_eq!(hits[1].id, far.id);
    }

    #[tokio::test]
    async fn country_counts_order_by_count_then_name() {
        let repo = InMemoryPostRepository::new();
        for _ in 0..2 {
            repo.save(post_at(21.0, 105.8, Some(("Việt Nam", "VN"))))
                .await
                .unwrap();
        }
        repo.save(post_at(35.6, 139.7, Some(("Nhật Bản", "JP"))))
            .await
            .unwrap();
        repo.save(post_at(48.8, 2.35, Some(("Pháp", "FR"))))
            .await
            .unwrap();

        let rows = repo.count_by_country(10).await.unwrap();
        assert_eq!(rows[0].country_code, "VN");
        assert_eq!(rows[0].count, 2);
        // Tie between JP and FR broken by country name.
        assert_eq!(rows[1].country, "Nhật Bản");
        assert_eq!(rows[2].country, "Pháp");
    }
}
