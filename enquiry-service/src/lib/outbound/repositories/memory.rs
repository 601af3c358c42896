//! In-process storage adapters.
//!
//! Same contracts as the PostgreSQL adapters, including the uniqueness
//! rules on users, held behind tokio read/write locks. Nothing survives a
//! restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::enquiry::models::Enquiry;
use crate::domain::enquiry::models::EnquiryId;
use crate::domain::enquiry::ports::EnquiryRepository;
use crate::domain::enquiry::query::EnquiryFilter;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::enquiry::errors::EnquiryError;
use crate::user::errors::UserError;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject `user` if another stored user already holds its email or username.
    fn check_unique(users: &HashMap<UserId, User>, user: &User) -> Result<(), UserError> {
        for other in users.values().filter(|other| other.id != user.id) {
            if other.email == user.email {
                return Err(UserError::EmailAlreadyExists(user.email.to_string()));
            }
            if other.username == user.username {
                return Err(UserError::UsernameAlreadyExists(
                    user.username.as_str().to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        Self::check_unique(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| &user.username == username).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| &user.email == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut all: Vec<User> = self.users.read().await.values().cloned().collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(all)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        Self::check_unique(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        user.last_login = Some(at);
        user.updated_at = at;
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryEnquiryRepository {
    enquiries: RwLock<Vec<Enquiry>>,
}

impl InMemoryEnquiryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EnquiryRepository for InMemoryEnquiryRepository {
    async fn create(&self, enquiry: Enquiry) -> Result<Enquiry, EnquiryError> {
        self.enquiries.write().await.push(enquiry.clone());
        Ok(enquiry)
    }

    async fn find_by_id(&self, id: &EnquiryId) -> Result<Option<Enquiry>, EnquiryError> {
        let enquiries = self.enquiries.read().await;
        Ok(enquiries.iter().find(|enquiry| &enquiry.id == id).cloned())
    }

    async fn find_page(
        &self,
        filter: &EnquiryFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Enquiry>, EnquiryError> {
        let mut matching: Vec<Enquiry> = self
            .enquiries
            .read()
            .await
            .iter()
            .filter(|enquiry| filter.matches(enquiry))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(matching
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn count(&self, filter: &EnquiryFilter) -> Result<u64, EnquiryError> {
        let enquiries = self.enquiries.read().await;
        Ok(enquiries
            .iter()
            .filter(|enquiry| filter.matches(enquiry))
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use auth::Role;
    use chrono::Duration;
    use chrono::TimeZone;

    use super::*;
    use crate::domain::enquiry::query::EnquiryQuery;

    fn user(username: &str, email: &str, created_at: DateTime<Utc>) -> User {
        User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "hash".to_string(),
            role: Role::Admin,
            is_active: true,
            profile_pic: None,
            company_name: None,
            created_at,
            updated_at: created_at,
            last_login: None,
        }
    }

    fn enquiry(enquiry_type: &str, created_at: DateTime<Utc>) -> Enquiry {
        Enquiry {
            id: EnquiryId::new(),
            first_name: "Jane".to_string(),
            last_name: "Roe".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: String::new(),
            company_name: String::new(),
            enquiry_type: enquiry_type.to_string(),
            message: "Hello".to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn test_user_uniqueness() {
        let repository = InMemoryUserRepository::new();
        let now = Utc::now();

        repository
            .create(user("alice", "alice@example.com", now))
            .await
            .unwrap();

        let duplicate_email = repository
            .create(user("alice2", "alice@example.com", now))
            .await;
        assert!(matches!(
            duplicate_email,
            Err(UserError::EmailAlreadyExists(_))
        ));

        let duplicate_username = repository
            .create(user("alice", "other@example.com", now))
            .await;
        assert!(matches!(
            duplicate_username,
            Err(UserError::UsernameAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_user_lookups() {
        let repository = InMemoryUserRepository::new();
        let stored = repository
            .create(user("bob", "bob@example.com", Utc::now()))
            .await
            .unwrap();

        let by_email = repository
            .find_by_email(&EmailAddress::new("bob@example.com".to_string()).unwrap())
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(stored.id));

        let by_username = repository
            .find_by_username(&Username::new("bob".to_string()).unwrap())
            .await
            .unwrap();
        assert_eq!(by_username.map(|u| u.id), Some(stored.id));

        assert!(repository
            .find_by_id(&UserId::new())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let repository = InMemoryUserRepository::new();
        let now = Utc::now();

        repository
            .create(user("old", "old@example.com", now - Duration::days(2)))
            .await
            .unwrap();
        repository
            .create(user("new", "new@example.com", now))
            .await
            .unwrap();

        let all = repository.list_all().await.unwrap();
        assert_eq!(all[0].username.as_str(), "new");
        assert_eq!(all[1].username.as_str(), "old");
    }

    #[tokio::test]
    async fn test_record_login_and_delete() {
        let repository = InMemoryUserRepository::new();
        let stored = repository
            .create(user("carol", "carol@example.com", Utc::now()))
            .await
            .unwrap();

        let at = Utc::now();
        repository.record_login(&stored.id, at).await.unwrap();
        let reloaded = repository.find_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(reloaded.last_login, Some(at));

        repository.delete(&stored.id).await.unwrap();
        assert!(matches!(
            repository.delete(&stored.id).await,
            Err(UserError::NotFound(_))
        ));
        assert!(matches!(
            repository.record_login(&stored.id, at).await,
            Err(UserError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repository = InMemoryUserRepository::new();
        let result = repository
            .update(user("dave", "dave@example.com", Utc::now()))
            .await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_enquiry_page_is_newest_first_and_windowed() {
        let repository = InMemoryEnquiryRepository::new();
        let base = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();

        for minutes in 0..25 {
            repository
                .create(enquiry("sales", base + Duration::minutes(minutes)))
                .await
                .unwrap();
        }

        let query = EnquiryQuery::from_params(Some("3"), Some("10"), None, None);
        let page = repository
            .find_page(&query.filter, query.skip(), query.limit)
            .await
            .unwrap();

        assert_eq!(page.len(), 5);
        assert_eq!(page[0].created_at, base + Duration::minutes(4));
        assert_eq!(page[4].created_at, base);
        assert_eq!(repository.count(&query.filter).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_enquiry_page_far_beyond_data_is_empty() {
        let repository = InMemoryEnquiryRepository::new();
        repository
            .create(enquiry("sales", Utc::now()))
            .await
            .unwrap();

        let query = EnquiryQuery::from_params(Some("9223372036854775807"), Some("100"), None, None);
        let page = repository
            .find_page(&query.filter, query.skip(), query.limit)
            .await
            .unwrap();

        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_enquiries_with_equal_timestamps_have_stable_order() {
        let repository = InMemoryEnquiryRepository::new();
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();

        for _ in 0..6 {
            repository.create(enquiry("sales", at)).await.unwrap();
        }

        let filter = EnquiryQuery::default().filter;
        let first = repository.find_page(&filter, 0, 3).await.unwrap();
        let second = repository.find_page(&filter, 3, 3).await.unwrap();

        let ids: Vec<EnquiryId> = first.iter().chain(&second).map(|e| e.id).collect();
        let mut expected = ids.clone();
        expected.sort_by(|a, b| b.cmp(a));
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_enquiry_filters() {
        let repository = InMemoryEnquiryRepository::new();
        let day = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

        repository.create(enquiry("sales", day)).await.unwrap();
        repository.create(enquiry("support", day)).await.unwrap();
        repository
            .create(enquiry("sales", day + Duration::days(1)))
            .await
            .unwrap();

        let by_type = EnquiryQuery::from_params(None, None, Some("sales"), None);
        assert_eq!(repository.count(&by_type.filter).await.unwrap(), 2);

        let by_type_and_day =
            EnquiryQuery::from_params(None, None, Some("sales"), Some("2024-03-15"));
        let found = repository
            .find_page(&by_type_and_day.filter, 0, 10)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].created_at, day);
    }
}
