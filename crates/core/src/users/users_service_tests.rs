use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal_macros::dec;

use super::*;
use crate::errors::{Error, ErrorKind, Result};

fn created_at(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// In-memory user store shared with the pricing tests.
#[derive(Default)]
pub(crate) struct MockUserRepository {
    users: Mutex<Vec<User>>,
}

impl MockUserRepository {
    pub(crate) fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    fn with_user<T>(&self, user_id: &str, f: impl FnOnce(&mut User) -> T) -> Result<T> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::not_found("User", user_id))?;
        Ok(f(user))
    }
}

pub(crate) fn user(id: &str, discounts: Vec<Discount>) -> User {
    User {
        id: id.to_string(),
        name: format!("user {}", id),
        email: format!("{}@example.com", id),
        is_admin: false,
        created_at: created_at(1),
        discounts: DiscountTable::from_entries(discounts),
    }
}

#[async_trait]
impl UserRepositoryTrait for MockUserRepository {
    fn get_by_id(&self, user_id: &str) -> Result<User> {
        self.with_user(user_id, |u| u.clone())
    }

    fn list(&self) -> Result<Vec<User>> {
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let created = User {
            id: new_user
                .id
                .unwrap_or_else(|| format!("u{}", users.len() + 1)),
            name: new_user.name,
            email: new_user.email,
            is_admin: new_user.is_admin,
            created_at: created_at(1) + Duration::days(users.len() as i64),
            discounts: DiscountTable::new(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<User> {
        self.with_user(user_id, |u| {
            if let Some(name) = update.name {
                u.name = name;
            }
            if let Some(email) = update.email {
                u.email = email;
            }
            if let Some(is_admin) = update.is_admin {
                u.is_admin = is_admin;
            }
            u.clone()
        })
    }

    async fn delete(&self, user_id: &str) -> Result<usize> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != user_id);
        Ok(before - users.len())
    }

    async fn upsert_discount(&self, user_id: &str, discount: Discount) -> Result<DiscountTable> {
        self.with_user(user_id, |u| {
            u.discounts.upsert(&discount.service_id, discount.discount);
            u.discounts.clone()
        })
    }

    async fn remove_discount(&self, user_id: &str, service_id: &str) -> Result<DiscountTable> {
        self.with_user(user_id, |u| {
            u.discounts.remove(service_id);
            u.discounts.clone()
        })
    }
}

fn discount_service(users: Vec<User>) -> DiscountService {
    DiscountService::new(Arc::new(MockUserRepository::with_users(users)))
}

#[tokio::test]
async fn test_set_discount_then_replace() {
    let service = discount_service(vec![user("u1", vec![])]);

    let table = service.set_discount("u1", "100", dec!(10)).await.unwrap();
    assert_eq!(table.entries(), &[Discount::new("100", dec!(10))]);

    let table = service.set_discount("u1", "100", dec!(25)).await.unwrap();
    assert_eq!(table.entries(), &[Discount::new("100", dec!(25))]);
}

#[tokio::test]
async fn test_set_discount_is_idempotent() {
    let service = discount_service(vec![user("u1", vec![Discount::new("5", dec!(3))])]);
    service.set_discount("u1", "100", dec!(10)).await.unwrap();
    let table = service.set_discount("u1", "100", dec!(10)).await.unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.get("100"), Some(dec!(10)));
    // Replacement keeps position.
    let table = service.set_discount("u1", "5", dec!(4)).await.unwrap();
    assert_eq!(table.entries()[0], Discount::new("5", dec!(4)));
}

#[tokio::test]
async fn test_set_discount_validation() {
    let service = discount_service(vec![user("u1", vec![])]);
    for (user_id, service_id, percent) in [
        ("", "100", dec!(10)),
        ("u1", " ", dec!(10)),
        ("u1", "100", dec!(0)),
        ("u1", "100", dec!(101)),
        ("u1", "100", dec!(-5)),
    ] {
        let err = service
            .set_discount(user_id, service_id, percent)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{:?}", (user_id, service_id, percent));
    }
    assert!(service.get_discounts("u1").unwrap().is_empty());
}

#[tokio::test]
async fn test_set_discount_unknown_user() {
    let service = discount_service(vec![]);
    let err = service.set_discount("ghost", "1", dec!(10)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_discount() {
    let service = discount_service(vec![user(
        "u1",
        vec![Discount::new("1", dec!(10)), Discount::new("2", dec!(20))],
    )]);

    let table = service.delete_discount("u1", "1").await.unwrap();
    assert_eq!(table.entries(), &[Discount::new("2", dec!(20))]);

    // Absent service id: succeeds and returns the unchanged table.
    let unchanged = service.delete_discount("u1", "999").await.unwrap();
    assert_eq!(unchanged, table);

    let err = service.delete_discount("ghost", "1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_users_listed_newest_first() {
    let service = UserService::new(Arc::new(MockUserRepository::default()));
    for name in ["first", "second", "third"] {
        service
            .create_user(NewUser {
                id: None,
                name: name.to_string(),
                email: format!(" {}@Example.com ", name),
                is_admin: false,
            })
            .await
            .unwrap();
    }

    let users = service.list_users().unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["third", "second", "first"]);
    assert_eq!(users[0].email, "third@example.com");
}

#[tokio::test]
async fn test_update_and_delete_user() {
    let service = UserService::new(Arc::new(MockUserRepository::with_users(vec![user(
        "u1",
        vec![],
    )])));

    let updated = service
        .update_user(
            "u1",
            UserUpdate {
                is_admin: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.is_admin);
    assert_eq!(updated.name, "user u1");

    let err = service
        .update_user(
            "u1",
            UserUpdate {
                email: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    service.delete_user("u1").await.unwrap();
    assert_eq!(service.get_user("u1").unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(
        service.delete_user("u1").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}
