use std::sync::Arc;

use rust_decimal_macros::dec;

use brezora_core::users::{
    Discount, DiscountService, DiscountServiceTrait, NewUser, UserRepositoryTrait, UserUpdate,
};
use brezora_core::wallets::WalletRepositoryTrait;
use brezora_core::ErrorKind;

use super::UserRepository;
use crate::test_support::setup_db;
use crate::wallets::WalletRepository;

fn new_user(id: &str, email: &str) -> NewUser {
    NewUser {
        id: Some(id.to_string()),
        name: format!("User {}", id),
        email: email.to_string(),
        is_admin: false,
    }
}

#[tokio::test]
async fn test_create_get_and_update_user() {
    let (pool, writer, _dir) = setup_db();
    let repo = UserRepository::new(pool, writer);

    let created = repo.create(new_user("u1", "a@example.com")).await.unwrap();
    assert!(created.discounts.is_empty());

    let updated = repo
        .update(
            "u1",
            UserUpdate {
                name: None,
                email: Some("b@example.com".to_string()),
                is_admin: Some(true),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "User u1");
    assert_eq!(updated.email, "b@example.com");
    assert!(updated.is_admin);

    let err = repo
        .update("ghost", UserUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_upsert_discount_replaces_in_place() {
    let (pool, writer, _dir) = setup_db();
    let repo = UserRepository::new(pool, writer);
    repo.create(new_user("u1", "a@example.com")).await.unwrap();

    repo.upsert_discount("u1", Discount::new("101", dec!(10)))
        .await
        .unwrap();
    repo.upsert_discount("u1", Discount::new("202", dec!(5)))
        .await
        .unwrap();
    let table = repo
        .upsert_discount("u1", Discount::new("101", dec!(25)))
        .await
        .unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.get("101"), Some(dec!(25)));
    let order: Vec<&str> = table.iter().map(|d| d.service_id.as_str()).collect();
    assert_eq!(order, vec!["101", "202"]);

    let reloaded = repo.get_by_id("u1").unwrap();
    assert_eq!(reloaded.discounts, table);
}

#[tokio::test]
async fn test_remove_discount_touches_one_entry() {
    let (pool, writer, _dir) = setup_db();
    let repo = UserRepository::new(pool, writer);
    repo.create(new_user("u1", "a@example.com")).await.unwrap();
    repo.upsert_discount("u1", Discount::new("101", dec!(10)))
        .await
        .unwrap();
    repo.upsert_discount("u1", Discount::new("202", dec!(20)))
        .await
        .unwrap();

    let table = repo.remove_discount("u1", "101").await.unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("202"), Some(dec!(20)));

    // Removing an absent entry is a no-op.
    let again = repo.remove_discount("u1", "101").await.unwrap();
    assert_eq!(again, table);

    let err = repo.remove_discount("ghost", "101").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_discount_for_unknown_user_is_not_found() {
    let (pool, writer, _dir) = setup_db();
    let repo = UserRepository::new(pool, writer);

    let err = repo
        .upsert_discount("ghost", Discount::new("101", dec!(10)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_concurrent_discount_writes_do_not_lose_updates() {
    let (pool, writer, _dir) = setup_db();
    let repo = Arc::new(UserRepository::new(pool, writer));
    repo.create(new_user("u1", "a@example.com")).await.unwrap();
    let service = Arc::new(DiscountService::new(repo.clone()));

    let mut handles = Vec::new();
    for i in 0..10 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .set_discount("u1", &format!("{}", 100 + i), dec!(10))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(service.get_discounts("u1").unwrap().len(), 10);
}

#[tokio::test]
async fn test_delete_user_removes_discounts_and_wallet() {
    let (pool, writer, _dir) = setup_db();
    let repo = UserRepository::new(pool.clone(), writer.clone());
    let wallets = WalletRepository::new(pool, writer);
    repo.create(new_user("u1", "a@example.com")).await.unwrap();
    repo.upsert_discount("u1", Discount::new("101", dec!(10)))
        .await
        .unwrap();
    wallets.increment("u1", dec!(50)).await.unwrap();

    assert_eq!(repo.delete("u1").await.unwrap(), 1);
    assert_eq!(repo.get_by_id("u1").unwrap_err().kind(), ErrorKind::NotFound);
    assert!(wallets.find("u1").unwrap().is_none());
    assert_eq!(repo.delete("u1").await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_newest_first() {
    let (pool, writer, _dir) = setup_db();
    let repo = UserRepository::new(pool, writer);
    repo.create(new_user("old", "old@example.com")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    repo.create(new_user("new", "new@example.com")).await.unwrap();
    repo.upsert_discount("old", Discount::new("7", dec!(3)))
        .await
        .unwrap();

    let users = repo.list().unwrap();
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "old"]);
    assert_eq!(users[1].discounts.get("7"), Some(dec!(3)));
    assert!(users[0].discounts.is_empty());
}
