//! Repository tests against a real SQLite database: cascade rules, the
//! uniqueness guard, and the grouped aggregation queries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use fintrack_core::budgets::{BudgetRepositoryTrait, NewBudget};
use fintrack_core::categories::{CategoryFilters, CategoryRepositoryTrait, NewCategory};
use fintrack_core::errors::{DatabaseError, Error, ValidationError};
use fintrack_core::transactions::{
    NewTransaction, TransactionFilters, TransactionRepositoryTrait,
};
use fintrack_core::types::FlowKind;
use fintrack_core::users::{NewUser, UserRepositoryTrait};
use fintrack_storage_sqlite::budgets::BudgetRepository;
use fintrack_storage_sqlite::categories::CategoryRepository;
use fintrack_storage_sqlite::db;
use fintrack_storage_sqlite::transactions::TransactionRepository;
use fintrack_storage_sqlite::users::UserRepository;

struct Store {
    users: UserRepository,
    categories: CategoryRepository,
    transactions: TransactionRepository,
    budgets: BudgetRepository,
    _tmp: TempDir,
}

fn open_store() -> Store {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = db::init(&tmp.path().join("test.db").to_string_lossy()).unwrap();
    let pool = db::create_pool(&db_path).unwrap();
    db::run_migrations(&pool).unwrap();
    let writer = db::spawn_writer((*pool).clone());
    Store {
        users: UserRepository::new(pool.clone(), writer.clone()),
        categories: CategoryRepository::new(pool.clone(), writer.clone()),
        transactions: TransactionRepository::new(pool.clone(), writer.clone()),
        budgets: BudgetRepository::new(pool, writer),
        _tmp: tmp,
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn seed_user(store: &Store, email: &str) -> String {
    store
        .users
        .insert_new_user(NewUser {
            id: None,
            email: email.to_string(),
            first_name: None,
            last_name: None,
            password_hash: "argon2-hash".to_string(),
        })
        .await
        .unwrap()
        .id
}

async fn seed_category(store: &Store, user_id: &str, name: &str, kind: FlowKind) -> String {
    store
        .categories
        .insert_new_category(
            user_id.to_string(),
            NewCategory {
                id: None,
                name: name.to_string(),
                kind,
                icon: None,
                color: None,
            },
        )
        .await
        .unwrap()
        .id
}

async fn seed_transaction(
    store: &Store,
    user_id: &str,
    category_id: Option<&str>,
    kind: FlowKind,
    amount: Decimal,
    on: &str,
) -> String {
    store
        .transactions
        .insert_new_transaction(
            user_id.to_string(),
            NewTransaction {
                id: None,
                category_id: category_id.map(String::from),
                kind,
                amount,
                description: None,
                date: date(on),
            },
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn duplicate_email_is_rejected_in_the_write_transaction() {
    let store = open_store();
    seed_user(&store, "dup@example.com").await;
    let err = store
        .users
        .insert_new_user(NewUser {
            id: None,
            email: "dup@example.com".to_string(),
            first_name: None,
            last_name: None,
            password_hash: "other-hash".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::Fields(_))
    ));
}

#[tokio::test]
async fn deleting_a_user_cascades_to_everything_they_own() {
    let store = open_store();
    let user_id = seed_user(&store, "gone@example.com").await;
    let category_id = seed_category(&store, &user_id, "Groceries", FlowKind::Expense).await;
    seed_transaction(
        &store,
        &user_id,
        Some(&category_id),
        FlowKind::Expense,
        dec!(12.50),
        "2025-06-01",
    )
    .await;
    store
        .budgets
        .insert_new_budget(
            user_id.clone(),
            NewBudget {
                id: None,
                category_id: category_id.clone(),
                month: 6,
                year: 2025,
                allocated_amount: dec!(100),
            },
        )
        .await
        .unwrap();

    store.users.delete_user(user_id.clone()).await.unwrap();

    let categories = store
        .categories
        .list(&user_id, &CategoryFilters::default())
        .unwrap();
    assert_eq!(categories.meta.total_row_count, 0);
    let transactions = store
        .transactions
        .list(&user_id, &TransactionFilters::default())
        .unwrap();
    assert_eq!(transactions.meta.total_row_count, 0);
    assert!(store.budgets.list_for_period(&user_id, 6, 2025).unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_category_detaches_transactions_and_drops_budgets() {
    let store = open_store();
    let user_id = seed_user(&store, "cascade@example.com").await;
    let category_id = seed_category(&store, &user_id, "Groceries", FlowKind::Expense).await;
    let transaction_id = seed_transaction(
        &store,
        &user_id,
        Some(&category_id),
        FlowKind::Expense,
        dec!(42),
        "2025-06-01",
    )
    .await;
    store
        .budgets
        .insert_new_budget(
            user_id.clone(),
            NewBudget {
                id: None,
                category_id: category_id.clone(),
                month: 6,
                year: 2025,
                allocated_amount: dec!(500),
            },
        )
        .await
        .unwrap();

    store
        .categories
        .delete_category(user_id.clone(), category_id.clone())
        .await
        .unwrap();

    let survived = store.transactions.get_by_id(&user_id, &transaction_id).unwrap();
    assert_eq!(survived.category_id, None);
    assert_eq!(survived.amount, dec!(42));
    assert!(store.budgets.list_for_period(&user_id, 6, 2025).unwrap().is_empty());
    let err = store.categories.get_by_id(&user_id, &category_id).unwrap_err();
    assert!(matches!(
        err,
        Error::Database(DatabaseError::NotFound(_))
    ));
}

#[tokio::test]
async fn budget_uniqueness_is_enforced_per_period() {
    let store = open_store();
    let user_id = seed_user(&store, "unique@example.com").await;
    let category_id = seed_category(&store, &user_id, "Rent", FlowKind::Expense).await;
    let new_budget = |month: i32| NewBudget {
        id: None,
        category_id: category_id.clone(),
        month,
        year: 2025,
        allocated_amount: dec!(1200),
    };

    store
        .budgets
        .insert_new_budget(user_id.clone(), new_budget(6))
        .await
        .unwrap();
    // Same category in another month is fine
    store
        .budgets
        .insert_new_budget(user_id.clone(), new_budget(7))
        .await
        .unwrap();
    let err = store
        .budgets
        .insert_new_budget(user_id.clone(), new_budget(6))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(store.budgets.list_for_period(&user_id, 6, 2025).unwrap().len(), 1);
}

#[tokio::test]
async fn expense_totals_group_by_category_with_exact_decimals() {
    let store = open_store();
    let user_id = seed_user(&store, "totals@example.com").await;
    let groceries = seed_category(&store, &user_id, "Groceries", FlowKind::Expense).await;
    let salary = seed_category(&store, &user_id, "Salary", FlowKind::Income).await;

    seed_transaction(&store, &user_id, Some(&groceries), FlowKind::Expense, dec!(0.10), "2025-06-01").await;
    seed_transaction(&store, &user_id, Some(&groceries), FlowKind::Expense, dec!(0.20), "2025-06-15").await;
    seed_transaction(&store, &user_id, None, FlowKind::Expense, dec!(5), "2025-06-20").await;
    // Income and out-of-range rows must not count
    seed_transaction(&store, &user_id, Some(&salary), FlowKind::Income, dec!(1000), "2025-06-25").await;
    seed_transaction(&store, &user_id, Some(&groceries), FlowKind::Expense, dec!(99), "2025-07-01").await;

    let totals = store
        .transactions
        .expense_totals_by_category(&user_id, date("2025-06-01"), date("2025-06-30"))
        .unwrap();
    assert_eq!(totals.len(), 2);
    let of = |key: Option<&str>| {
        totals
            .iter()
            .find(|spend| spend.category_id.as_deref() == key)
            .unwrap()
            .total
    };
    // 0.10 + 0.20 stays exactly 0.30
    assert_eq!(of(Some(&groceries)), dec!(0.30));
    assert_eq!(of(None), dec!(5));
}

#[tokio::test]
async fn amount_range_filter_compares_numerically() {
    let store = open_store();
    let user_id = seed_user(&store, "range@example.com").await;
    for amount in [dec!(9), dec!(10), dec!(100), dec!(2.5)] {
        seed_transaction(&store, &user_id, None, FlowKind::Expense, amount, "2025-06-01").await;
    }

    // A textual comparison would put "9" above "10" and "100"
    let filters = TransactionFilters {
        min_amount: Some(dec!(9)),
        ..Default::default()
    };
    let listed = store.transactions.list(&user_id, &filters).unwrap();
    let amounts: Vec<Decimal> = listed.data.iter().map(|t| t.amount).collect();
    assert_eq!(listed.meta.total_row_count, 3);
    assert!(amounts.contains(&dec!(100)));
    assert!(!amounts.contains(&dec!(2.5)));
}

#[tokio::test]
async fn ownership_is_scoped_per_user() {
    let store = open_store();
    let alice = seed_user(&store, "alice@example.com").await;
    let bob = seed_user(&store, "bob@example.com").await;
    let category_id = seed_category(&store, &alice, "Groceries", FlowKind::Expense).await;

    let err = store.categories.get_by_id(&bob, &category_id).unwrap_err();
    assert!(matches!(
        err,
        Error::Database(DatabaseError::NotFound(_))
    ));

    // Bob may use the same name; uniqueness is per user
    let bob_category = seed_category(&store, &bob, "Groceries", FlowKind::Expense).await;
    assert_ne!(bob_category, category_id);
}
