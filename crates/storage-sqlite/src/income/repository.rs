use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use onekaday_core::errors::Error;
use onekaday_core::income::{
    IncomeEntry, IncomeEntryUpdate, IncomeFilter, IncomeRepositoryTrait, NewIncomeEntry,
};
use onekaday_core::Result;

use super::model::IncomeEntryDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::income_entries;
use crate::utils::{decimal_to_text, now_utc};

pub struct IncomeRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

/// Loads an entry inside a write job and checks it belongs to `user_id`.
fn load_owned(conn: &mut SqliteConnection, user_id: &str, entry_id: &str) -> Result<IncomeEntry> {
    let entry = income_entries::table
        .find(entry_id)
        .select(IncomeEntryDB::as_select())
        .first::<IncomeEntryDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::NotFound("Income entry".to_string()))?
        .into_domain()?;
    entry.ensure_owned_by(user_id)?;
    Ok(entry)
}

impl IncomeRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        IncomeRepository { pool, writer }
    }
}

#[async_trait]
impl IncomeRepositoryTrait for IncomeRepository {
    fn get_entry(&self, entry_id: &str) -> Result<IncomeEntry> {
        let mut conn = get_connection(&self.pool)?;
        income_entries::table
            .find(entry_id)
            .select(IncomeEntryDB::as_select())
            .first::<IncomeEntryDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::NotFound("Income entry".to_string()))?
            .into_domain()
    }

    fn list_entries(&self, user_id: &str, filter: &IncomeFilter) -> Result<Vec<IncomeEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = income_entries::table
            .filter(income_entries::user_id.eq(user_id))
            .select(IncomeEntryDB::as_select())
            .into_boxed();

        if let Some(start) = filter.start_date {
            query = query.filter(income_entries::date.ge(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(income_entries::date.le(end));
        }
        // The column is declared COLLATE NOCASE
        if let Some(source) = &filter.source {
            query = query.filter(income_entries::source.eq(source.clone()));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        query
            .order((
                income_entries::date.desc(),
                income_entries::created_at.desc(),
            ))
            .load::<IncomeEntryDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(IncomeEntryDB::into_domain)
            .collect()
    }

    async fn insert_entry(&self, user_id: String, new_entry: NewIncomeEntry) -> Result<IncomeEntry> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<IncomeEntry> {
                let now = now_utc();
                let row = IncomeEntryDB {
                    id: Uuid::new_v4().to_string(),
                    user_id,
                    amount: decimal_to_text(new_entry.amount),
                    source: new_entry.source,
                    description: new_entry.description,
                    date: new_entry.date,
                    created_at: now,
                    updated_at: now,
                };
                diesel::insert_into(income_entries::table)
                    .values(&row)
                    .returning(IncomeEntryDB::as_returning())
                    .get_result::<IncomeEntryDB>(conn)
                    .into_core()?
                    .into_domain()
            })
            .await
    }

    async fn update_entry(
        &self,
        user_id: String,
        entry_id: String,
        update: IncomeEntryUpdate,
    ) -> Result<IncomeEntry> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<IncomeEntry> {
                let mut entry = load_owned(conn, &user_id, &entry_id)?;
                entry.apply_update(&update, now_utc());
                diesel::update(income_entries::table.find(&entry_id))
                    .set(&IncomeEntryDB::from(&entry))
                    .execute(conn)
                    .into_core()?;
                Ok(entry)
            })
            .await
    }

    async fn delete_entry(&self, user_id: String, entry_id: String) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                load_owned(conn, &user_id, &entry_id)?;
                diesel::delete(income_entries::table.find(&entry_id))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use crate::users::UserRepository;
    use chrono::NaiveDate;
    use onekaday_core::users::{NewUserRecord, UserRepositoryTrait};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    struct Fixture {
        income: IncomeRepository,
        users: UserRepository,
        pool: Arc<crate::db::DbPool>,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let dir = tempdir().expect("Failed to create temp directory");
        let db_path = dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        Fixture {
            income: IncomeRepository::new(Arc::clone(&pool), writer.clone()),
            users: UserRepository::new(Arc::clone(&pool), writer),
            pool,
            _dir: dir,
        }
    }

    async fn user(f: &Fixture, name: &str) -> String {
        f.users
            .insert_user(NewUserRecord {
                username: name.to_string(),
                email: format!("{name}@example.com"),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn new_entry(amount: Decimal, source: Option<&str>, date: NaiveDate) -> NewIncomeEntry {
        NewIncomeEntry {
            amount,
            source: source.map(str::to_string),
            description: None,
            date,
        }
    }

    #[tokio::test]
    async fn amounts_round_trip_exactly() {
        let f = fixture().await;
        let alice = user(&f, "alice").await;
        for amount in [dec!(10.00), dec!(20.50), dec!(4.50)] {
            f.income
                .insert_entry(alice.clone(), new_entry(amount, None, d(1)))
                .await
                .unwrap();
        }
        let entries = f
            .income
            .list_entries(&alice, &IncomeFilter::default())
            .unwrap();
        let total: Decimal = entries.iter().map(|e| e.amount).sum();
        assert_eq!(total, dec!(35.00));
        assert_eq!(total.to_string(), "35.00");
    }

    #[tokio::test]
    async fn list_orders_by_date_then_insertion_and_filters() {
        let f = fixture().await;
        let alice = user(&f, "alice").await;
        let bob = user(&f, "bob").await;

        let first = f
            .income
            .insert_entry(alice.clone(), new_entry(dec!(1), Some("Etsy"), d(3)))
            .await
            .unwrap();
        let second = f
            .income
            .insert_entry(alice.clone(), new_entry(dec!(2), Some("Consulting"), d(3)))
            .await
            .unwrap();
        f.income
            .insert_entry(alice.clone(), new_entry(dec!(3), Some("etsy"), d(5)))
            .await
            .unwrap();
        f.income
            .insert_entry(bob.clone(), new_entry(dec!(9), Some("Etsy"), d(4)))
            .await
            .unwrap();

        let all = f
            .income
            .list_entries(&alice, &IncomeFilter::default())
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].date, d(5));
        if first.created_at != second.created_at {
            assert_eq!(all[1].id, second.id);
        }

        let etsy = IncomeFilter {
            source: Some("ETSY".into()),
            ..Default::default()
        };
        assert_eq!(f.income.list_entries(&alice, &etsy).unwrap().len(), 2);

        let window = IncomeFilter::between(Some(d(4)), Some(d(5)));
        assert_eq!(f.income.list_entries(&alice, &window).unwrap().len(), 1);

        let limited = IncomeFilter {
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(f.income.list_entries(&alice, &limited).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn other_users_cannot_edit_or_delete() {
        let f = fixture().await;
        let alice = user(&f, "alice").await;
        let mallory = user(&f, "mallory").await;
        let entry = f
            .income
            .insert_entry(alice.clone(), new_entry(dec!(12.34), Some("Tips"), d(1)))
            .await
            .unwrap();

        let update = IncomeEntryUpdate {
            amount: Some(dec!(99.99)),
            ..Default::default()
        };
        let edited = f
            .income
            .update_entry(mallory.clone(), entry.id.clone(), update.clone())
            .await;
        assert!(matches!(edited, Err(Error::Forbidden(_))));
        let deleted = f
            .income
            .delete_entry(mallory, entry.id.clone())
            .await;
        assert!(matches!(deleted, Err(Error::Forbidden(_))));

        let unchanged = f.income.get_entry(&entry.id).unwrap();
        assert_eq!(unchanged.amount, dec!(12.34));

        let missing = f
            .income
            .delete_entry(alice.clone(), "no-such-entry".into())
            .await;
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn partial_update_keeps_and_clears_fields() {
        let f = fixture().await;
        let alice = user(&f, "alice").await;
        let entry = f
            .income
            .insert_entry(alice.clone(), new_entry(dec!(5), Some("Tips"), d(2)))
            .await
            .unwrap();

        let update = IncomeEntryUpdate {
            amount: Some(dec!(7.25)),
            source: Some(None),
            ..Default::default()
        };
        let edited = f
            .income
            .update_entry(alice.clone(), entry.id.clone(), update)
            .await
            .unwrap();
        assert_eq!(edited.amount, dec!(7.25));
        assert_eq!(edited.source, None);
        assert_eq!(edited.date, d(2));

        let stored = f.income.get_entry(&entry.id).unwrap();
        assert_eq!(stored, edited);
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_to_entries() {
        let f = fixture().await;
        let alice = user(&f, "alice").await;
        f.income
            .insert_entry(alice.clone(), new_entry(dec!(1), None, d(1)))
            .await
            .unwrap();

        f.users.delete_user(alice).await.unwrap();
        let mut conn = get_connection(&f.pool).unwrap();
        let left: i64 = income_entries::table
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(left, 0);
    }
}
