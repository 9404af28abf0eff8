use crate::{entities::sequence, errors::ServiceError};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ConnectionTrait, EntityTrait, Set,
};

pub const JOB_CARD_SEQUENCE: &str = "job_card";
pub const INVOICE_SEQUENCE: &str = "invoice";

fn key(name: &str, year: i32) -> String {
    format!("{}:{}", name, year)
}

/// Increments and returns the counter for `(name, year)`, starting at 1.
///
/// A single upsert creates or bumps the row, so two writers minting the
/// first number of a year serialise on the row instead of racing to insert
/// it. Run it on the same transaction as the insert that consumes the value
/// so a rolled-back insert also rolls back the number.
pub async fn next_value<C>(conn: &C, name: &str, year: i32) -> Result<i64, ServiceError>
where
    C: ConnectionTrait,
{
    let key = key(name, year);

    sequence::Entity::insert(sequence::ActiveModel {
        name: Set(key.clone()),
        last_value: Set(1),
    })
    .on_conflict(
        OnConflict::column(sequence::Column::Name)
            .value(
                sequence::Column::LastValue,
                Expr::col((sequence::Entity, sequence::Column::LastValue)).add(1),
            )
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await
    .map_err(ServiceError::db_error)?;

    sequence::Entity::find_by_id(key.clone())
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .map(|row| row.last_value)
        .ok_or_else(|| ServiceError::InternalError(format!("sequence {} vanished", key)))
}

/// `JC-2026-007`
pub fn format_job_no(year: i32, seq: i64) -> String {
    format!("JC-{}-{:03}", year, seq)
}

/// `INV-2026-0042`
pub fn format_invoice_no(year: i32, seq: i64) -> String {
    format!("INV-{}-{:04}", year, seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_connection, run_migrations};
    use sea_orm::TransactionTrait;

    #[test]
    fn job_numbers_pad_to_three_digits() {
        assert_eq!(format_job_no(2026, 1), "JC-2026-001");
        assert_eq!(format_job_no(2026, 42), "JC-2026-042");
        assert_eq!(format_job_no(2026, 1234), "JC-2026-1234");
    }

    #[test]
    fn invoice_numbers_pad_to_four_digits() {
        assert_eq!(format_invoice_no(2026, 7), "INV-2026-0007");
    }

    #[tokio::test]
    async fn counters_are_per_name_and_year() {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        run_migrations(&db).await.unwrap();

        assert_eq!(next_value(&db, JOB_CARD_SEQUENCE, 2026).await.unwrap(), 1);
        assert_eq!(next_value(&db, JOB_CARD_SEQUENCE, 2026).await.unwrap(), 2);
        assert_eq!(next_value(&db, JOB_CARD_SEQUENCE, 2027).await.unwrap(), 1);
        assert_eq!(next_value(&db, INVOICE_SEQUENCE, 2026).await.unwrap(), 1);
        assert_eq!(next_value(&db, JOB_CARD_SEQUENCE, 2026).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn concurrent_first_numbers_of_a_year_are_distinct() {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        run_migrations(&db).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                let txn = db.begin().await.unwrap();
                let value = next_value(&txn, INVOICE_SEQUENCE, 2030).await.unwrap();
                txn.commit().await.unwrap();
                value
            }));
        }

        let mut values = Vec::new();
        for handle in handles {
            values.push(handle.await.unwrap());
        }
        values.sort_unstable();
        assert_eq!(values, (1..=8).collect::<Vec<i64>>());
    }
}
