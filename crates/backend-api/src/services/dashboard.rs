use rijschool_database::{SettingsRepository, Setting, StudentQuery, StudentRepository};
use rijschool_domain::ledger::{LedgerEntry, LedgerTotals};
use rijschool_domain::YearMonth;
use sqlx::SqlitePool;

use super::error::ServiceError;

/// School-wide payment totals, with the received amount narrowed to `month` when given.
pub async fn dashboard(
    pool: &SqlitePool,
    month: Option<&str>,
) -> Result<(LedgerTotals, Option<YearMonth>), ServiceError> {
    let month = month
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(YearMonth::parse)
        .transpose()?;

    let records = StudentRepository::new(pool.clone())
        .list_records(&StudentQuery::default())
        .await?;
    let entries: Vec<(i64, Vec<LedgerEntry>)> = records
        .iter()
        .map(|r| (r.student.agreed_price_cents, r.ledger_entries()))
        .collect();

    let totals = LedgerTotals::collect(
        entries
            .iter()
            .map(|(agreed, payments)| (*agreed, payments.as_slice())),
        month,
    );
    Ok((totals, month))
}

pub async fn get_settings(pool: &SqlitePool) -> Result<Setting, ServiceError> {
    Ok(SettingsRepository::new(pool.clone()).get_or_create().await?)
}

pub async fn update_settings(
    pool: &SqlitePool,
    default_price_cents: i64,
) -> Result<Setting, ServiceError> {
    Ok(SettingsRepository::new(pool.clone())
        .update_default_price(default_price_cents)
        .await?)
}
