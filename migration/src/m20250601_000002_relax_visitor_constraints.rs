//! 移除 visitors 表上遗留的 CHECK 约束
//!
//! Early databases restricted the enum columns of `visitors` with CHECK
//! clauses. SQLite cannot drop a constraint in place, so the table is rebuilt:
//! rows are copied into an unconstrained scratch table through
//! [`relax_visitor_row`], then the scratch table replaces the original.
//!
//! The rebuild is best effort and runs in one transaction. Any failure rolls
//! back, is logged, and startup continues on the legacy schema.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_orm::{
    ConnectionTrait, DatabaseTransaction, DbBackend, FromQueryResult, Statement,
    TransactionTrait,
};
use sea_orm_migration::prelude::*;
use tracing::{info, warn};

const VISITED_AT_INDEX: &str = "idx_visitors_visited_at";

/// 每条 INSERT 携带的行数（SQLite 绑定参数上限以内）
const COPY_BATCH_SIZE: usize = 500;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        match has_legacy_visitor_constraints(conn).await {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(e) => {
                warn!("Could not inspect visitors schema, skipping relaxation: {}", e);
                return Ok(());
            }
        }

        match rebuild_visitors(manager).await {
            Ok(copied) => info!(
                "Relaxed legacy visitors constraints ({} rows copied)",
                copied
            ),
            Err(e) => warn!("Legacy visitors migration failed, keeping old schema: {}", e),
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // 约束一旦移除便不再恢复
        Ok(())
    }
}

/// 旧 schema 中读出的一行
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct LegacyVisitorRow {
    pub id: i64,
    pub visitor_type: String,
    pub stay_duration: String,
    pub age_bracket: String,
    pub interest_type: String,
    pub visited_at: Option<String>,
}

/// 写入新 schema 的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaxedVisitorRow {
    pub id: i64,
    pub visitor_type: String,
    pub stay_duration: String,
    pub age_bracket: String,
    pub interest_type: String,
    pub visited_at: DateTime<Utc>,
}

/// Map a legacy row onto the unconstrained schema.
///
/// Column values are carried over untouched. The legacy `visited_at` text
/// (SQLite `CURRENT_TIMESTAMP`, RFC 3339 or a bare date) becomes a UTC
/// timestamp; unreadable or missing values fall back to `fallback`.
pub fn relax_visitor_row(row: LegacyVisitorRow, fallback: DateTime<Utc>) -> RelaxedVisitorRow {
    let visited_at = row
        .visited_at
        .as_deref()
        .and_then(parse_legacy_timestamp)
        .unwrap_or(fallback);

    RelaxedVisitorRow {
        id: row.id,
        visitor_type: row.visitor_type,
        stay_duration: row.stay_duration,
        age_bracket: row.age_bracket,
        interest_type: row.interest_type,
        visited_at,
    }
}

fn parse_legacy_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Debug, FromQueryResult)]
struct TableSql {
    sql: Option<String>,
}

/// 检查 visitors 表定义是否仍带 CHECK 约束
pub async fn has_legacy_visitor_constraints<C>(db: &C) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let row = TableSql::find_by_statement(Statement::from_string(
        DbBackend::Sqlite,
        "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'visitors'",
    ))
    .one(db)
    .await?;

    Ok(row
        .and_then(|r| r.sql)
        .is_some_and(|sql| sql.to_uppercase().contains("CHECK")))
}

/// 在单个事务中重建 visitors 表
///
/// Every step runs on one connection inside the transaction, so a failure at
/// any point rolls back to the untouched legacy table.
async fn rebuild_visitors(manager: &SchemaManager<'_>) -> Result<usize, DbErr> {
    let txn = manager.get_connection().begin().await?;
    let copied = rebuild_in(&txn).await?;
    txn.commit().await?;
    Ok(copied)
}

async fn rebuild_in(txn: &DatabaseTransaction) -> Result<usize, DbErr> {
    let schema = SchemaManager::new(txn);

    schema
        .drop_table(
            Table::drop()
                .table(Visitors::Relaxed)
                .if_exists()
                .to_owned(),
        )
        .await?;
    schema.create_table(visitors_table(Visitors::Relaxed)).await?;

    let legacy = LegacyVisitorRow::find_by_statement(Statement::from_string(
        DbBackend::Sqlite,
        "SELECT CAST(id AS INTEGER) AS id, visitor_type, stay_duration, age_bracket, \
         interest_type, CAST(visited_at AS TEXT) AS visited_at FROM visitors",
    ))
    .all(txn)
    .await?;

    let now = Utc::now();
    let rows: Vec<RelaxedVisitorRow> = legacy
        .into_iter()
        .map(|row| relax_visitor_row(row, now))
        .collect();

    for chunk in rows.chunks(COPY_BATCH_SIZE) {
        let mut insert = Query::insert();
        insert.into_table(Visitors::Relaxed).columns([
            Visitors::Id,
            Visitors::VisitorType,
            Visitors::StayDuration,
            Visitors::AgeBracket,
            Visitors::InterestType,
            Visitors::VisitedAt,
        ]);
        for row in chunk {
            insert
                .values([
                    row.id.into(),
                    row.visitor_type.clone().into(),
                    row.stay_duration.clone().into(),
                    row.age_bracket.clone().into(),
                    row.interest_type.clone().into(),
                    row.visited_at.into(),
                ])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }
        schema.exec_stmt(insert).await?;
    }

    schema
        .drop_table(Table::drop().table(Visitors::Table).to_owned())
        .await?;
    schema
        .rename_table(
            Table::rename()
                .table(Visitors::Relaxed, Visitors::Table)
                .to_owned(),
        )
        .await?;
    schema
        .create_index(
            Index::create()
                .if_not_exists()
                .name(VISITED_AT_INDEX)
                .table(Visitors::Table)
                .col(Visitors::VisitedAt)
                .to_owned(),
        )
        .await?;

    Ok(rows.len())
}

fn visitors_table(name: Visitors) -> TableCreateStatement {
    Table::create()
        .table(name)
        .col(
            ColumnDef::new(Visitors::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Visitors::VisitorType).string().not_null())
        .col(ColumnDef::new(Visitors::StayDuration).string().not_null())
        .col(ColumnDef::new(Visitors::AgeBracket).string().not_null())
        .col(ColumnDef::new(Visitors::InterestType).string().not_null())
        .col(
            ColumnDef::new(Visitors::VisitedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

#[derive(DeriveIden, Clone, Copy)]
enum Visitors {
    #[sea_orm(iden = "visitors")]
    Table,
    #[sea_orm(iden = "visitors_relaxed")]
    Relaxed,
    Id,
    VisitorType,
    StayDuration,
    AgeBracket,
    InterestType,
    VisitedAt,
}
