use protestpulse_db::table::Account;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

use crate::profile::Profile;

/// Stored for accounts created from an identity provider login. Nobody signs in
/// with it, credentials are only ever checked by the provider.
pub const PLACEHOLDER_PASSWORD: &str = "!oauth";

pub async fn resolve_account_id(pool: &SqlitePool, email: &str) -> Result<Option<i64>, sqlx::Error> {
    let statement = Query::select()
        .column(Account::Id)
        .from(Account::Table)
        .and_where(Expr::col(Account::Email).eq(email))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(id,)| id))
}

pub async fn create_account(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<i64, sqlx::Error> {
    let statement = Query::insert()
        .into_table(Account::Table)
        .columns([
            Account::Email,
            Account::Password,
            Account::FirstName,
            Account::LastName,
        ])
        .values_panic([
            email.into(),
            password.into(),
            first_name.into(),
            last_name.into(),
        ])
        .returning_col(Account::Id)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let (id,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(pool)
        .await?;

    Ok(id)
}

/// Account id for the profile email, creating the account on first use.
///
/// A concurrent request creating the same account loses on the unique email
/// index and resolves the row the winner inserted.
pub async fn resolve_or_create_account(
    pool: &SqlitePool,
    profile: &Profile,
) -> Result<i64, sqlx::Error> {
    if let Some(id) = resolve_account_id(pool, &profile.email).await? {
        return Ok(id);
    }

    match create_account(
        pool,
        &profile.email,
        PLACEHOLDER_PASSWORD,
        &profile.given_name,
        &profile.family_name,
    )
    .await
    {
        Ok(id) => {
            tracing::info!(account_id = id, email = %profile.email, "account created");
            Ok(id)
        }
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
            resolve_account_id(pool, &profile.email)
                .await?
                .ok_or(sqlx::Error::RowNotFound)
        }
        Err(err) => Err(err),
    }
}
