use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::Role;
use crate::models::Account;

pub fn insert_account(conn: &Connection, account: &Account) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO accounts (id, username, credential_hash, role)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            account.id.to_string(),
            account.username,
            account.credential_hash,
            account.role.as_str(),
        ],
    )?;
    Ok(())
}

pub fn get_account(conn: &Connection, id: &Uuid) -> Result<Option<Account>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, username, credential_hash, role FROM accounts WHERE id = ?1",
            params![id.to_string()],
            account_row,
        )
        .optional()?;
    row.map(row_to_account).transpose()
}

pub fn get_account_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<Account>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, username, credential_hash, role FROM accounts WHERE username = ?1",
            params![username],
            account_row,
        )
        .optional()?;
    row.map(row_to_account).transpose()
}

pub fn username_taken(conn: &Connection, username: &str) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM accounts WHERE username = ?1",
        params![username],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Resolve an account id to its role, if the account exists.
pub fn get_account_role(conn: &Connection, id: &Uuid) -> Result<Option<Role>, DatabaseError> {
    let role: Option<String> = conn
        .query_row(
            "SELECT role FROM accounts WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    role.map(|r| Role::from_str(&r)).transpose()
}

type AccountRow = (String, String, String, String);

fn account_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn row_to_account(row: AccountRow) -> Result<Account, DatabaseError> {
    let (id, username, credential_hash, role) = row;
    Ok(Account {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        username,
        credential_hash,
        role: Role::from_str(&role)?,
    })
}
