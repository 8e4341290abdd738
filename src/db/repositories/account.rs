use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set, SqlErr, sea_query::OnConflict};

use crate::entities::accounts;
use crate::models::Account;
use crate::services::account_store::AccountRow;

impl From<accounts::Model> for AccountRow {
    fn from(model: accounts::Model) -> Self {
        Self {
            account: Account::from_stored(model.username, model.credential_hash),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn active_model(account: &Account, now: String) -> accounts::ActiveModel {
        accounts::ActiveModel {
            username: Set(account.username().to_string()),
            credential_hash: Set(account.credential_hash().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        }
    }

    /// Get account by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<AccountRow>> {
        let model = accounts::Entity::find_by_id(username.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query account by username")?;

        Ok(model.map(AccountRow::from))
    }

    pub async fn insert(&self, account: &Account) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        match accounts::Entity::insert(Self::active_model(account, now))
            .exec_without_returning(&self.conn)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(e) => Err(e).context("Failed to insert account"),
        }
    }

    /// Insert, or replace the credential hash of an existing row.
    pub async fn upsert(&self, account: &Account) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        accounts::Entity::insert(Self::active_model(account, now))
            .on_conflict(
                OnConflict::column(accounts::Column::Username)
                    .update_columns([
                        accounts::Column::CredentialHash,
                        accounts::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to save account")?;

        Ok(())
    }

    pub async fn delete(&self, username: &str) -> Result<bool> {
        let result = accounts::Entity::delete_by_id(username.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to delete account")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list(&self) -> Result<Vec<AccountRow>> {
        let models = accounts::Entity::find()
            .order_by_asc(accounts::Column::Username)
            .all(&self.conn)
            .await
            .context("Failed to list accounts")?;

        Ok(models.into_iter().map(AccountRow::from).collect())
    }
}
