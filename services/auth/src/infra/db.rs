use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::Expr,
};
use uuid::Uuid;

use shieldher_auth_schema::users;

use crate::domain::repository::UserRepository;
use crate::domain::types::Identity;
use crate::error::AuthServiceError;

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(identity_from_model).transpose()
    }

    async fn create(&self, user: &Identity) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            role: Set(i16::from(user.role)),
            password_hash: Set(user.password_hash.clone()),
            otp_code: Set(user.otp_code.clone()),
            otp_expires_at: Set(user.otp_expires_at),
            external_id: Set(user.external_id.clone()),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn store_otp(
        &self,
        user_id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        // Both OTP columns in one UPDATE — the pair is never half-written.
        users::ActiveModel {
            id: Set(user_id),
            otp_code: Set(Some(code.to_owned())),
            otp_expires_at: Set(Some(expires_at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("store otp")?;
        Ok(())
    }

    async fn clear_otp(&self, user_id: Uuid) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(user_id),
            otp_code: Set(None),
            otp_expires_at: Set(None),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("clear otp")?;
        Ok(())
    }

    async fn update_password_consume_otp(
        &self,
        user_id: Uuid,
        password_hash: &str,
        otp_code: &str,
    ) -> Result<bool, AuthServiceError> {
        // Conditional single-row write: only applies while the stored code
        // still matches, which makes concurrent consumption lose cleanly.
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::PasswordHash,
                Expr::value(Some(password_hash.to_owned())),
            )
            .col_expr(users::Column::OtpCode, Expr::value(Option::<String>::None))
            .col_expr(
                users::Column::OtpExpiresAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::OtpCode.eq(otp_code))
            .exec(&self.db)
            .await
            .context("update password and consume otp")?;
        Ok(result.rows_affected > 0)
    }
}

fn identity_from_model(model: users::Model) -> Result<Identity, AuthServiceError> {
    let role = u8::try_from(model.role)
        .map_err(|_| anyhow::anyhow!("role out of u8 range: {}", model.role))?;
    Ok(Identity {
        id: model.id,
        email: model.email,
        role,
        password_hash: model.password_hash,
        otp_code: model.otp_code,
        otp_expires_at: model.otp_expires_at,
        external_id: model.external_id,
        created_at: model.created_at,
    })
}
