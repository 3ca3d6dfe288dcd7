use sea_orm::entity::prelude::*;

/// User record owned by the auth service.
///
/// `otp_code` and `otp_expires_at` are set and cleared together, always in a
/// single UPDATE. `password_hash` is null for identity-provider-only accounts
/// (`external_id` set).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub role: i16,
    pub password_hash: Option<String>,
    pub otp_code: Option<String>,
    pub otp_expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub external_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
