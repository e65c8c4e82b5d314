use crate::db::schema::users;
use crate::types::ApiError;
use crate::utils::serialize_date;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Serialize;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
}

/// What signup and login hand back to the client.
#[derive(Debug, Serialize)]
pub struct UserSummary<'a> {
    pub id: i32,
    pub username: &'a str,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn make_password(password: &str, cost: u32) -> Result<String, ApiError> {
        Ok(bcrypt::hash(password, cost)?)
    }

    pub fn verify_password(&self, password_to_verify: &str) -> Result<bool, ApiError> {
        Ok(bcrypt::verify(password_to_verify, &self.password_hash)?)
    }

    pub fn summary(&self) -> UserSummary<'_> {
        UserSummary {
            id: self.id,
            username: &self.username,
            created_at: self.created_at,
        }
    }

    pub fn load_all(connection: &mut SqliteConnection) -> Result<Vec<User>, ApiError> {
        users::table
            .order(users::id)
            .select(User::as_select())
            .load(connection)
            .map_err(|e| e.into())
    }

    pub fn load_by_id(user_id: i32, connection: &mut SqliteConnection) -> Result<Option<User>, ApiError> {
        users::table
            .find(user_id)
            .select(User::as_select())
            .first(connection)
            .optional()
            .map_err(|e| e.into())
    }

    /// Exact, case-sensitive match on the username.
    pub fn load_by_name(name: &str, connection: &mut SqliteConnection) -> Result<Option<User>, ApiError> {
        users::table
            .filter(users::username.eq(name))
            .select(User::as_select())
            .first(connection)
            .optional()
            .map_err(|e| e.into())
    }

    pub fn username_exists(name: &str, connection: &mut SqliteConnection) -> Result<bool, ApiError> {
        use diesel::dsl::exists;
        use diesel::select;

        select(exists(users::table.filter(users::username.eq(name))))
            .get_result::<bool>(connection)
            .map_err(|e| e.into())
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
}

impl<'a> NewUser<'a> {
    pub fn insert(&self, connection: &mut SqliteConnection) -> QueryResult<User> {
        diesel::insert_into(users::table)
            .values(self)
            .returning(User::as_returning())
            .get_result(connection)
    }
}
