use crate::db::schema::favorites;
use crate::db::DbConnection;
use crate::recipe::Recipe;
use crate::types::{ApiError, ApiResult};
use crate::users::CurrentUser;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rocket::serde::json::Json;
use serde::Serialize;

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Favorite {
    pub id: i32,
    pub recipe_id: i32,
    pub user_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = favorites)]
pub struct NewFavorite {
    pub recipe_id: i32,
    pub user_id: i32,
}

impl Favorite {
    /// Links the user to the recipe. Favoriting twice is a no-op.
    pub fn add(user_id: i32, recipe_id: i32, connection: &mut SqliteConnection) -> Result<(), ApiError> {
        diesel::insert_into(favorites::table)
            .values(&NewFavorite { recipe_id, user_id })
            .on_conflict((favorites::user_id, favorites::recipe_id))
            .do_nothing()
            .execute(connection)?;
        Ok(())
    }

    pub fn remove(user_id: i32, recipe_id: i32, connection: &mut SqliteConnection) -> Result<(), ApiError> {
        diesel::delete(
            favorites::table
                .filter(favorites::user_id.eq(user_id))
                .filter(favorites::recipe_id.eq(recipe_id)),
        )
        .execute(connection)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn load_for_user(user_id: i32, connection: &mut SqliteConnection) -> Result<Vec<Favorite>, ApiError> {
        favorites::table
            .filter(favorites::user_id.eq(user_id))
            .order(favorites::id)
            .select(Favorite::as_select())
            .load(connection)
            .map_err(|e| e.into())
    }
}

#[post("/recipes/<recipe_id>/favorite")]
pub fn favorite(current_user: CurrentUser, mut connection: DbConnection, recipe_id: i32) -> ApiResult<Recipe> {
    let user = current_user?;
    let recipe = Recipe::load(recipe_id, &mut connection)?;
    Favorite::add(user.id, recipe.id, &mut connection)?;
    tracing::debug!(recipe_id, user_id = user.id, "recipe favorited");
    Ok(Json(recipe))
}

#[delete("/recipes/<recipe_id>/favorite")]
pub fn unfavorite(current_user: CurrentUser, mut connection: DbConnection, recipe_id: i32) -> ApiResult<Recipe> {
    let user = current_user?;
    let recipe = Recipe::load(recipe_id, &mut connection)?;
    Favorite::remove(user.id, recipe.id, &mut connection)?;
    tracing::debug!(recipe_id, user_id = user.id, "recipe unfavorited");
    Ok(Json(recipe))
}

#[get("/favorited-recipes")]
pub fn favorited(current_user: CurrentUser, mut connection: DbConnection) -> ApiResult<Vec<Recipe>> {
    let user = current_user?;
    Ok(Json(Recipe::favorited_by(user.id, &mut connection)?))
}
