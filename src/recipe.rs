use crate::db::schema::{favorites, recipes};
use crate::db::DbConnection;
use crate::types::{ApiError, ApiResult, Validate, ValidationError};
use crate::users::{Authorized, CurrentUser, OnWrite};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Recipe {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub ingredients: String,
    pub directions: String,
    pub vegetarian: bool,
    pub who_submitted: i32,
    pub likes: i32,
}

impl Recipe {
    pub fn load_all(connection: &mut SqliteConnection) -> Result<Vec<Recipe>, ApiError> {
        recipes::table
            .order(recipes::id)
            .select(Recipe::as_select())
            .load(connection)
            .map_err(|e| e.into())
    }

    pub fn load(recipe_id: i32, connection: &mut SqliteConnection) -> Result<Recipe, ApiError> {
        recipes::table
            .find(recipe_id)
            .select(Recipe::as_select())
            .first(connection)
            .optional()?
            .ok_or_else(|| ApiError::recipe_not_found(recipe_id))
    }

    pub fn submitted_by(user_id: i32, connection: &mut SqliteConnection) -> Result<Vec<Recipe>, ApiError> {
        recipes::table
            .filter(recipes::who_submitted.eq(user_id))
            .order(recipes::id)
            .select(Recipe::as_select())
            .load(connection)
            .map_err(|e| e.into())
    }

    pub fn favorited_by(user_id: i32, connection: &mut SqliteConnection) -> Result<Vec<Recipe>, ApiError> {
        favorites::table
            .inner_join(recipes::table)
            .filter(favorites::user_id.eq(user_id))
            .order(favorites::id)
            .select(Recipe::as_select())
            .load(connection)
            .map_err(|e| e.into())
    }

    /// Applies `changes` and returns the stored row. An empty change set is a
    /// plain load.
    pub fn apply(
        recipe_id: i32,
        changes: &RecipeChanges,
        connection: &mut SqliteConnection,
    ) -> Result<Recipe, ApiError> {
        if changes.is_empty() {
            return Recipe::load(recipe_id, connection);
        }
        diesel::update(recipes::table.find(recipe_id))
            .set(changes)
            .returning(Recipe::as_returning())
            .get_result(connection)
            .optional()?
            .ok_or_else(|| ApiError::recipe_not_found(recipe_id))
    }

    /// Removes the recipe together with every favorite pointing at it.
    pub fn delete(recipe_id: i32, connection: &mut SqliteConnection) -> Result<Recipe, ApiError> {
        connection.transaction::<_, ApiError, _>(|conn| {
            let recipe = Recipe::load(recipe_id, conn)?;
            diesel::delete(favorites::table.filter(favorites::recipe_id.eq(recipe_id))).execute(conn)?;
            diesel::delete(recipes::table.find(recipe_id)).execute(conn)?;
            Ok(recipe)
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = recipes)]
pub struct NewRecipe {
    name: String,
    image: Option<String>,
    ingredients: String,
    directions: String,
    vegetarian: bool,
    who_submitted: i32,
    likes: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipe {
    name: String,
    #[serde(default)]
    image: Option<String>,
    ingredients: String,
    directions: String,
    vegetarian: bool,
}

impl Validate for CreateRecipe {
    type Error = ValidationError;
    fn validate(self, _connection: &mut SqliteConnection) -> Result<Self, ValidationError> {
        let mut error = ValidationError::default();
        if self.name.trim().is_empty() {
            error.add_error("name", "empty name");
        }
        if self.ingredients.trim().is_empty() {
            error.add_error("ingredients", "empty ingredients");
        }
        if self.directions.trim().is_empty() {
            error.add_error("directions", "empty directions");
        }
        error.into_result(self)
    }
}

/// The fields a client may overwrite on an existing recipe. Anything else in
/// the payload is rejected during deserialization.
#[derive(Debug, Default, Deserialize, AsChangeset)]
#[serde(deny_unknown_fields)]
#[diesel(table_name = recipes)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub image: Option<String>,
    pub ingredients: Option<String>,
    pub directions: Option<String>,
    pub vegetarian: Option<bool>,
    pub likes: Option<i32>,
}

impl RecipeChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.image.is_none()
            && self.ingredients.is_none()
            && self.directions.is_none()
            && self.vegetarian.is_none()
            && self.likes.is_none()
    }
}

impl Validate for RecipeChanges {
    type Error = ValidationError;
    fn validate(self, _connection: &mut SqliteConnection) -> Result<Self, ValidationError> {
        let mut error = ValidationError::default();
        let text_fields = [
            ("name", &self.name),
            ("ingredients", &self.ingredients),
            ("directions", &self.directions),
        ];
        for (field, value) in text_fields.iter() {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    error.add_error(*field, format!("empty {}", field));
                }
            }
        }
        if let Some(likes) = self.likes {
            if likes < 0 {
                error.add_error("likes", "likes can't be negative");
            }
        }
        error.into_result(self)
    }
}

#[get("/recipes")]
pub fn list(mut connection: DbConnection) -> ApiResult<Vec<Recipe>> {
    Ok(Json(Recipe::load_all(&mut connection)?))
}

#[post("/recipes", data = "<create>")]
pub fn create(
    gate: Authorized<OnWrite>,
    mut connection: DbConnection,
    create: Json<CreateRecipe>,
) -> Result<status::Created<Json<Recipe>>, ApiError> {
    let user = gate.into_user()?;
    let create = create.validate(&mut connection)?.into_inner();
    let new_recipe = NewRecipe {
        name: create.name,
        image: create.image,
        ingredients: create.ingredients,
        directions: create.directions,
        vegetarian: create.vegetarian,
        who_submitted: user.id,
        likes: 0,
    };

    let recipe = diesel::insert_into(recipes::table)
        .values(&new_recipe)
        .returning(Recipe::as_returning())
        .get_result(&mut *connection)?;

    tracing::info!(recipe_id = recipe.id, user_id = user.id, "recipe created");
    Ok(status::Created::new(format!("/api/recipes/{}", recipe.id)).body(Json(recipe)))
}

#[patch("/recipes/<recipe_id>", data = "<changes>")]
pub fn update(
    current_user: CurrentUser,
    mut connection: DbConnection,
    recipe_id: i32,
    changes: Json<RecipeChanges>,
) -> ApiResult<Recipe> {
    let user = current_user?;
    Recipe::load(recipe_id, &mut connection)?;
    let changes = changes.validate(&mut connection)?;
    let recipe = Recipe::apply(recipe_id, &changes, &mut connection)?;
    tracing::info!(recipe_id, user_id = user.id, "recipe updated");
    Ok(Json(recipe))
}

#[delete("/recipes/<recipe_id>")]
pub fn remove(
    gate: Authorized<OnWrite>,
    mut connection: DbConnection,
    recipe_id: i32,
) -> Result<Status, ApiError> {
    let user = gate.into_user()?;
    let recipe = Recipe::delete(recipe_id, &mut connection)?;
    tracing::info!(recipe_id, name = %recipe.name, user_id = user.id, "recipe deleted");
    Ok(Status::NoContent)
}

#[get("/submitted-recipes")]
pub fn submitted(current_user: CurrentUser, mut connection: DbConnection) -> ApiResult<Vec<Recipe>> {
    let user = current_user?;
    Ok(Json(Recipe::submitted_by(user.id, &mut connection)?))
}
