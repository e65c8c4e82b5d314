table! {
    favorites (id) {
        id -> Integer,
        recipe_id -> Integer,
        user_id -> Integer,
    }
}

table! {
    recipes (id) {
        id -> Integer,
        name -> Text,
        image -> Nullable<Text>,
        ingredients -> Text,
        directions -> Text,
        vegetarian -> Bool,
        who_submitted -> Integer,
        likes -> Integer,
    }
}

table! {
    users (id) {
        id -> Integer,
        username -> Text,
        password_hash -> Text,
        is_admin -> Bool,
        created_at -> Timestamp,
    }
}

joinable!(favorites -> recipes (recipe_id));
joinable!(favorites -> users (user_id));
joinable!(recipes -> users (who_submitted));

allow_tables_to_appear_in_same_query!(favorites, recipes, users);
