table! {
    items (id) {
        id -> Integer,
        name -> Varchar,
        description -> Nullable<Text>,
        price -> Double,
        quantity -> Integer,
        created_at -> Timestamp,
    }
}
