//! Diesel table definitions.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts, local or federated.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        name -> Varchar,
        /// Absent for federated-only accounts.
        password_hash -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only submission log.
    form_submissions (id) {
        id -> Uuid,
        /// Insertion order; breaks ties between equal `created_at` values.
        seq -> Int8,
        label_one -> Varchar,
        location -> Varchar,
        start_time -> Varchar,
        end_time -> Varchar,
        file_name -> Nullable<Varchar>,
        file_url -> Nullable<Varchar>,
        dynamic_fields -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, form_submissions);
