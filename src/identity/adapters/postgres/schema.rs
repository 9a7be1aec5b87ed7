//! Diesel schema for the identity store.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Unique, case-sensitive email address.
        #[max_length = 255]
        email -> Varchar,
        /// First name.
        #[max_length = 100]
        first_name -> Varchar,
        /// Last name.
        #[max_length = 100]
        last_name -> Varchar,
        /// Account role.
        #[max_length = 20]
        role -> Varchar,
        /// Profile biography.
        bio -> Nullable<Text>,
        /// Contact phone number.
        #[max_length = 20]
        phone -> Nullable<Varchar>,
        /// Whether a verification token has been redeemed.
        email_verified -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Outstanding email verification tokens.
    email_verification_tokens (id) {
        /// Token identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Delivered token value.
        #[max_length = 64]
        token -> Varchar,
        /// Expiry timestamp.
        expires_at -> Timestamptz,
    }
}

diesel::joinable!(email_verification_tokens -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, email_verification_tokens);
