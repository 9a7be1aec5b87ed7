//! Diesel schema for the marketplace.

diesel::table! {
    /// Posted tasks.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Title.
        #[max_length = 200]
        title -> Varchar,
        /// Description.
        description -> Text,
        /// Category label.
        #[max_length = 20]
        category -> Varchar,
        /// Budget in minor currency units.
        budget_cents -> Int8,
        /// Street address.
        address -> Text,
        /// Free-text requirements.
        requirements -> Nullable<Text>,
        /// Posting user.
        poster_id -> Uuid,
        /// Status label.
        #[max_length = 20]
        status -> Varchar,
        /// Assigned user, set for assigned and completed tasks.
        assignee_id -> Nullable<Uuid>,
        /// Completion timestamp, set for completed tasks.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last lifecycle timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Applications to tasks.
    applications (id) {
        /// Application identifier.
        id -> Uuid,
        /// Task applied to.
        task_id -> Uuid,
        /// Applying user.
        applicant_id -> Uuid,
        /// Cover message.
        message -> Nullable<Text>,
        /// Status label.
        #[max_length = 20]
        status -> Varchar,
        /// Submission timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reviews between task parties.
    reviews (id) {
        /// Review identifier.
        id -> Uuid,
        /// Reviewed task.
        task_id -> Uuid,
        /// Author.
        reviewer_id -> Uuid,
        /// Subject.
        reviewee_id -> Uuid,
        /// Star rating.
        rating -> Int2,
        /// Comment.
        comment -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// In-app notifications.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Recipient.
        recipient_id -> Uuid,
        /// Title.
        #[max_length = 200]
        title -> Varchar,
        /// Message body.
        message -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(applications -> tasks (task_id));
diesel::joinable!(reviews -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, applications, reviews, notifications);
