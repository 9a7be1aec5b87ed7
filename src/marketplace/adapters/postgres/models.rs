//! Diesel row models for the marketplace.

use super::schema::{applications, notifications, reviews, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query and insert model for tasks.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub budget_cents: i64,
    pub address: String,
    pub requirements: Option<String>,
    pub poster_id: uuid::Uuid,
    pub status: String,
    pub assignee_id: Option<uuid::Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status columns written by a conditional transition.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskStatusChangeset {
    pub status: String,
    pub assignee_id: Option<uuid::Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Query and insert model for applications.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApplicationRow {
    pub id: uuid::Uuid,
    pub task_id: uuid::Uuid,
    pub applicant_id: uuid::Uuid,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Query and insert model for reviews.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewRow {
    pub id: uuid::Uuid,
    pub task_id: uuid::Uuid,
    pub reviewer_id: uuid::Uuid,
    pub reviewee_id: uuid::Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query and insert model for notifications.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    pub id: uuid::Uuid,
    pub recipient_id: uuid::Uuid,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
