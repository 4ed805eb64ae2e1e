use chrono::NaiveDate;
use storage::{
    Database,
    dto::week::{CurrentWeek, WeekView},
    error::Result,
};

use crate::features::engine;

pub async fn current_week(db: &Database) -> Result<CurrentWeek> {
    engine(db).await?.current_week().await
}

pub async fn week_view(db: &Database, week: NaiveDate) -> Result<WeekView> {
    engine(db).await?.week_view(week).await
}
