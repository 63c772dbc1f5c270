use crate::Topic;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a whole study plan.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

/// Progress state of one topic inside a plan.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TopicStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// A topic scheduled inside a study plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct PlannedTopic {
    id: String,
    topic: Topic,
    /// Position in the study order, starting at 1.
    order: u32,
    status: TopicStatus,
    /// Completion fraction from 0.0 to 1.0.
    progress: f32,
}

impl PlannedTopic {
    pub fn new(topic: Topic, order: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            topic,
            order,
            status: TopicStatus::Pending,
            progress: 0.0,
        }
    }
}

/// A schedule that spreads analyzed topics over the days before an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct StudyPlan {
    id: String,
    name: String,
    exam_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    /// Days between creation and the exam, never less than one.
    days_available: u32,
    /// Daily workload, never less than half an hour.
    minutes_per_day: u32,
    /// Sum of the topic estimates.
    total_minutes: u32,
    topics: Vec<PlannedTopic>,
    status: PlanStatus,
    /// Completion fraction from 0.0 to 1.0.
    progress: f32,
}

impl StudyPlan {
    /// Lays out `topics` as a plan ending at `exam_date`.
    ///
    /// Pure computation: topics are numbered in the order given and reset to
    /// pending. An exam in the past still yields a one-day plan rather than
    /// an error, since the learner can always start now.
    pub fn schedule(name: impl Into<String>, exam_date: DateTime<Utc>, topics: Vec<Topic>) -> Self {
        let created_at = Utc::now();
        let days_available = exam_date
            .signed_duration_since(created_at)
            .num_days()
            .max(1) as u32;
        let total_minutes: u32 = topics.iter().map(|t| *t.est_minutes()).sum();
        let minutes_per_day = (total_minutes / days_available).max(30);
        let topics = topics
            .into_iter()
            .enumerate()
            .map(|(i, topic)| PlannedTopic::new(topic, i as u32 + 1))
            .collect();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            exam_date,
            created_at,
            days_available,
            minutes_per_day,
            total_minutes,
            topics,
            status: PlanStatus::Active,
            progress: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn topic(name: &str, minutes: u32) -> Topic {
        Topic::new(name, "").with_estimates(3, minutes)
    }

    #[test]
    fn topics_are_numbered_from_one_and_reset_to_pending() {
        let plan = StudyPlan::schedule(
            "Analysis II",
            Utc::now() + Duration::days(10),
            vec![topic("Limits", 60), topic("Series", 90)],
        );
        let orders: Vec<u32> = plan.topics().iter().map(|t| *t.order()).collect();
        assert_eq!(orders, vec![1, 2]);
        assert!(
            plan.topics()
                .iter()
                .all(|t| *t.status() == TopicStatus::Pending)
        );
        assert_eq!(*plan.total_minutes(), 150);
    }

    #[test]
    fn past_exam_date_clamps_to_a_single_day() {
        let plan = StudyPlan::schedule(
            "Crunch",
            Utc::now() - Duration::days(3),
            vec![topic("Everything", 120)],
        );
        assert_eq!(*plan.days_available(), 1);
        assert_eq!(*plan.minutes_per_day(), 120);
    }

    #[test]
    fn light_plans_still_ask_for_half_an_hour_daily() {
        let plan = StudyPlan::schedule(
            "Review",
            Utc::now() + Duration::days(30),
            vec![topic("Glossary", 60)],
        );
        assert_eq!(*plan.minutes_per_day(), 30);
    }
}
