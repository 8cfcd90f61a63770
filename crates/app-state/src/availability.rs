//! Day availability state for the booking flow
//!
//! Tracks the provider and calendar day the user is booking against,
//! fetches that day's hour slots once per distinct selection, and
//! derives the morning and afternoon schedule the screens render.

use async_trait::async_trait;
use booking_client::agent::{AgentError, BookingAgent};
use booking_client::types::AvailabilitySlot;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Availability error types
#[derive(Debug, Error)]
pub enum AvailabilityError {
    /// The availability fetch failed
    #[error("Availability fetch failed: {0}")]
    Fetch(#[from] AgentError),
}

/// Result type for availability operations
pub type Result<T> = std::result::Result<T, AvailabilityError>;

/// A bookable hour with its display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySlot {
    /// Hour of the day (0-23)
    pub hour: u32,
    /// Whether the slot can still be booked
    pub available: bool,
    /// Zero-padded display label, e.g. "09:00"
    pub label: String,
}

/// A day's slots split into the two sections the screen shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DaySchedule {
    /// Slots before noon, in service order
    pub morning: Vec<DaySlot>,
    /// Slots from noon onward, in service order
    pub afternoon: Vec<DaySlot>,
}

/// Split raw slots into morning and afternoon sections
///
/// Hours below 12 land in the morning, 12 and above in the afternoon.
/// Service order is preserved within each section and nothing is
/// deduplicated, so the two sections together hold exactly the input.
pub fn partition_slots(slots: &[AvailabilitySlot]) -> DaySchedule {
    let mut schedule = DaySchedule::default();
    for slot in slots {
        let entry = DaySlot {
            hour: slot.hour,
            available: slot.available,
            label: format!("{:02}:00", slot.hour),
        };
        if slot.hour < 12 {
            schedule.morning.push(entry);
        } else {
            schedule.afternoon.push(entry);
        }
    }
    schedule
}

/// Source of day availability data
///
/// [`BookingAgent`] is the production implementation; tests substitute
/// a mock to count and script fetches.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Fetch the hour slots for one provider on one calendar day
    ///
    /// `month` and `day` are calendar values, so January is 1.
    async fn fetch_day(
        &self,
        provider_id: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> std::result::Result<Vec<AvailabilitySlot>, AgentError>;
}

#[async_trait]
impl AvailabilitySource for BookingAgent {
    async fn fetch_day(
        &self,
        provider_id: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> std::result::Result<Vec<AvailabilitySlot>, AgentError> {
        self.day_availability(provider_id, year, month, day).await
    }
}

/// Identity of one fetched (provider, day) selection
#[derive(Debug, Clone, PartialEq, Eq)]
struct FetchKey {
    provider_id: String,
    date: NaiveDate,
}

struct AvailabilityState {
    provider_id: Option<String>,
    date: NaiveDate,
    selected_hour: Option<u32>,
    last_fetched: Option<FetchKey>,
    slots: Vec<AvailabilitySlot>,
}

/// Aggregates the booking screen's selection and the fetched day slots
///
/// A fetch runs only when the (provider, day) pair actually changed;
/// re-announcing the current selection is free. The selected hour is a
/// purely local choice and survives selection changes.
///
/// # Example
///
/// ```no_run
/// use app_state::availability::AvailabilityAggregator;
/// use booking_client::BookingAgent;
/// use chrono::NaiveDate;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let agent = Arc::new(BookingAgent::new("https://api.clipbook.app"));
///     let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
///
///     let aggregator = AvailabilityAggregator::new(agent, today);
///     aggregator.on_selection_changed("2", today).await?;
///
///     let schedule = aggregator.schedule();
///     println!("{} morning slots", schedule.morning.len());
///     Ok(())
/// }
/// ```
pub struct AvailabilityAggregator {
    source: Arc<dyn AvailabilitySource>,
    state: RwLock<AvailabilityState>,
}

impl AvailabilityAggregator {
    /// Create an aggregator with no provider selected yet
    pub fn new(source: Arc<dyn AvailabilitySource>, initial_date: NaiveDate) -> Self {
        Self {
            source,
            state: RwLock::new(AvailabilityState {
                provider_id: None,
                date: initial_date,
                selected_hour: None,
                last_fetched: None,
                slots: Vec::new(),
            }),
        }
    }

    /// Record a new (provider, day) selection and refresh if it changed
    ///
    /// Returns whether a fetch ran. When the pair matches the last
    /// successful fetch nothing happens. On a fetch failure the
    /// previous slots stay in place and the last fetched pair is not
    /// advanced, so calling again with the same selection retries.
    pub async fn on_selection_changed(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<bool> {
        let key = FetchKey {
            provider_id: provider_id.to_string(),
            date,
        };

        {
            let mut state = self.state.write();
            state.provider_id = Some(key.provider_id.clone());
            state.date = date;
            if state.last_fetched.as_ref() == Some(&key) {
                return Ok(false);
            }
        }

        let slots = self
            .source
            .fetch_day(provider_id, date.year(), date.month(), date.day())
            .await?;

        tracing::debug!(
            provider = provider_id,
            %date,
            count = slots.len(),
            "day availability refreshed"
        );

        let mut state = self.state.write();
        state.slots = slots;
        state.last_fetched = Some(key);
        Ok(true)
    }

    /// Record the hour the user tapped
    ///
    /// No validation happens here; whether the hour is actually
    /// bookable is the service's call at submission time.
    pub fn select_hour(&self, hour: u32) {
        self.state.write().selected_hour = Some(hour);
    }

    /// The hour the user selected, if any
    pub fn selected_hour(&self) -> Option<u32> {
        self.state.read().selected_hour
    }

    /// The provider currently selected, if any
    pub fn provider_id(&self) -> Option<String> {
        self.state.read().provider_id.clone()
    }

    /// The calendar day currently selected
    pub fn date(&self) -> NaiveDate {
        self.state.read().date
    }

    /// The fetched slots split into morning and afternoon
    pub fn schedule(&self) -> DaySchedule {
        partition_slots(&self.state.read().slots)
    }

    /// The instant the appointment would start if submitted now
    ///
    /// The service stores appointments one hour before the label the
    /// user tapped, so a "14:00" selection books the 13:00 instant. A
    /// midnight label rolls back into the previous day. None until an
    /// hour is selected.
    pub fn booked_start(&self) -> Option<DateTime<Utc>> {
        let state = self.state.read();
        let hour = state.selected_hour?;

        let midnight = state.date.and_time(NaiveTime::MIN);
        let start = midnight + Duration::hours(hour as i64) - Duration::hours(1);
        Some(start.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot(hour: u32, available: bool) -> AvailabilitySlot {
        AvailabilitySlot { hour, available }
    }

    fn hours(section: &[DaySlot]) -> Vec<u32> {
        section.iter().map(|s| s.hour).collect()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_partition_splits_at_noon() {
        let slots = vec![
            slot(8, true),
            slot(9, false),
            slot(11, true),
            slot(12, true),
            slot(13, true),
            slot(17, false),
        ];

        let schedule = partition_slots(&slots);

        assert_eq!(hours(&schedule.morning), vec![8, 9, 11]);
        assert_eq!(hours(&schedule.afternoon), vec![12, 13, 17]);
    }

    #[test]
    fn test_partition_boundary_hours() {
        let schedule = partition_slots(&[slot(0, true), slot(11, true), slot(12, true)]);

        assert_eq!(hours(&schedule.morning), vec![0, 11]);
        assert_eq!(hours(&schedule.afternoon), vec![12]);
    }

    #[test]
    fn test_partition_preserves_service_order() {
        let schedule = partition_slots(&[slot(14, true), slot(9, true), slot(8, true), slot(13, true)]);

        assert_eq!(hours(&schedule.morning), vec![9, 8]);
        assert_eq!(hours(&schedule.afternoon), vec![14, 13]);
    }

    #[test]
    fn test_partition_keeps_duplicates() {
        let schedule = partition_slots(&[slot(9, true), slot(9, false)]);

        assert_eq!(schedule.morning.len(), 2);
        assert!(schedule.morning[0].available);
        assert!(!schedule.morning[1].available);
    }

    #[test]
    fn test_partition_labels_are_zero_padded() {
        let schedule = partition_slots(&[slot(0, true), slot(8, true), slot(13, true)]);

        assert_eq!(schedule.morning[0].label, "00:00");
        assert_eq!(schedule.morning[1].label, "08:00");
        assert_eq!(schedule.afternoon[0].label, "13:00");
    }

    #[test]
    fn test_partition_empty_input() {
        let schedule = partition_slots(&[]);

        assert!(schedule.morning.is_empty());
        assert!(schedule.afternoon.is_empty());
    }

    #[tokio::test]
    async fn test_selection_change_fetches_once() {
        let mut source = MockAvailabilitySource::new();
        source
            .expect_fetch_day()
            .withf(|id, y, m, d| id == "2" && *y == 2026 && *m == 3 && *d == 10)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![slot(8, true), slot(13, true)]));

        let aggregator =
            AvailabilityAggregator::new(Arc::new(source), date(2026, 3, 1));

        let fetched = aggregator
            .on_selection_changed("2", date(2026, 3, 10))
            .await
            .unwrap();
        assert!(fetched);

        let schedule = aggregator.schedule();
        assert_eq!(hours(&schedule.morning), vec![8]);
        assert_eq!(hours(&schedule.afternoon), vec![13]);

        // Same pair again, no second fetch; times(1) above enforces it
        let fetched = aggregator
            .on_selection_changed("2", date(2026, 3, 10))
            .await
            .unwrap();
        assert!(!fetched);
    }

    #[tokio::test]
    async fn test_either_changed_field_triggers_fetch() {
        let mut source = MockAvailabilitySource::new();
        source
            .expect_fetch_day()
            .times(3)
            .returning(|_, _, _, _| Ok(vec![]));

        let aggregator =
            AvailabilityAggregator::new(Arc::new(source), date(2026, 3, 1));

        assert!(aggregator
            .on_selection_changed("2", date(2026, 3, 10))
            .await
            .unwrap());
        // Different provider, same day
        assert!(aggregator
            .on_selection_changed("3", date(2026, 3, 10))
            .await
            .unwrap());
        // Same provider, different day
        assert!(aggregator
            .on_selection_changed("3", date(2026, 3, 11))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_slots_and_retries() {
        let mut source = MockAvailabilitySource::new();
        source
            .expect_fetch_day()
            .withf(|_, _, _, d| *d == 10)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![slot(8, true)]));
        let mut failed_once = false;
        source
            .expect_fetch_day()
            .withf(|_, _, _, d| *d == 11)
            .times(2)
            .returning(move |_, _, _, _| {
                if failed_once {
                    Ok(vec![slot(15, true)])
                } else {
                    failed_once = true;
                    Err(AgentError::Service("availability service down".to_string()))
                }
            });

        let aggregator =
            AvailabilityAggregator::new(Arc::new(source), date(2026, 3, 1));

        aggregator
            .on_selection_changed("2", date(2026, 3, 10))
            .await
            .unwrap();

        let result = aggregator.on_selection_changed("2", date(2026, 3, 11)).await;
        assert!(matches!(result, Err(AvailabilityError::Fetch(_))));

        // Previous slots survive the failure
        assert_eq!(hours(&aggregator.schedule().morning), vec![8]);

        // The same selection retries instead of treating the failure as fetched
        let fetched = aggregator
            .on_selection_changed("2", date(2026, 3, 11))
            .await
            .unwrap();
        assert!(fetched);
        assert_eq!(hours(&aggregator.schedule().afternoon), vec![15]);
    }

    #[tokio::test]
    async fn test_month_is_calendar_valued() {
        let mut source = MockAvailabilitySource::new();
        source
            .expect_fetch_day()
            .withf(|id, y, m, d| id == "2" && *y == 2026 && *m == 1 && *d == 5)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![]));

        let aggregator =
            AvailabilityAggregator::new(Arc::new(source), date(2026, 1, 1));
        aggregator
            .on_selection_changed("2", date(2026, 1, 5))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_select_hour_records_any_hour() {
        let aggregator = AvailabilityAggregator::new(
            Arc::new(MockAvailabilitySource::new()),
            date(2026, 3, 10),
        );

        assert_eq!(aggregator.selected_hour(), None);
        aggregator.select_hour(14);
        assert_eq!(aggregator.selected_hour(), Some(14));

        // Not validated against the fetched slots
        aggregator.select_hour(99);
        assert_eq!(aggregator.selected_hour(), Some(99));
    }

    #[tokio::test]
    async fn test_selected_hour_survives_selection_change() {
        let mut source = MockAvailabilitySource::new();
        source
            .expect_fetch_day()
            .returning(|_, _, _, _| Ok(vec![]));

        let aggregator =
            AvailabilityAggregator::new(Arc::new(source), date(2026, 3, 1));
        aggregator.select_hour(14);
        aggregator
            .on_selection_changed("2", date(2026, 3, 10))
            .await
            .unwrap();

        assert_eq!(aggregator.selected_hour(), Some(14));
    }

    #[test]
    fn test_booked_start_is_hour_before_label() {
        let aggregator = AvailabilityAggregator::new(
            Arc::new(MockAvailabilitySource::new()),
            date(2026, 3, 10),
        );
        aggregator.select_hour(14);

        let expected = Utc.with_ymd_and_hms(2026, 3, 10, 13, 0, 0).unwrap();
        assert_eq!(aggregator.booked_start(), Some(expected));
    }

    #[test]
    fn test_booked_start_midnight_label_rolls_back_a_day() {
        let aggregator = AvailabilityAggregator::new(
            Arc::new(MockAvailabilitySource::new()),
            date(2026, 3, 10),
        );
        aggregator.select_hour(0);

        let expected = Utc.with_ymd_and_hms(2026, 3, 9, 23, 0, 0).unwrap();
        assert_eq!(aggregator.booked_start(), Some(expected));
    }

    #[test]
    fn test_booked_start_requires_a_selection() {
        let aggregator = AvailabilityAggregator::new(
            Arc::new(MockAvailabilitySource::new()),
            date(2026, 3, 10),
        );

        assert_eq!(aggregator.booked_start(), None);
    }
}
