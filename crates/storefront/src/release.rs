//! Release schedule evaluation.
//!
//! An upcoming product with a future release instant is *locked*: it cannot
//! be added to the cart and shows a countdown instead. The lock lifts by
//! itself once the instant passes and never comes back.
//!
//! [`evaluate`] is a pure function of the wall clock. [`CountdownTicker`]
//! re-runs it once per second for pages that stream the countdown.

use std::time::Duration;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Utc};
use foxsports_core::ProductStatus;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Time left until a locked product is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub label: String,
}

/// Derived purchase state of a product at a given instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEvaluation {
    pub status_label: &'static str,
    pub is_purchase_locked: bool,
    /// Present only while locked.
    pub countdown: Option<Countdown>,
    /// Absolute release time in store-local time, present only while locked.
    pub release_date_label: Option<String>,
}

impl ReleaseEvaluation {
    /// Countdown label, if any.
    #[must_use]
    pub fn countdown_label(&self) -> Option<&str> {
        self.countdown.as_ref().map(|c| c.label.as_str())
    }
}

/// Parse a CMS release date.
///
/// Accepts RFC 3339 date-times and bare `YYYY-MM-DD` dates (midnight UTC).
/// Anything else is `None`, which leaves the product unlocked.
#[must_use]
pub fn parse_release_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Evaluate the release state of a product at `now`.
#[must_use]
pub fn evaluate(
    status: ProductStatus,
    release_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> ReleaseEvaluation {
    let locked_until = release_date.filter(|release| status == ProductStatus::Upcoming && now < *release);

    let status_label = match status {
        ProductStatus::Sold => "No disponible",
        ProductStatus::Reserved => "Reservado",
        _ if locked_until.is_some() => "Próximo lanzamiento",
        _ => "Disponible",
    };

    ReleaseEvaluation {
        status_label,
        is_purchase_locked: locked_until.is_some(),
        countdown: locked_until.map(|release| build_countdown(release - now)),
        release_date_label: locked_until.map(|release| format_release_label(release, offset)),
    }
}

/// Split the remaining time into units and pick the label.
///
/// Partial seconds round up, so a release 1.2 s away reads as 2 s.
fn build_countdown(remaining: chrono::TimeDelta) -> Countdown {
    let millis = remaining.num_milliseconds().max(0);
    let total_seconds = (millis + 999) / 1000;

    let days = total_seconds / SECONDS_PER_DAY;
    let hours = (total_seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total_seconds % SECONDS_PER_HOUR) / 60;
    let seconds = total_seconds % 60;

    let label = if days > 1 {
        format!("Disponible en {days} días")
    } else if days == 1 {
        if hours > 0 {
            format!("Disponible en 1 día y {hours} h")
        } else {
            "Disponible en 1 día".to_string()
        }
    } else if hours > 0 {
        if minutes > 0 {
            format!("Disponible en {hours} h {minutes} min")
        } else {
            format!("Disponible en {hours} h")
        }
    } else if minutes > 1 {
        format!("Disponible en {minutes} min")
    } else if minutes == 1 {
        format!("Disponible en 1 min y {seconds:02} s")
    } else if seconds > 0 {
        format!("Disponible en {seconds} s")
    } else {
        "Disponible".to_string()
    };

    Countdown {
        days,
        hours,
        minutes,
        seconds,
        label,
    }
}

/// Format an instant as `4 de noviembre de 2025, 08:00 p. m.` in the given
/// offset.
#[must_use]
pub fn format_release_label(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = instant.with_timezone(&offset);
    let (is_pm, hour) = local.hour12();
    let month = MONTHS
        .get(local.month0() as usize)
        .copied()
        .unwrap_or_default();

    format!(
        "{} de {month} de {}, {hour:02}:{:02} {}",
        local.day(),
        local.year(),
        local.minute(),
        if is_pm { "p. m." } else { "a. m." }
    )
}

// =============================================================================
// CountdownTicker
// =============================================================================

/// A running once-per-second countdown for a locked product.
///
/// Owns a tokio task that publishes a fresh [`ReleaseEvaluation`] every
/// second. The task stops by itself after publishing the unlocked state,
/// and is aborted when the ticker is dropped.
pub struct CountdownTicker {
    receiver: watch::Receiver<ReleaseEvaluation>,
    handle: JoinHandle<()>,
}

impl CountdownTicker {
    /// Start a ticker against the system clock.
    ///
    /// Returns `None` when the product is not locked right now; there is
    /// nothing to count down to.
    #[must_use]
    pub fn start(
        status: ProductStatus,
        release_date: Option<DateTime<Utc>>,
        offset: FixedOffset,
    ) -> Option<Self> {
        Self::start_with_clock(status, release_date, offset, Utc::now)
    }

    /// Start a ticker that reads time from `clock`.
    pub fn start_with_clock<C>(
        status: ProductStatus,
        release_date: Option<DateTime<Utc>>,
        offset: FixedOffset,
        clock: C,
    ) -> Option<Self>
    where
        C: Fn() -> DateTime<Utc> + Send + 'static,
    {
        let initial = evaluate(status, release_date, clock(), offset);
        if !initial.is_purchase_locked {
            return None;
        }

        let (sender, receiver) = watch::channel(initial);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately and the initial value is
            // already published.
            interval.tick().await;

            loop {
                interval.tick().await;
                let evaluation = evaluate(status, release_date, clock(), offset);
                let locked = evaluation.is_purchase_locked;
                if sender.send(evaluation).is_err() || !locked {
                    break;
                }
            }
            tracing::debug!("Countdown ticker finished");
        });

        Some(Self { receiver, handle })
    }

    /// A receiver that observes every published evaluation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ReleaseEvaluation> {
        self.receiver.clone()
    }

    /// The most recently published evaluation.
    #[must_use]
    pub fn current(&self) -> ReleaseEvaluation {
        self.receiver.borrow().clone()
    }

    /// Whether the ticking task has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::TimeDelta;

    use super::*;

    fn santo_domingo() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        parse_release_date(rfc3339).unwrap()
    }

    fn label_for(remaining: TimeDelta) -> String {
        build_countdown(remaining).label
    }

    #[test]
    fn test_countdown_labels() {
        let cases = [
            (TimeDelta::days(3), "Disponible en 3 días"),
            (TimeDelta::days(1), "Disponible en 1 día"),
            (TimeDelta::days(1) + TimeDelta::hours(5), "Disponible en 1 día y 5 h"),
            (TimeDelta::hours(2), "Disponible en 2 h"),
            (TimeDelta::hours(2) + TimeDelta::minutes(7), "Disponible en 2 h 7 min"),
            (TimeDelta::minutes(12), "Disponible en 12 min"),
            (TimeDelta::seconds(65), "Disponible en 1 min y 05 s"),
            (TimeDelta::seconds(42), "Disponible en 42 s"),
            (TimeDelta::zero(), "Disponible"),
        ];

        for (remaining, expected) in cases {
            assert_eq!(label_for(remaining), expected, "remaining {remaining}");
        }
    }

    #[test]
    fn test_countdown_rounds_partial_seconds_up() {
        let countdown = build_countdown(TimeDelta::milliseconds(1_200));
        assert_eq!(countdown.seconds, 2);
        assert_eq!(countdown.label, "Disponible en 2 s");
    }

    #[test]
    fn test_countdown_parts() {
        let countdown = build_countdown(
            TimeDelta::days(2) + TimeDelta::hours(3) + TimeDelta::minutes(4) + TimeDelta::seconds(5),
        );
        assert_eq!(
            (countdown.days, countdown.hours, countdown.minutes, countdown.seconds),
            (2, 3, 4, 5)
        );
    }

    #[test]
    fn test_lock_lifts_once_release_passes() {
        let now = at("2025-11-04T23:59:58Z");
        let release = Some(now + TimeDelta::seconds(2));

        let before = evaluate(ProductStatus::Upcoming, release, now, santo_domingo());
        assert!(before.is_purchase_locked);
        assert_eq!(before.status_label, "Próximo lanzamiento");
        assert_eq!(before.countdown_label(), Some("Disponible en 2 s"));

        for elapsed in [2, 3, 60, 86_400] {
            let later = evaluate(
                ProductStatus::Upcoming,
                release,
                now + TimeDelta::seconds(elapsed),
                santo_domingo(),
            );
            assert!(!later.is_purchase_locked, "relocked after {elapsed}s");
            assert_eq!(later.status_label, "Disponible");
            assert!(later.countdown.is_none());
            assert!(later.release_date_label.is_none());
        }
    }

    #[test]
    fn test_only_upcoming_products_lock() {
        let now = at("2025-01-01T00:00:00Z");
        let release = Some(now + TimeDelta::days(10));

        let sold = evaluate(ProductStatus::Sold, release, now, santo_domingo());
        assert!(!sold.is_purchase_locked);
        assert_eq!(sold.status_label, "No disponible");

        let reserved = evaluate(ProductStatus::Reserved, release, now, santo_domingo());
        assert!(!reserved.is_purchase_locked);
        assert_eq!(reserved.status_label, "Reservado");

        let available = evaluate(ProductStatus::Available, release, now, santo_domingo());
        assert!(!available.is_purchase_locked);
        assert_eq!(available.status_label, "Disponible");
    }

    #[test]
    fn test_upcoming_without_date_is_unlocked() {
        let evaluation = evaluate(ProductStatus::Upcoming, None, Utc::now(), santo_domingo());
        assert!(!evaluation.is_purchase_locked);
        assert_eq!(evaluation.status_label, "Disponible");
    }

    #[test]
    fn test_parse_release_date() {
        assert_eq!(
            parse_release_date("2025-11-04T20:00:00-04:00"),
            Some(at("2025-11-05T00:00:00Z"))
        );
        assert_eq!(
            parse_release_date("2025-11-04"),
            Some(at("2025-11-04T00:00:00Z"))
        );
        assert_eq!(parse_release_date("pronto"), None);
        assert_eq!(parse_release_date(""), None);
    }

    #[test]
    fn test_release_label_in_store_time() {
        let label = format_release_label(at("2025-11-05T00:00:00Z"), santo_domingo());
        assert_eq!(label, "4 de noviembre de 2025, 08:00 p. m.");

        let morning = format_release_label(at("2025-03-01T13:05:00Z"), santo_domingo());
        assert_eq!(morning, "1 de marzo de 2025, 09:05 a. m.");
    }

    #[test]
    fn test_locked_evaluation_has_release_label() {
        let now = at("2025-11-01T00:00:00Z");
        let evaluation = evaluate(
            ProductStatus::Upcoming,
            Some(at("2025-11-05T00:00:00Z")),
            now,
            santo_domingo(),
        );
        assert_eq!(
            evaluation.release_date_label.as_deref(),
            Some("4 de noviembre de 2025, 08:00 p. m.")
        );
        assert_eq!(evaluation.countdown_label(), Some("Disponible en 4 días"));
    }

    #[tokio::test]
    async fn test_ticker_not_started_when_unlocked() {
        let ticker = CountdownTicker::start(ProductStatus::Available, None, santo_domingo());
        assert!(ticker.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_publishes_until_unlocked() {
        let start = at("2025-11-04T23:59:57Z");
        let release = Some(start + TimeDelta::seconds(2));
        let elapsed = Arc::new(AtomicI64::new(0));
        let clock = {
            let elapsed = Arc::clone(&elapsed);
            move || start + TimeDelta::seconds(elapsed.fetch_add(1, Ordering::SeqCst))
        };

        let ticker = CountdownTicker::start_with_clock(
            ProductStatus::Upcoming,
            release,
            santo_domingo(),
            clock,
        )
        .unwrap();
        let mut receiver = ticker.subscribe();
        assert_eq!(
            receiver.borrow_and_update().countdown_label(),
            Some("Disponible en 2 s")
        );

        receiver.changed().await.unwrap();
        assert_eq!(
            receiver.borrow_and_update().countdown_label(),
            Some("Disponible en 1 s")
        );

        receiver.changed().await.unwrap();
        assert!(!receiver.borrow_and_update().is_purchase_locked);

        // The task exits after publishing the unlocked state.
        assert!(receiver.changed().await.is_err());
        assert!(ticker.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_ticker_stops_task() {
        let now = Utc::now();
        let ticker = CountdownTicker::start(
            ProductStatus::Upcoming,
            Some(now + TimeDelta::days(1)),
            santo_domingo(),
        )
        .unwrap();
        let mut receiver = ticker.subscribe();
        drop(ticker);

        // The sender lives in the aborted task, so the channel closes.
        assert!(receiver.changed().await.is_err());
    }
}
