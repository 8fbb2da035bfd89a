use chrono::{DateTime, Duration, NaiveDate, Utc};
use fudidoflix_config::{NotificationConfig, MAX_CHECK_INTERVAL_HOURS, MAX_LOOKBACK_DAYS};
use fudidoflix_models::{InboxNotification, MediaKind, NotificationKind};
use fudidoflix_tmdb::{api, MetadataSource};
use futures::future::join_all;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};
use crate::watch_store::WatchStore;

/// Result of one inbox reconciliation attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// The previous check is still fresh.
    Skipped { next_check_at: DateTime<Utc> },
    Completed {
        new_episodes: usize,
        failures: usize,
        badge: usize,
    },
}

impl ScanOutcome {
    pub fn ran(&self) -> bool {
        matches!(self, ScanOutcome::Completed { .. })
    }
}

fn interval(config: &NotificationConfig) -> Duration {
    Duration::hours(config.check_interval_hours.clamp(1, MAX_CHECK_INTERVAL_HOURS))
}

fn lookback(config: &NotificationConfig) -> Duration {
    Duration::days(config.first_run_lookback_days.clamp(0, MAX_LOOKBACK_DAYS))
}

/// When the gate opens again, or `None` if a scan would run now.
pub fn next_check_at(store: &WatchStore, config: &NotificationConfig) -> Option<DateTime<Utc>> {
    let now = store.clock().now();
    let last = store.last_check()?;
    let next = last.checked_add_signed(interval(config))?;
    // A stamp from the future (clock moved back) does not hold the gate shut
    if last > now || next <= now {
        None
    } else {
        Some(next)
    }
}

fn aired_after(date: NaiveDate, since: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match date.and_hms_opt(0, 0, 0) {
        Some(midnight) => {
            let aired = midnight.and_utc();
            aired > since && aired <= now
        }
        None => false,
    }
}

/// Rebuild the inbox: keep earlier new-episode entries, add new ones for
/// followed series, then regenerate the two reminder slots.
///
/// Runs at most once per `check_interval_hours`. The last-check stamp is
/// written whenever the scan runs, even if every series fetch failed.
pub async fn check_for_updates<R>(
    store: &WatchStore,
    source: &dyn MetadataSource,
    config: &NotificationConfig,
    rng: &mut R,
) -> ScanOutcome
where
    R: Rng + ?Sized,
{
    if let Some(next_check_at) = next_check_at(store, config) {
        debug!(operation = "inbox_scan", %next_check_at, "Skipping scan, last check is recent");
        return ScanOutcome::Skipped { next_check_at };
    }

    let started = Instant::now();
    let now = store.clock().now();
    let since = store
        .last_check()
        .filter(|last| *last <= now)
        .unwrap_or_else(|| now - lookback(config));

    let mut inbox: Vec<InboxNotification> = store
        .inbox()
        .into_iter()
        .filter(|n| n.kind() == NotificationKind::NewEp)
        .collect();

    let followed: Vec<_> = store
        .my_list()
        .into_iter()
        .filter(|entry| entry.kind == MediaKind::Tv)
        .collect();

    info!(operation = "inbox_scan", series = followed.len(), %since, "Checking followed series");

    let results = join_all(
        followed
            .iter()
            .map(|entry| api::details(source, MediaKind::Tv, entry.id)),
    )
    .await;

    let mut new_episodes = 0;
    let mut failures = 0;
    let mut fresh = Vec::new();
    for (entry, result) in followed.iter().zip(results) {
        let details = match result {
            Ok(details) => details,
            Err(e) => {
                warn!(operation = "inbox_scan", series_id = entry.id, error = %e, "Failed to fetch series details");
                failures += 1;
                continue;
            }
        };
        let Some(episode) = details.last_episode_to_air.as_ref() else {
            continue;
        };
        let Some(aired) = episode.aired_on() else {
            continue;
        };
        if !aired_after(aired, since, now) {
            continue;
        }

        let notification = InboxNotification::new_episode(
            entry.id,
            details.display_title(),
            details.poster_path.clone().or_else(|| Some(entry.poster_path.clone())),
            episode.season_number,
            episode.episode_number,
            episode.name.clone(),
            aired,
            now,
        );
        let duplicate = inbox
            .iter()
            .chain(fresh.iter())
            .any(|n: &InboxNotification| n.unique_id() == notification.unique_id());
        if !duplicate {
            debug!(unique_id = notification.unique_id(), "New episode found");
            fresh.push(notification);
            new_episodes += 1;
        }
    }
    // Newest first, same as single inserts
    fresh.extend(inbox);
    let mut inbox = fresh;

    if let Some(entry) = store
        .continue_watching()
        .into_iter()
        .find(|entry| entry.kind == MediaKind::Tv)
    {
        inbox.push(InboxNotification::continue_watching(entry, now));
    }
    if let Some(entry) = store.my_list().choose(rng) {
        inbox.push(InboxNotification::my_list_reminder(entry.clone(), now));
    }

    store.replace_inbox(&inbox);
    store.set_last_check(now);

    info!(
        operation = "inbox_scan_complete",
        new_episodes,
        failures,
        badge = inbox.len(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Inbox scan finished"
    );

    ScanOutcome::Completed {
        new_episodes,
        failures,
        badge: inbox.len(),
    }
}

/// Display order: new episodes, then continue watching, then list reminders.
/// Storage order is untouched.
pub fn sorted_for_display(items: &[InboxNotification]) -> Vec<InboxNotification> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|n| n.kind());
    sorted
}

pub fn badge_count(store: &WatchStore) -> usize {
    store.inbox().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use fudidoflix_config::StorageConfig;
    use fudidoflix_models::{EntryDraft, CONTINUE_WATCHING_ID, MY_LIST_REMINDER_ID};
    use fudidoflix_tmdb::fake::FakeSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn setup() -> (WatchStore, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(now()));
        let store = WatchStore::new(Arc::new(MemoryStore::new()), &StorageConfig::default())
            .with_clock(clock.clone());
        (store, clock)
    }

    fn follow(store: &WatchStore, id: u64, kind: MediaKind, title: &str) {
        store.save_to_my_list(
            &EntryDraft::new(id, kind)
                .with_title(title)
                .with_poster(format!("/{}.jpg", id)),
        );
    }

    fn series(id: u64, name: &str, season: u32, episode: u32, air_date: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "poster_path": format!("/{}.jpg", id),
            "last_episode_to_air": {
                "season_number": season,
                "episode_number": episode,
                "name": "Episode",
                "air_date": air_date
            }
        })
    }

    #[tokio::test]
    async fn test_scan_does_not_run_twice_within_interval() {
        let (store, clock) = setup();
        follow(&store, 10, MediaKind::Tv, "Dark");
        let source = FakeSource::new().with("/tv/10", series(10, "Dark", 2, 3, "2026-10-17"));
        let config = NotificationConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        assert!(check_for_updates(&store, &source, &config, &mut rng).await.ran());
        assert_eq!(source.call_count("/tv/10"), 1);

        clock.advance(Duration::hours(3));
        let outcome = check_for_updates(&store, &source, &config, &mut rng).await;
        assert_eq!(
            outcome,
            ScanOutcome::Skipped {
                next_check_at: now() + Duration::hours(4)
            }
        );
        assert_eq!(source.call_count("/tv/10"), 1);

        clock.advance(Duration::hours(1));
        assert!(check_for_updates(&store, &source, &config, &mut rng).await.ran());
        assert_eq!(source.call_count("/tv/10"), 2);
    }

    #[tokio::test]
    async fn test_out_of_range_settings_are_clamped() {
        let (store, _clock) = setup();
        follow(&store, 10, MediaKind::Tv, "Dark");
        let source = FakeSource::new().with("/tv/10", series(10, "Dark", 2, 3, "2026-10-17"));
        let config = NotificationConfig {
            check_interval_hours: i64::MAX,
            first_run_lookback_days: i64::MAX,
        };
        let mut rng = StdRng::seed_from_u64(1);

        assert!(check_for_updates(&store, &source, &config, &mut rng).await.ran());
        assert_eq!(
            check_for_updates(&store, &source, &config, &mut rng).await,
            ScanOutcome::Skipped {
                next_check_at: now() + Duration::hours(MAX_CHECK_INTERVAL_HOURS)
            }
        );
    }

    #[tokio::test]
    async fn test_first_run_flags_recent_episodes_only() {
        let (store, _clock) = setup();
        follow(&store, 10, MediaKind::Tv, "Dark");
        follow(&store, 11, MediaKind::Tv, "Old Show");
        follow(&store, 12, MediaKind::Tv, "Upcoming");
        let source = FakeSource::new()
            .with("/tv/10", series(10, "Dark", 2, 3, "2026-10-17"))
            .with("/tv/11", series(11, "Old Show", 5, 10, "2025-01-01"))
            .with("/tv/12", series(12, "Upcoming", 1, 1, "2026-11-01"));
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = check_for_updates(&store, &source, &NotificationConfig::default(), &mut rng).await;
        assert_eq!(
            outcome,
            ScanOutcome::Completed {
                new_episodes: 1,
                failures: 0,
                badge: 2
            }
        );
        let inbox = store.inbox();
        assert_eq!(inbox[0].unique_id(), "new_ep-10-S2-E3");
        assert_eq!(inbox[1].unique_id(), MY_LIST_REMINDER_ID);
        assert_eq!(store.last_check(), Some(now()));
    }

    #[tokio::test]
    async fn test_new_episodes_accumulate_and_reminders_stay_single() {
        let (store, clock) = setup();
        follow(&store, 10, MediaKind::Tv, "Dark");
        follow(&store, 99, MediaKind::Movie, "Heat");
        store.save_to_continue_watching(&EntryDraft::new(10, MediaKind::Tv).with_title("Dark").with_poster("/10.jpg"));
        let config = NotificationConfig::default();
        let mut rng = StdRng::seed_from_u64(3);

        let source = FakeSource::new().with("/tv/10", series(10, "Dark", 2, 3, "2026-10-19"));
        check_for_updates(&store, &source, &config, &mut rng).await;

        clock.advance(Duration::days(7));
        let source = FakeSource::new().with("/tv/10", series(10, "Dark", 2, 4, "2026-10-26"));
        check_for_updates(&store, &source, &config, &mut rng).await;

        clock.advance(Duration::hours(5));
        check_for_updates(&store, &source, &config, &mut rng).await;

        let inbox = store.inbox();
        let ids: Vec<&str> = inbox.iter().map(|n| n.unique_id()).collect();
        assert_eq!(&ids[..3], &["new_ep-10-S2-E4", "new_ep-10-S2-E3", CONTINUE_WATCHING_ID]);
        assert_eq!(inbox.len(), 4);
        assert_eq!(ids.iter().filter(|id| **id == CONTINUE_WATCHING_ID).count(), 1);
        assert_eq!(ids.iter().filter(|id| **id == MY_LIST_REMINDER_ID).count(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_skipped_and_check_is_stamped() {
        let (store, _clock) = setup();
        follow(&store, 10, MediaKind::Tv, "Dark");
        follow(&store, 20, MediaKind::Tv, "Gone");
        let source = FakeSource::new()
            .with("/tv/10", series(10, "Dark", 1, 1, "2026-10-18"))
            .with_status("/tv/20", 500);
        let mut rng = StdRng::seed_from_u64(9);

        let outcome = check_for_updates(&store, &source, &NotificationConfig::default(), &mut rng).await;
        match outcome {
            ScanOutcome::Completed { new_episodes, failures, .. } => {
                assert_eq!(new_episodes, 1);
                assert_eq!(failures, 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(store.last_check(), Some(now()));
    }

    #[tokio::test]
    async fn test_stale_reminders_are_dropped_when_lists_empty() {
        let (store, _clock) = setup();
        let entry = EntryDraft::new(5, MediaKind::Movie)
            .with_title("Heat")
            .with_poster("/h.jpg")
            .validate()
            .unwrap();
        store.add_notification(InboxNotification::my_list_reminder(entry.clone(), now()));
        store.add_notification(InboxNotification::continue_watching(entry, now()));
        let mut rng = StdRng::seed_from_u64(1);

        let outcome =
            check_for_updates(&store, &FakeSource::new(), &NotificationConfig::default(), &mut rng).await;
        assert_eq!(
            outcome,
            ScanOutcome::Completed {
                new_episodes: 0,
                failures: 0,
                badge: 0
            }
        );
        assert!(store.inbox().is_empty());
    }

    #[test]
    fn test_display_sort_keeps_storage_order() {
        let entry = EntryDraft::new(5, MediaKind::Tv)
            .with_title("Dark")
            .with_poster("/d.jpg")
            .validate()
            .unwrap();
        let aired = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let items = vec![
            InboxNotification::my_list_reminder(entry.clone(), now()),
            InboxNotification::new_episode(5, "Dark", None, 1, 2, None, aired, now()),
            InboxNotification::continue_watching(entry, now()),
        ];

        let sorted = sorted_for_display(&items);
        let kinds: Vec<NotificationKind> = sorted.iter().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::NewEp,
                NotificationKind::ContinueWatching,
                NotificationKind::MyListReminder
            ]
        );
        assert_eq!(items[0].kind(), NotificationKind::MyListReminder);
    }
}
