//! # Feature: Birthday Scheduler
//!
//! Daily job that announces every birthday of the day in the broadcast channel.
//!
//! The job sleeps until the next scheduled instant, fires once, then waits for
//! the following day. If the bot is down at the scheduled time that day is
//! skipped: there is no catch-up at startup and no backlog.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::announcer::BirthdayAnnouncer;
use super::registry::BirthdateRegistry;
use super::schedule::DailySchedule;
use crate::core::{AnnounceError, LookupGap};

pub struct BirthdayScheduler {
    schedule: DailySchedule,
    registry: Arc<BirthdateRegistry>,
    announcer: Arc<BirthdayAnnouncer>,
}

impl BirthdayScheduler {
    pub fn new(
        schedule: DailySchedule,
        registry: Arc<BirthdateRegistry>,
        announcer: Arc<BirthdayAnnouncer>,
    ) -> Self {
        Self {
            schedule,
            registry,
            announcer,
        }
    }

    /// Announce every member whose birthday is `today`.
    ///
    /// A failed send is logged and the remaining members are still announced.
    /// A member without a display name aborts the firing with [`LookupGap`].
    /// Returns the number of announcements sent.
    pub async fn fire(&self, today: NaiveDate) -> Result<usize, LookupGap> {
        let matching = self.registry.matches_on(today);
        if matching.is_empty() {
            debug!("No birthdays on {today}");
            return Ok(0);
        }

        let mut sent = 0;
        for user_id in matching {
            match self.announcer.announce(user_id).await {
                Ok(_) => sent += 1,
                Err(AnnounceError::Dispatch(e)) => {
                    warn!("Failed to announce birthday of {user_id}: {e}");
                }
                Err(AnnounceError::LookupGap(gap)) => return Err(gap),
            }
        }
        Ok(sent)
    }

    /// Spawn the daily job. Nothing fires before this call.
    pub fn start(self) -> ScheduledJob {
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(self.run(stop_rx));
        ScheduledJob { stop_tx, handle }
    }

    async fn run(self, mut stop: oneshot::Receiver<()>) {
        info!(
            "⏰ Birthday job started (daily at {} {}, channel {})",
            self.schedule.time().format("%H:%M"),
            self.schedule.timezone(),
            self.announcer.channel_id()
        );

        let mut last_fired = None;
        loop {
            // Never schedule before the previous firing, even if the wall clock lags the timer
            let now = match last_fired {
                Some(previous) if previous > Utc::now() => previous,
                _ => Utc::now(),
            };
            let next = self.schedule.next_after(now);
            let wait = (next - Utc::now()).to_std().unwrap_or_default();
            debug!("Next birthday check at {next} (in {}s)", wait.as_secs());

            tokio::select! {
                biased;
                _ = &mut stop => break,
                _ = tokio::time::sleep(wait) => {}
            }

            last_fired = Some(next);
            let today = self.schedule.today(next);
            match self.fire(today).await {
                Ok(0) => {}
                Ok(sent) => info!("🎉 Sent {sent} birthday announcements for {today}"),
                Err(gap) => error!("Birthday check for {today} aborted: {gap}"),
            }
        }

        info!("⏰ Birthday job stopped");
    }
}

/// Handle to the running daily job. Dropping it also stops the job.
pub struct ScheduledJob {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl ScheduledJob {
    /// Cancel the pending wait. An announcement already in progress runs to completion.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(());
        if let Err(e) = self.handle.await {
            error!("Birthday job ended abnormally: {e}");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::birthdays::directory::MemberDirectory;
    use crate::features::birthdays::BirthdayAck;
    use crate::testing::RecordingMessenger;
    use chrono::NaiveTime;
    use std::collections::BTreeMap;
    use std::time::Duration;

    const CHANNEL: u64 = 1015172827650998352;

    fn directory(entries: &[(u64, &str)]) -> Arc<MemberDirectory> {
        let entries: BTreeMap<String, String> = entries
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();
        Arc::new(MemberDirectory::from_entries(&entries).unwrap())
    }

    fn registry(entries: &[(u64, &str)]) -> Arc<BirthdateRegistry> {
        let raw: BTreeMap<String, String> = entries
            .iter()
            .map(|(id, date)| (id.to_string(), date.to_string()))
            .collect();
        Arc::new(BirthdateRegistry::load(&raw, |name| name.parse().ok()).unwrap())
    }

    fn schedule() -> DailySchedule {
        DailySchedule::new(
            chrono_tz::Europe::Paris,
            NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
        )
    }

    async fn scheduler(
        messenger: Arc<RecordingMessenger>,
        dates: &[(u64, &str)],
        names: &[(u64, &str)],
    ) -> BirthdayScheduler {
        let announcer = BirthdayAnnouncer::connect(messenger, CHANNEL, directory(names))
            .await
            .unwrap();
        BirthdayScheduler::new(schedule(), registry(dates), Arc::new(announcer))
    }

    fn october_14() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[tokio::test]
    async fn test_two_birthdays_send_two_announcements() {
        let messenger = Arc::new(RecordingMessenger::new());
        let scheduler = scheduler(
            messenger.clone(),
            &[(1, "14-10-2004"), (2, "14-10-2003"), (3, "15-10-2004")],
            &[(1, "Jean Dupont"), (2, "Marie Curie"), (3, "Paul Martin")],
        )
        .await;

        let sent = scheduler.fire(october_14()).await.unwrap();

        assert_eq!(sent, 2);
        let sends = messenger.sends();
        assert_eq!(sends.len(), 2);
        assert_eq!(sends[0].1, "Eh ! Jean D. a anniversaire ! Souhaitez-le lui !");
        assert_eq!(sends[1].1, "Eh ! Marie C. a anniversaire ! Souhaitez-le lui !");
        assert_eq!(sends[0].2, Some(BirthdayAck::new(1).button()));
        assert_eq!(sends[1].2, Some(BirthdayAck::new(2).button()));
        assert!(sends.iter().all(|(channel, _, _)| *channel == CHANNEL));
    }

    #[tokio::test]
    async fn test_no_birthday_sends_nothing() {
        let messenger = Arc::new(RecordingMessenger::new());
        let scheduler =
            scheduler(messenger.clone(), &[(1, "01-01-2004")], &[(1, "Jean Dupont")]).await;

        assert_eq!(scheduler.fire(october_14()).await.unwrap(), 0);
        assert!(messenger.actions().is_empty());
    }

    #[tokio::test]
    async fn test_failed_send_does_not_block_other_members() {
        let messenger = Arc::new(RecordingMessenger::new().failing_sends(1));
        let scheduler = scheduler(
            messenger.clone(),
            &[(1, "14-10-2004"), (2, "14-10-2003")],
            &[(1, "Jean Dupont"), (2, "Marie Curie")],
        )
        .await;

        assert_eq!(scheduler.fire(october_14()).await.unwrap(), 1);
        let sends = messenger.sends();
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].2, Some(BirthdayAck::new(2).button()));
    }

    #[tokio::test]
    async fn test_missing_display_name_is_propagated() {
        let messenger = Arc::new(RecordingMessenger::new());
        let scheduler = scheduler(messenger.clone(), &[(5, "14-10-2004")], &[]).await;

        let err = scheduler.fire(october_14()).await.unwrap_err();
        assert_eq!(err.user_id, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_first_firing_sends_nothing() {
        let messenger = Arc::new(RecordingMessenger::new());
        let today = schedule().today(Utc::now());
        let date = today.format("%d-%m-%Y").to_string();
        let scheduler = scheduler(messenger.clone(), &[(1, date.as_str())], &[(1, "Jean Dupont")]).await;

        let job = scheduler.start();
        tokio::task::yield_now().await;
        assert!(!job.is_finished());
        job.stop().await;

        tokio::time::sleep(Duration::from_secs(3 * 86_400)).await;
        assert!(messenger.actions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_after_todays_firing_does_not_catch_up() {
        let messenger = Arc::new(RecordingMessenger::new());
        // midnight is always behind us, so today's firing was missed
        let midnight = DailySchedule::new(
            chrono_tz::Europe::Paris,
            NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        );
        let now = Utc::now();
        let today = midnight.today(now);
        let next_firing = midnight.next_after(now);
        assert!(midnight.today(next_firing) > today);

        let date = today.format("%d-%m-%Y").to_string();
        let announcer =
            BirthdayAnnouncer::connect(messenger.clone(), CHANNEL, directory(&[(1, "Jean Dupont")]))
                .await
                .unwrap();
        let scheduler =
            BirthdayScheduler::new(midnight, registry(&[(1, date.as_str())]), Arc::new(announcer));

        let job = scheduler.start();
        let until_next = (next_firing - now).to_std().unwrap();
        tokio::time::sleep(until_next.saturating_sub(Duration::from_secs(60))).await;
        assert!(messenger.actions().is_empty());

        // the next firing is tomorrow, which is not the birthday
        tokio::time::sleep(Duration::from_secs(120)).await;
        job.stop().await;
        assert!(messenger.actions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_fires_once_for_the_scheduled_day() {
        let messenger = Arc::new(RecordingMessenger::new());
        let first_firing = schedule().next_after(Utc::now());
        let date = schedule().today(first_firing).format("%d-%m-%Y").to_string();
        let scheduler = scheduler(messenger.clone(), &[(1, date.as_str())], &[(1, "Jean Dupont")]).await;

        let job = scheduler.start();
        tokio::time::sleep(Duration::from_secs(86_400 + 3_600)).await;
        job.stop().await;

        assert_eq!(messenger.sends().len(), 1);
    }
}
