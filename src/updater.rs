//! One update run: load previous snapshot, fetch, compute and save.
//!
//! A fresh snapshot is saved only when gold, silver and exchange rate were
//! all fetched. Otherwise previous snapshot (if any) is saved again with new
//! timestamps so that front-end keeps showing the last known values. Such
//! fallback run is still reported as failure.



use std::process::ExitCode;

use chrono::{
    DateTime,
    TimeZone,
};

use tracing::{
    error,
    info,
    warn,
};

use crate::{
    config::Weights,
    error::FetchError,
    price_info::{
        Metal,
        PriceInfo,
    },
    price_source::PriceSource,
    report,
    snapshot::Snapshot,
    storage::Storage,
    valuation,
};



#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// At least one value could not be fetched.
    FetchIncomplete { fallback_saved: bool },
    /// Fresh snapshot was computed, but could not be stored.
    SaveFailed,
}



#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(FailureReason),
}



impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure(..) => ExitCode::FAILURE,
        }
    }
}



/// Everything a run needs. `base` and `quote` name the exchange rate pair.
pub struct Updater<'a, P, S> {
    pub source: &'a P,
    pub storage: &'a S,
    pub weights: &'a Weights,
    pub base: &'a str,
    pub quote: &'a str,
}



impl<'a, P, S> Updater<'a, P, S>
    where P: PriceSource + Sync, S: Storage + Sync
{
    pub async fn run<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Outcome
        where Tz::Offset: std::fmt::Display
    {
        let prior = self.prior_load().await;

        let info = self.fetch_all().await;

        let Some((gold, silver, rate)) = info.complete() else {
            error!("Failed to fetch required data");
            return self.fallback(prior, now).await
        };

        let snapshot = valuation::compute(gold, silver, rate, self.weights, now);
        report::values_log(&snapshot, self.quote);

        if let Some(ref prior) = prior {
            report::changes_log(&report::changes(prior, &snapshot), self.quote);
        }

        match self.storage.save(&snapshot).await {
            Ok(()) => {
                info!("Update completed successfully");
                Outcome::Success
            }
            Err(e) => {
                error!("Failed to save data: {}", e);
                Outcome::Failure(FailureReason::SaveFailed)
            }
        }
    }



    // Previous snapshot is only advisory, a broken one is as good as none.
    async fn prior_load(&self) -> Option<Snapshot> {
        match self.storage.load().await {
            Ok(Some(prior)) => Some(prior),
            Ok(None) => {
                info!("No previous data found");
                None
            }
            Err(e) => {
                warn!("Error reading previous data, ignoring it: {}", e);
                None
            }
        }
    }



    // Every source is queried even if an earlier one failed, so that the log
    // shows the state of all of them.
    async fn fetch_all(&self) -> PriceInfo {
        let gold = self.source.fetch_price(Metal::Gold).await;
        let gold = value_log("Gold price (USD/oz)", gold);

        let silver = self.source.fetch_price(Metal::Silver).await;
        let silver = value_log("Silver price (USD/oz)", silver);

        let rate = self.source.fetch_exchange_rate(self.base, self.quote).await;
        let label = format!("{}/{} rate", self.base, self.quote);
        let rate = value_log(&label, rate);

        PriceInfo {
            gold, silver, rate,
        }
    }



    async fn fallback<Tz: TimeZone>(&self, prior: Option<Snapshot>, now: &DateTime<Tz>)
        -> Outcome
        where Tz::Offset: std::fmt::Display
    {
        let Some(mut prior) = prior else {
            return Outcome::Failure(FailureReason::FetchIncomplete {
                fallback_saved: false,
            })
        };

        info!("Using previous data as fallback");
        valuation::refresh_timestamps(&mut prior, now);

        let fallback_saved = match self.storage.save(&prior).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save fallback data: {}", e);
                false
            }
        };

        Outcome::Failure(FailureReason::FetchIncomplete { fallback_saved })
    }
}



fn value_log(label: &str, result: Result<f64, FetchError>) -> Option<f64> {
    match result {
        Ok(val) => {
            info!("{}: {}", label, val);
            Some(val)
        }
        Err(e) => {
            warn!("{}: not available, {}", label, e);
            None
        }
    }
}



#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::FixedOffset;

    use crate::error::StoreError;

    use super::*;

    /// Fake source. `None` makes that fetch fail.
    struct FakeSource {
        gold: Option<f64>,
        silver: Option<f64>,
        rate: Option<f64>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn new(gold: Option<f64>, silver: Option<f64>, rate: Option<f64>) -> Self {
            Self { gold, silver, rate, calls: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl PriceSource for FakeSource {
        async fn fetch_price(&self, metal: Metal) -> Result<f64, FetchError> {
            self.calls.lock().unwrap().push(metal.name().to_string());

            let val = match metal {
                Metal::Gold => self.gold,
                Metal::Silver => self.silver,
            };

            val.ok_or(FetchError::MissingField("price".to_string()))
        }

        async fn fetch_exchange_rate(&self, base: &str, quote: &str)
            -> Result<f64, FetchError>
        {
            self.calls.lock().unwrap().push(format!("{}/{}", base, quote));
            self.rate.ok_or(FetchError::Rejected)
        }
    }

    /// In-memory storage that records every save.
    #[derive(Default)]
    struct MemoryStorage {
        stored: Mutex<Option<Snapshot>>,
        corrupt: bool,
        fail_save: bool,
        saves: Mutex<usize>,
    }

    impl MemoryStorage {
        fn with(snapshot: Snapshot) -> Self {
            Self { stored: Mutex::new(Some(snapshot)), ..Default::default() }
        }

        fn stored(&self) -> Option<Snapshot> {
            self.stored.lock().unwrap().clone()
        }

        fn saves(&self) -> usize {
            *self.saves.lock().unwrap()
        }
    }

    #[async_trait]
    impl Storage for MemoryStorage {
        async fn load(&self) -> Result<Option<Snapshot>, StoreError> {
            if self.corrupt {
                let e = serde_json::from_str::<Snapshot>("{").unwrap_err();
                return Err(StoreError::Corrupt(e))
            }

            Ok(self.stored())
        }

        async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
            if self.fail_save {
                return Err(StoreError::Io(std::io::Error::other("disk full")))
            }

            *self.saves.lock().unwrap() += 1;
            *self.stored.lock().unwrap() = Some(snapshot.clone());
            Ok(())
        }
    }

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    fn prior() -> Snapshot {
        let mut s = valuation::compute(2000.0, 30.0, 3.7, &Weights::default(),
            &at("2026-03-04T10:00:00+02:00")
        );
        s.sovereign_value_ils = 6500.0;
        s
    }

    async fn run(source: &FakeSource, storage: &MemoryStorage) -> Outcome {
        let weights = Weights::default();
        let updater = Updater {
            source,
            storage,
            weights: &weights,
            base: "USD",
            quote: "ILS",
        };

        updater.run(&at("2026-03-05T10:00:00+02:00")).await
    }

    #[tokio::test]
    async fn test_fresh_run_saves_snapshot() {
        let source = FakeSource::new(Some(2000.0), Some(30.0), Some(3.7));
        let storage = MemoryStorage::with(prior());

        assert_eq!(run(&source, &storage).await, Outcome::Success);

        let saved = storage.stored().unwrap();
        assert_eq!(saved, valuation::compute(2000.0, 30.0, 3.7, &Weights::default(),
            &at("2026-03-05T10:00:00+02:00")
        ));
        assert_eq!(saved.sovereign_value_ils, 1741.54);
        assert_eq!(storage.saves(), 1);
    }

    #[tokio::test]
    async fn test_fallback_keeps_prior_values() {
        let source = FakeSource::new(None, None, None);
        let storage = MemoryStorage::with(prior());

        let outcome = run(&source, &storage).await;
        assert_eq!(outcome, Outcome::Failure(FailureReason::FetchIncomplete {
            fallback_saved: true,
        }));

        let saved = storage.stored().unwrap();
        assert_eq!(saved.sovereign_value_ils, 6500.0);
        assert!(saved.last_updated_timestamp > prior().last_updated_timestamp);
        assert_eq!(saved.last_updated, "2026-03-05 10:00:00");

        let mut expected = prior();
        valuation::refresh_timestamps(&mut expected, &at("2026-03-05T10:00:00+02:00"));
        assert_eq!(saved, expected);
    }

    #[tokio::test]
    async fn test_no_prior_all_failed() {
        let source = FakeSource::new(None, None, None);
        let storage = MemoryStorage::default();

        let outcome = run(&source, &storage).await;
        assert_eq!(outcome, Outcome::Failure(FailureReason::FetchIncomplete {
            fallback_saved: false,
        }));
        assert_eq!(storage.stored(), None);
        assert_eq!(storage.saves(), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_takes_fallback() {
        let source = FakeSource::new(Some(2100.0), None, Some(3.9));
        let storage = MemoryStorage::with(prior());

        let outcome = run(&source, &storage).await;
        assert!(matches!(outcome, Outcome::Failure(FailureReason::FetchIncomplete { .. })));

        let saved = storage.stored().unwrap();
        assert_eq!(saved.gold_price_oz_usd, 2000.0);
        assert_eq!(saved.usd_ils_rate, 3.7);
        assert_eq!(saved.sovereign_value_ils, 6500.0);
    }

    #[tokio::test]
    async fn test_all_sources_attempted() {
        let source = FakeSource::new(None, Some(30.0), Some(3.7));
        let storage = MemoryStorage::default();

        run(&source, &storage).await;

        let calls = source.calls.lock().unwrap().clone();
        assert_eq!(calls, ["gold", "silver", "USD/ILS"]);
    }

    #[tokio::test]
    async fn test_corrupt_prior_is_first_run() {
        let source = FakeSource::new(Some(2000.0), Some(30.0), Some(3.7));
        let storage = MemoryStorage { corrupt: true, ..Default::default() };

        assert_eq!(run(&source, &storage).await, Outcome::Success);
        assert_eq!(storage.saves(), 1);

        let source = FakeSource::new(None, Some(30.0), Some(3.7));
        let storage = MemoryStorage { corrupt: true, ..Default::default() };

        let outcome = run(&source, &storage).await;
        assert_eq!(outcome, Outcome::Failure(FailureReason::FetchIncomplete {
            fallback_saved: false,
        }));
        assert_eq!(storage.saves(), 0);
    }

    #[tokio::test]
    async fn test_save_failure() {
        let source = FakeSource::new(Some(2000.0), Some(30.0), Some(3.7));
        let storage = MemoryStorage { fail_save: true, ..Default::default() };

        let outcome = run(&source, &storage).await;
        assert_eq!(outcome, Outcome::Failure(FailureReason::SaveFailed));

        let source = FakeSource::new(None, None, None);
        let storage = MemoryStorage { fail_save: true, ..MemoryStorage::with(prior()) };

        let outcome = run(&source, &storage).await;
        assert_eq!(outcome, Outcome::Failure(FailureReason::FetchIncomplete {
            fallback_saved: false,
        }));
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(ExitCode::from(Outcome::Success), ExitCode::SUCCESS);

        // Fallback record was written, but the data is stale.
        let fallback = Outcome::Failure(FailureReason::FetchIncomplete {
            fallback_saved: true,
        });
        assert_eq!(ExitCode::from(fallback), ExitCode::FAILURE);

        let no_prior = Outcome::Failure(FailureReason::FetchIncomplete {
            fallback_saved: false,
        });
        assert_eq!(ExitCode::from(no_prior), ExitCode::FAILURE);

        let save_failed = Outcome::Failure(FailureReason::SaveFailed);
        assert_eq!(ExitCode::from(save_failed), ExitCode::FAILURE);
    }
}
