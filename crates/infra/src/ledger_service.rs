//! Ledger operation pipeline.
//!
//! Every operation runs as:
//!
//! ```text
//! lock → load book → apply rule (pure) → save book (on success) → unlock
//! ```
//!
//! The lock is held across the whole sequence, so operations never
//! interleave: each one is an isolated read-modify-write over the book. A
//! rejected operation is never saved, so the stored state is unchanged.
//! Multi-account operations (reset-all) are isolated but not crash-atomic.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use ratedesk_core::AccountId;
use ratedesk_ledger::{
    AccountLookup, AdjustBalance, Ledger, LedgerBook, LedgerError, LedgerResult, LedgerRules,
    PendingWithdraw, PlatformSettings, PlatformStats, RatingHistoryRow, RatingReceipt,
    RequestWithdraw, SaveBankDetails, SubmitRating, UserAccount,
};

use crate::ledger_store::LedgerStore;

#[derive(Debug)]
pub struct LedgerService<S> {
    store: S,
    ledger: Ledger,
    gate: Mutex<()>,
}

impl<S> LedgerService<S> {
    pub fn new(store: S, rules: LedgerRules) -> Self {
        Self {
            store,
            ledger: Ledger::new(rules),
            gate: Mutex::new(()),
        }
    }

    pub fn rules(&self) -> &LedgerRules {
        self.ledger.rules()
    }

    /// The gate guards no data, only ordering, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> LedgerService<S>
where
    S: LedgerStore,
{
    /// Runs `op` against a freshly loaded book and saves the result if it succeeded.
    fn transact<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&Ledger, &mut LedgerBook) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let _guard = self.lock();

        let mut book = self.load(op)?;
        match f(&self.ledger, &mut book) {
            Ok(out) => {
                self.save(op, &book)?;
                Ok(out)
            }
            Err(e) => {
                tracing::info!(op, reason = %e, "ledger operation rejected");
                Err(e)
            }
        }
    }

    /// Read-only access; nothing is saved.
    fn inspect<T>(&self, op: &'static str, f: impl FnOnce(&LedgerBook) -> T) -> LedgerResult<T> {
        let _guard = self.lock();
        let book = self.load(op)?;
        Ok(f(&book))
    }

    fn load(&self, op: &'static str) -> LedgerResult<LedgerBook> {
        self.store.load().map_err(|e| {
            tracing::error!(op, error = %e, "ledger load failed");
            LedgerError::from(e)
        })
    }

    fn save(&self, op: &'static str, book: &LedgerBook) -> LedgerResult<()> {
        self.store.save(book).map_err(|e| {
            tracing::error!(op, error = %e, "ledger save failed");
            LedgerError::from(e)
        })
    }

    /// Returns the account, creating and persisting it on first reference.
    pub fn get_or_create_account(&self, id: &AccountId) -> LedgerResult<UserAccount> {
        let _guard = self.lock();

        let mut book = self.load("get_or_create_account")?;
        let AccountLookup { account, created } = self.ledger.get_or_create_account(&mut book, id);
        if created {
            self.save("get_or_create_account", &book)?;
            tracing::info!(account_id = %id, balance = account.balance, "account created");
        }
        Ok(account)
    }

    pub fn submit_rating(&self, cmd: SubmitRating) -> LedgerResult<RatingReceipt> {
        let receipt = self.transact("submit_rating", |ledger, book| ledger.submit_rating(book, &cmd))?;
        tracing::info!(
            account_id = %cmd.account_id,
            total_earned = receipt.total_earned,
            ratings_done = receipt.ratings_done,
            "rating recorded"
        );
        Ok(receipt)
    }

    pub fn request_withdraw(&self, cmd: RequestWithdraw) -> LedgerResult<UserAccount> {
        let account = self.transact("request_withdraw", |ledger, book| ledger.request_withdraw(book, &cmd))?;
        tracing::info!(
            account_id = %cmd.account_id,
            pending_withdraw = account.pending_withdraw,
            "withdraw requested"
        );
        Ok(account)
    }

    pub fn process_withdraw(&self, id: &AccountId, occurred_at: DateTime<Utc>) -> LedgerResult<UserAccount> {
        let account = self.transact("process_withdraw", |ledger, book| {
            ledger.process_withdraw(book, id, occurred_at)
        })?;
        tracing::info!(account_id = %id, "withdraw processed");
        Ok(account)
    }

    pub fn adjust_balance(&self, cmd: AdjustBalance) -> LedgerResult<UserAccount> {
        let account = self.transact("adjust_balance", |ledger, book| ledger.adjust_balance(book, &cmd))?;
        tracing::info!(
            account_id = %cmd.account_id,
            direction = ?cmd.direction,
            balance = account.balance,
            "balance adjusted by admin"
        );
        Ok(account)
    }

    pub fn set_can_rate(&self, id: &AccountId, can_rate: bool) -> LedgerResult<UserAccount> {
        let account = self.transact("set_can_rate", |ledger, book| Ok(ledger.set_can_rate(book, id, can_rate)))?;
        tracing::info!(account_id = %id, can_rate, "rating permission changed");
        Ok(account)
    }

    pub fn save_bank_details(&self, cmd: SaveBankDetails) -> LedgerResult<UserAccount> {
        let account = self.transact("save_bank_details", |ledger, book| Ok(ledger.save_bank_details(book, &cmd)))?;
        tracing::info!(account_id = %cmd.account_id, "bank details saved");
        Ok(account)
    }

    pub fn toggle_rating_enabled(&self) -> LedgerResult<PlatformSettings> {
        let settings = self.transact("toggle_rating_enabled", |ledger, book| Ok(ledger.toggle_rating_enabled(book)))?;
        tracing::info!(rating_enabled = settings.rating_enabled, "rating switch toggled");
        Ok(settings)
    }

    pub fn toggle_withdraw_enabled(&self) -> LedgerResult<PlatformSettings> {
        let settings =
            self.transact("toggle_withdraw_enabled", |ledger, book| Ok(ledger.toggle_withdraw_enabled(book)))?;
        tracing::info!(withdraw_enabled = settings.withdraw_enabled, "withdraw switch toggled");
        Ok(settings)
    }

    pub fn reset_all_rating_counts(&self) -> LedgerResult<usize> {
        let n = self.transact("reset_all_rating_counts", |ledger, book| Ok(ledger.reset_all_rating_counts(book)))?;
        tracing::info!(accounts = n, "rating counts reset");
        Ok(n)
    }

    pub fn settings(&self) -> LedgerResult<PlatformSettings> {
        self.inspect("settings", |book| book.settings)
    }

    pub fn list_accounts(&self) -> LedgerResult<Vec<(AccountId, UserAccount)>> {
        self.inspect("list_accounts", |book| {
            book.accounts().map(|(id, a)| (id.clone(), a.clone())).collect()
        })
    }

    pub fn list_pending_withdraws(&self) -> LedgerResult<Vec<PendingWithdraw>> {
        self.inspect("list_pending_withdraws", LedgerBook::pending_withdraws)
    }

    pub fn list_rating_history(&self) -> LedgerResult<Vec<RatingHistoryRow>> {
        self.inspect("list_rating_history", LedgerBook::rating_history)
    }

    pub fn stats(&self) -> LedgerResult<PlatformStats> {
        self.inspect("stats", LedgerBook::stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use ratedesk_ledger::{AdjustDirection, LooseInt};

    use crate::ledger_store::{InMemoryLedgerStore, StoreError};

    fn id(s: &str) -> AccountId {
        AccountId::parse(s).unwrap()
    }

    fn service() -> LedgerService<Arc<InMemoryLedgerStore>> {
        LedgerService::new(Arc::new(InMemoryLedgerStore::new()), LedgerRules::default())
    }

    fn rating(account: &str, commission: i64) -> SubmitRating {
        SubmitRating {
            account_id: id(account),
            commission: Some(LooseInt::Int(commission)),
            stars: Some(LooseInt::Int(5)),
            hotel: Some("Plaza".to_string()),
            occurred_at: Utc::now(),
        }
    }

    /// Store whose saves can be switched off to simulate an unavailable backend.
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryLedgerStore,
        fail: AtomicBool,
    }

    impl LedgerStore for FlakyStore {
        fn load(&self) -> Result<LedgerBook, StoreError> {
            self.inner.load()
        }

        fn save(&self, book: &LedgerBook) -> Result<(), StoreError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::Io {
                    path: "flaky".to_string(),
                    source: std::io::Error::other("disk gone"),
                });
            }
            self.inner.save(book)
        }
    }

    #[test]
    fn panic_inside_the_gate_does_not_wedge_the_service() {
        let svc = service();
        let crashed = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = svc.gate.lock();
                    panic!("operation crashed while holding the gate");
                })
                .join()
        });
        assert!(crashed.is_err());
        assert!(svc.gate.is_poisoned());

        let acct = svc.get_or_create_account(&id("innocent")).unwrap();
        assert_eq!(acct.balance, 9_000);
        svc.submit_rating(rating("innocent", 10)).unwrap();
    }

    #[test]
    fn huge_amounts_are_rejected_and_service_stays_usable() {
        let svc = service();
        let big = i64::MAX - 9_000;

        svc.submit_rating(rating("alice", big)).unwrap();
        let withdraw = |amount| RequestWithdraw {
            account_id: id("alice"),
            amount: Some(LooseInt::Int(amount)),
            occurred_at: Utc::now(),
        };
        svc.request_withdraw(withdraw(big)).unwrap();

        let err = svc.submit_rating(rating("alice", i64::MAX)).unwrap_err();
        assert_eq!(err, LedgerError::InvalidAmount);

        let stats = svc.stats().unwrap();
        assert_eq!(stats.total_earnings, big);
        assert_eq!(stats.total_pending_withdraw, big);
        assert!(svc.get_or_create_account(&id("bob")).is_ok());
    }

    #[test]
    fn get_or_create_persists_exactly_one_account() {
        let svc = service();
        let a = svc.get_or_create_account(&id("alice")).unwrap();
        let b = svc.get_or_create_account(&id("alice")).unwrap();

        assert_eq!(a, b);
        assert_eq!(svc.list_accounts().unwrap().len(), 1);
        assert_eq!(a.balance, 9_000);
    }

    #[test]
    fn successful_operations_are_persisted() {
        let svc = service();
        svc.submit_rating(rating("alice", 50)).unwrap();

        let acct = svc.get_or_create_account(&id("alice")).unwrap();
        assert_eq!(acct.total_earned, 50);
        assert_eq!(acct.ratings_done, 1);
        assert_eq!(svc.stats().unwrap().total_ratings, 1);
    }

    #[test]
    fn rejected_operations_leave_store_untouched() {
        let svc = service();
        svc.toggle_rating_enabled().unwrap();

        let err = svc.submit_rating(rating("bob", 50)).unwrap_err();
        assert_eq!(err, LedgerError::RatingsDisabledGlobally);
        // The lazily created account was not saved either.
        assert!(svc.list_accounts().unwrap().is_empty());
    }

    #[test]
    fn withdraw_round_trip_through_service() {
        let svc = service();
        svc.submit_rating(rating("alice", 300)).unwrap();
        svc.request_withdraw(RequestWithdraw {
            account_id: id("alice"),
            amount: Some(LooseInt::Int(100)),
            occurred_at: Utc::now(),
        })
        .unwrap();

        let pending = svc.list_pending_withdraws().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].pending_withdraw, 100);

        let acct = svc.process_withdraw(&id("alice"), Utc::now()).unwrap();
        assert_eq!(acct.pending_withdraw, 0);
        assert!(svc.list_pending_withdraws().unwrap().is_empty());
    }

    #[test]
    fn process_withdraw_for_unknown_account_does_not_create_it() {
        let svc = service();
        let err = svc.process_withdraw(&id("ghost"), Utc::now()).unwrap_err();
        assert_eq!(err, LedgerError::AccountNotFound(id("ghost")));
        assert!(svc.list_accounts().unwrap().is_empty());
    }

    #[test]
    fn admin_operations_update_settings_and_accounts() {
        let svc = service();
        let settings = svc.toggle_withdraw_enabled().unwrap();
        assert!(!settings.withdraw_enabled);
        assert_eq!(svc.settings().unwrap(), settings);

        svc.set_can_rate(&id("carol"), false).unwrap();
        assert_eq!(
            svc.submit_rating(rating("carol", 10)).unwrap_err(),
            LedgerError::RatingsDisabledForUser
        );

        let acct = svc
            .adjust_balance(AdjustBalance {
                account_id: id("carol"),
                amount: Some(LooseInt::Int(50_000)),
                direction: AdjustDirection::Cut,
                occurred_at: Utc::now(),
            })
            .unwrap();
        assert_eq!(acct.balance, 0);

        svc.submit_rating(rating("dave", 10)).unwrap();
        assert_eq!(svc.reset_all_rating_counts().unwrap(), 2);
        assert_eq!(svc.get_or_create_account(&id("dave")).unwrap().ratings_done, 0);
        assert_eq!(svc.list_rating_history().unwrap().len(), 1);
    }

    #[test]
    fn storage_failure_surfaces_as_storage_unavailable() {
        let store = Arc::new(FlakyStore::default());
        let svc = LedgerService::new(store.clone(), LedgerRules::default());
        svc.submit_rating(rating("alice", 50)).unwrap();

        store.fail.store(true, Ordering::SeqCst);
        let err = svc.submit_rating(rating("alice", 50)).unwrap_err();
        assert!(matches!(err, LedgerError::StorageUnavailable(_)));
        assert!(!err.is_business_rule());

        store.fail.store(false, Ordering::SeqCst);
        assert_eq!(svc.get_or_create_account(&id("alice")).unwrap().total_earned, 50);
    }

    #[test]
    fn concurrent_ratings_are_serialised() {
        let svc = Arc::new(service());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let svc = svc.clone();
                std::thread::spawn(move || {
                    for _ in 0..3 {
                        svc.submit_rating(rating("shared", 10)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let acct = svc.get_or_create_account(&id("shared")).unwrap();
        assert_eq!(acct.ratings_done, 24);
        assert_eq!(acct.total_earned, 240);
        assert_eq!(acct.history().len(), 24);
    }
}
