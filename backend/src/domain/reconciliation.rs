//! Background reconciliation of the follow graph.
//!
//! A sweep finishes deletions left in the `deleting` state, removes
//! references to accounts that no longer exist, and removes stray halves of
//! edges whose mirror is missing. Every repair happens under the relevant pair
//! lock after re-reading the documents, so a sweep can run alongside live
//! traffic.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::account_deletion::AccountDeletionService;
use super::pair_locks::{PairKey, PairLocks};
use super::ports::{AccountRepository, AccountRepositoryError};
use super::relationship::remove_half_edge;
use super::{Account, AccountId, AccountStatus, RelationSide, RelationshipError};

/// Counts of repairs performed by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Deletions found in the `deleting` state and completed.
    pub deletions_resumed: usize,
    /// References to missing accounts removed.
    pub dangling_removed: usize,
    /// Stray edge halves removed.
    pub asymmetric_repaired: usize,
}

impl SweepReport {
    /// Whether the sweep changed anything.
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Repairs follow-graph damage left behind by failures.
#[derive(Clone)]
pub struct RelationshipReconciler {
    accounts: Arc<dyn AccountRepository>,
    deletion: AccountDeletionService,
    locks: PairLocks,
}

impl RelationshipReconciler {
    /// Build a reconciler sharing `locks` with the engine and the coordinator.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        deletion: AccountDeletionService,
        locks: PairLocks,
    ) -> Self {
        Self {
            accounts,
            deletion,
            locks,
        }
    }

    /// Run one full sweep over the account store.
    pub async fn sweep(&self) -> Result<SweepReport, RelationshipError> {
        let mut report = SweepReport::default();

        for account in self.accounts.list().await? {
            if account.status != AccountStatus::Deleting {
                continue;
            }
            match self.deletion.delete(account.id).await {
                Ok(_) => report.deletions_resumed += 1,
                Err(RelationshipError::NotFound { .. }) => {}
                Err(err) => warn!(account = %account.id, error = %err, "resumed deletion failed"),
            }
        }

        let accounts = self.accounts.list().await?;
        let by_id: HashMap<AccountId, &Account> = accounts.iter().map(|doc| (doc.id, doc)).collect();
        let mut dangling = Vec::new();
        let mut suspects = BTreeSet::new();
        for account in &accounts {
            for side in [RelationSide::Followers, RelationSide::Following] {
                for other in account.relation(side) {
                    match by_id.get(other) {
                        None => dangling.push((account.id, side, *other)),
                        Some(_) if *other == account.id => dangling.push((account.id, side, *other)),
                        Some(peer) if !mirrored(account, side, peer) => {
                            suspects.insert(pair_members(account.id, *other));
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        for (owner, side, other) in dangling {
            if self.remove_dangling(owner, side, other).await? {
                report.dangling_removed += 1;
            }
        }
        for (a, b) in suspects {
            report.asymmetric_repaired += self.repair_pair(a, b).await?;
        }

        if report.is_clean() {
            info!("reconciliation sweep found nothing to repair");
        } else {
            warn!(
                deletions_resumed = report.deletions_resumed,
                dangling_removed = report.dangling_removed,
                asymmetric_repaired = report.asymmetric_repaired,
                "reconciliation sweep repaired the follow graph"
            );
        }
        Ok(report)
    }

    async fn remove_dangling(
        &self,
        owner: AccountId,
        side: RelationSide,
        other: AccountId,
    ) -> Result<bool, RelationshipError> {
        let _pair = self.locks.lock(owner, other).await;
        if other != owner && self.accounts.find_by_id(&other).await?.is_some() {
            return Ok(false);
        }
        match self.accounts.remove_relation(&owner, side, &other).await {
            Ok(removed) => Ok(removed),
            Err(AccountRepositoryError::MissingAccount { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn repair_pair(&self, a: AccountId, b: AccountId) -> Result<usize, RelationshipError> {
        let _pair = self.locks.lock(a, b).await;
        let (Some(first), Some(second)) = (
            self.accounts.find_by_id(&a).await?,
            self.accounts.find_by_id(&b).await?,
        ) else {
            return Ok(0);
        };
        let mut repaired = 0;
        for (actor, target) in [(&first, &second), (&second, &first)] {
            if remove_half_edge(self.accounts.as_ref(), actor, target).await? {
                repaired += 1;
            }
        }
        Ok(repaired)
    }
}

fn mirrored(account: &Account, side: RelationSide, peer: &Account) -> bool {
    match side {
        RelationSide::Followers => peer.follows(&account.id),
        RelationSide::Following => peer.is_followed_by(&account.id),
    }
}

fn pair_members(a: AccountId, b: AccountId) -> (AccountId, AccountId) {
    PairKey::new(a, b).members()
}

/// Run [`RelationshipReconciler::sweep`] now and then every `interval`.
pub fn spawn_reconciliation(reconciler: RelationshipReconciler, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(err) = reconciler.sweep().await {
                warn!(error = %err, "reconciliation sweep failed");
            }
        }
    })
}
