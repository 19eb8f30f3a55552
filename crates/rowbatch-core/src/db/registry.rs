//! Process-wide cache of eligibility decisions keyed by entity path.
use crate::{
    db::eligibility::{IneligibleReason, InsertPlan, analyze},
    obs::sink::{self, MetricsEvent},
    traits::EntityPersister,
};
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet, hash_map::Entry},
    sync::{Arc, LazyLock, PoisonError, RwLock},
};
use tracing::debug;

type Decision = Result<Arc<InsertPlan>, IneligibleReason>;

static PLANS: LazyLock<RwLock<HashMap<&'static str, Decision>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

thread_local! {
    // entity paths whose decision this thread has already reported
    static REPORTED: RefCell<HashSet<&'static str>> = RefCell::new(HashSet::new());
}

/// Cached eligibility decision for a persister's entity type.
///
/// Analysis runs once per entity path; later calls share the stored plan.
/// Ineligible types return `None`.
pub fn lookup<P: EntityPersister + ?Sized>(persister: &P) -> Option<Arc<InsertPlan>> {
    decision(persister).ok()
}

/// Cached decision including the reason code.
///
/// The decision is logged and recorded as a metrics event the first time
/// each thread sees it, since metrics state is thread-local. No lock is
/// held while the event is recorded.
pub fn decision<P: EntityPersister + ?Sized>(persister: &P) -> Decision {
    let path = persister.model().path;

    let cached = PLANS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(path)
        .cloned();

    let stored = match cached {
        Some(found) => found,
        None => {
            let fresh = analyze(persister).map(Arc::new);
            let mut plans = PLANS.write().unwrap_or_else(PoisonError::into_inner);
            let stored = match plans.entry(path) {
                Entry::Occupied(entry) => entry.get().clone(),
                Entry::Vacant(entry) => entry.insert(fresh).clone(),
            };
            stored
        }
    };

    report_once(path, &stored);

    stored
}

fn report_once(path: &'static str, decision: &Decision) {
    // mark before recording so a sink that looks up the same type stops here
    let first = REPORTED.with(|reported| reported.borrow_mut().insert(path));
    if !first {
        return;
    }

    match decision {
        Ok(_) => debug!(entity = path, "multi-row insert enabled"),
        Err(reason) => debug!(entity = path, %reason, "multi-row insert disabled"),
    }

    sink::record(MetricsEvent::Eligibility {
        entity_path: path,
        reason: decision.as_ref().err().map(|reason| reason.label()),
    });
}
